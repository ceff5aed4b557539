//! Measurement session state machine
//!
//! A session is either inactive or collecting points for one mode. Each
//! transition runs synchronously and returns a [`SessionEffect`] describing
//! what changed, which the render side uses to update the map overlay.
//!
//! ```text
//! Inactive --activate(mode)--> Collecting(mode, [])
//! Collecting --add_point--> Collecting(mode, [.., p])
//! Collecting --finalize (enough points)--> Collecting(mode, []) + record
//! Collecting --cancel_in_progress--> Collecting(mode, [])
//! any --deactivate--> Inactive (all records dropped)
//! ```

use crate::coordinate::GeoPoint;
use crate::geodesy::Sphere;
use crate::measurement::{FinalizedMeasurement, MeasurementId, MeasurementMode};
use tracing::{debug, trace};

/// Description of a state change, consumed by the overlay projector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEffect {
    /// Nothing changed
    None,
    /// A mode was (re)activated; any in-progress capture was discarded
    ModeChanged { mode: MeasurementMode },
    /// A point was appended at `index`
    PointAdded { index: usize },
    /// The cursor moved or left the map; only the live preview changed
    PreviewChanged,
    /// The in-progress shape was committed as a new measurement
    Finalized { id: MeasurementId },
    /// The in-progress shape was discarded
    InProgressCleared,
    /// Every measurement and the in-progress shape were removed
    AllCleared,
    /// The tool was switched off
    Deactivated,
    /// Display units changed; emitted by the tool, not by the session
    UnitsChanged,
}

impl SessionEffect {
    pub fn is_none(&self) -> bool {
        matches!(self, SessionEffect::None)
    }
}

/// Live preview of the shape being traced
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub mode: MeasurementMode,
    /// Captured points followed by the cursor, if any
    pub points: Vec<GeoPoint>,
    /// Cursor position, if the pointer is over the map
    pub cursor: Option<GeoPoint>,
    /// Value of `points` in base units
    pub raw_value: f64,
    /// Whether `points` reaches the mode's minimum
    pub meets_minimum: bool,
}

impl Preview {
    /// Where the floating tooltip follows: the cursor, else the last point
    pub fn tooltip_anchor(&self) -> Option<GeoPoint> {
        self.cursor.or_else(|| self.points.last().copied())
    }
}

/// State of one measurement tool instance
#[derive(Debug, Clone)]
pub struct MeasurementSession {
    sphere: Sphere,
    active_mode: Option<MeasurementMode>,
    captured: Vec<GeoPoint>,
    cursor: Option<GeoPoint>,
    finalized: Vec<FinalizedMeasurement>,
    next_sequence: u64,
}

impl Default for MeasurementSession {
    fn default() -> Self {
        Self::new(Sphere::default())
    }
}

impl MeasurementSession {
    /// Create an inactive session measuring on `sphere`
    pub fn new(sphere: Sphere) -> Self {
        Self {
            sphere,
            active_mode: None,
            captured: Vec::new(),
            cursor: None,
            finalized: Vec::new(),
            next_sequence: 1,
        }
    }

    pub fn sphere(&self) -> &Sphere {
        &self.sphere
    }

    pub fn active_mode(&self) -> Option<MeasurementMode> {
        self.active_mode
    }

    pub fn is_collecting(&self) -> bool {
        self.active_mode.is_some()
    }

    /// Points captured for the in-progress shape
    pub fn captured(&self) -> &[GeoPoint] {
        &self.captured
    }

    pub fn point_count(&self) -> usize {
        self.captured.len()
    }

    pub fn cursor(&self) -> Option<GeoPoint> {
        self.cursor
    }

    /// Finalized measurements in creation order
    pub fn finalized(&self) -> &[FinalizedMeasurement] {
        &self.finalized
    }

    pub fn finalized_count(&self) -> usize {
        self.finalized.len()
    }

    /// Whether there is anything to clear
    pub fn has_content(&self) -> bool {
        !self.captured.is_empty() || !self.finalized.is_empty()
    }

    /// Whether `finalize` would commit a measurement right now
    pub fn can_finalize(&self) -> bool {
        match self.active_mode {
            Some(mode) => effective_len(&self.captured) >= mode.min_points(),
            None => false,
        }
    }

    /// Start collecting for `mode`, discarding any unfinished shape
    pub fn activate(&mut self, mode: MeasurementMode) -> SessionEffect {
        if !self.captured.is_empty() {
            debug!(
                previous = ?self.active_mode,
                discarded = self.captured.len(),
                "discarding unfinished shape"
            );
        }
        self.captured.clear();
        self.cursor = None;
        self.active_mode = Some(mode);
        debug!(%mode, "measurement mode activated");
        SessionEffect::ModeChanged { mode }
    }

    /// Append a point to the in-progress shape
    pub fn add_point(&mut self, point: GeoPoint) -> SessionEffect {
        if self.active_mode.is_none() {
            return SessionEffect::None;
        }
        self.captured.push(point);
        let index = self.captured.len() - 1;
        trace!(index, %point, "point captured");
        SessionEffect::PointAdded { index }
    }

    /// Track the pointer position for the live preview
    pub fn move_cursor(&mut self, point: GeoPoint) -> SessionEffect {
        if self.active_mode.is_none() {
            return SessionEffect::None;
        }
        self.cursor = Some(point);
        SessionEffect::PreviewChanged
    }

    /// Forget the pointer position (pointer left the map)
    pub fn clear_cursor(&mut self) -> SessionEffect {
        if self.active_mode.is_none() || self.cursor.take().is_none() {
            return SessionEffect::None;
        }
        SessionEffect::PreviewChanged
    }

    /// Commit the in-progress shape
    ///
    /// A trailing point equal to the one before it is dropped first: a
    /// double-click reports its click half as an extra point. Below the mode's
    /// minimum this is a no-op and the captured points are kept.
    pub fn finalize(&mut self) -> SessionEffect {
        let Some(mode) = self.active_mode else {
            return SessionEffect::None;
        };

        let len = effective_len(&self.captured);
        if len < mode.min_points() {
            debug!(%mode, points = len, "finalize ignored below minimum point count");
            return SessionEffect::None;
        }

        let mut points = std::mem::take(&mut self.captured);
        points.truncate(len);
        self.cursor = None;

        let raw_value = mode.compute(&self.sphere, &points);
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let measurement = FinalizedMeasurement::new(mode, points, raw_value, sequence);
        let id = measurement.id();
        debug!(%mode, sequence, raw_value, points = len, "measurement finalized");
        self.finalized.push(measurement);

        SessionEffect::Finalized { id }
    }

    /// Discard the in-progress shape; idempotent
    pub fn cancel_in_progress(&mut self) -> SessionEffect {
        if self.captured.is_empty() && self.cursor.is_none() {
            return SessionEffect::None;
        }
        debug!(discarded = self.captured.len(), "in-progress shape cancelled");
        self.captured.clear();
        self.cursor = None;
        SessionEffect::InProgressCleared
    }

    /// Remove all measurements and the in-progress shape; mode is kept
    pub fn clear_all(&mut self) -> SessionEffect {
        let had_finalized = !self.finalized.is_empty();
        let cancelled = !self.cancel_in_progress().is_none();
        if !had_finalized && !cancelled {
            return SessionEffect::None;
        }
        debug!(removed = self.finalized.len(), "all measurements cleared");
        self.finalized.clear();
        SessionEffect::AllCleared
    }

    /// Clear everything and leave collecting mode
    pub fn deactivate(&mut self) -> SessionEffect {
        let cleared = !self.clear_all().is_none();
        if self.active_mode.take().is_none() && !cleared {
            return SessionEffect::None;
        }
        debug!("measurement tool deactivated");
        SessionEffect::Deactivated
    }

    /// Live preview over the captured points plus the cursor
    pub fn preview(&self) -> Option<Preview> {
        let mode = self.active_mode?;
        let mut points = Vec::with_capacity(self.captured.len() + 1);
        points.extend_from_slice(&self.captured);
        points.extend(self.cursor);

        let raw_value = mode.compute(&self.sphere, &points);
        let meets_minimum = points.len() >= mode.min_points();
        Some(Preview {
            mode,
            points,
            cursor: self.cursor,
            raw_value,
            meets_minimum,
        })
    }

    /// Look up a finalized measurement
    pub fn get(&self, id: MeasurementId) -> Option<&FinalizedMeasurement> {
        self.finalized.iter().find(|m| m.id() == id)
    }
}

/// Captured length after dropping a duplicated trailing point
fn effective_len(points: &[GeoPoint]) -> usize {
    match points {
        [.., a, b] if a == b => points.len() - 1,
        _ => points.len(),
    }
}
