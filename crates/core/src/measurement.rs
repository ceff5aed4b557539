//! Measurement modes and finalized measurement records
//!
//! Raw values are stored in base units (meters or square meters). Display
//! formatting is applied at render time from the current unit selection.

use crate::coordinate::GeoPoint;
use crate::geodesy::{self, Sphere};
use std::sync::Arc;

/// Unique identifier for measurements
pub type MeasurementId = uuid::Uuid;

/// Type of measurement being traced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementMode {
    /// Path length through the captured points
    Distance,
    /// Area enclosed by the captured points (ring closed implicitly)
    Area,
}

impl MeasurementMode {
    /// Minimum number of points a finalized shape needs
    pub fn min_points(&self) -> usize {
        match self {
            MeasurementMode::Distance => 2,
            MeasurementMode::Area => 3,
        }
    }

    /// Compute the raw value of `points` in base units
    pub fn compute(&self, sphere: &Sphere, points: &[GeoPoint]) -> f64 {
        match self {
            MeasurementMode::Distance => sphere.distance(points),
            MeasurementMode::Area => sphere.area(points),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementMode::Distance => "distance",
            MeasurementMode::Area => "area",
        }
    }
}

impl std::fmt::Display for MeasurementMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A committed measurement
///
/// Immutable once created; the owning session only ever drops it as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedMeasurement {
    /// Unique identifier
    id: MeasurementId,
    /// Mode the shape was traced in
    mode: MeasurementMode,
    /// Traced points, shared with render artifacts
    points: Arc<[GeoPoint]>,
    /// Computed value in base units
    raw_value: f64,
    /// Creation order within the session, starting at 1
    sequence: u64,
}

impl FinalizedMeasurement {
    pub(crate) fn new(
        mode: MeasurementMode,
        points: Vec<GeoPoint>,
        raw_value: f64,
        sequence: u64,
    ) -> Self {
        Self {
            id: MeasurementId::new_v4(),
            mode,
            points: points.into(),
            raw_value,
            sequence,
        }
    }

    pub fn id(&self) -> MeasurementId {
        self.id
    }

    pub fn mode(&self) -> MeasurementMode {
        self.mode
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Value in meters (distance) or square meters (area)
    pub fn raw_value(&self) -> f64 {
        self.raw_value
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Where the permanent label should be anchored
    ///
    /// Distance labels sit halfway along the path; area labels at the vertex
    /// centroid.
    pub fn label_position(&self, sphere: &Sphere) -> GeoPoint {
        let anchor = match self.mode {
            MeasurementMode::Distance => sphere.midpoint_along(&self.points),
            MeasurementMode::Area => geodesy::centroid(&self.points),
        };
        // Finalized shapes always have at least two points
        anchor.unwrap_or(GeoPoint::new(0.0, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_points() {
        assert_eq!(MeasurementMode::Distance.min_points(), 2);
        assert_eq!(MeasurementMode::Area.min_points(), 3);
    }

    #[test]
    fn test_compute_dispatches_by_mode() {
        let sphere = Sphere::default();
        let pts = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 0.01),
            GeoPoint::new(0.01, 0.01),
        ];
        assert_eq!(MeasurementMode::Distance.compute(&sphere, &pts), sphere.distance(&pts));
        assert_eq!(MeasurementMode::Area.compute(&sphere, &pts), sphere.area(&pts));
    }

    #[test]
    fn test_label_position_distance_midpoint() {
        let sphere = Sphere::default();
        let m = FinalizedMeasurement::new(
            MeasurementMode::Distance,
            vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.02)],
            0.0,
            1,
        );
        let pos = m.label_position(&sphere);
        assert!((pos.lon - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_label_position_area_centroid() {
        let sphere = Sphere::default();
        let m = FinalizedMeasurement::new(
            MeasurementMode::Area,
            vec![
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(0.0, 2.0),
                GeoPoint::new(2.0, 2.0),
                GeoPoint::new(2.0, 0.0),
            ],
            0.0,
            1,
        );
        assert_eq!(m.label_position(&sphere), GeoPoint::new(1.0, 1.0));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = FinalizedMeasurement::new(MeasurementMode::Distance, vec![], 0.0, 1);
        let b = FinalizedMeasurement::new(MeasurementMode::Distance, vec![], 0.0, 2);
        assert_ne!(a.id(), b.id());
    }
}
