//! Input handling for the measurement tool
//!
//! Translates raw map viewport events into session transitions:
//! - Pointer move updates the live preview cursor
//! - Click captures a point
//! - Double-click finishes the shape
//! - Right-click and Escape cancel the shape in progress
//!
//! The viewport reports a double-click as `click, click, dblclick`, so the
//! double-clicked position arrives twice before the finish request. The
//! session's finalize step drops that duplicate; the adapter passes every
//! click through unchanged.

use mapmeasure_core::{GeoPoint, MeasurementSession, SessionEffect};
use tracing::{debug, trace};

/// Keyboard keys the tool reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Escape,
    /// Any key the tool does not handle
    #[serde(other)]
    Other,
}

/// Raw input event from the map viewport
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapEvent {
    PointerMove(GeoPoint),
    Click(GeoPoint),
    DoubleClick(GeoPoint),
    RightClick(GeoPoint),
    PointerLeave,
    Key(Key),
}

impl MapEvent {
    /// Geographic position carried by the event, if any
    pub fn position(&self) -> Option<GeoPoint> {
        match self {
            MapEvent::PointerMove(p)
            | MapEvent::Click(p)
            | MapEvent::DoubleClick(p)
            | MapEvent::RightClick(p) => Some(*p),
            MapEvent::PointerLeave | MapEvent::Key(_) => None,
        }
    }
}

/// Per-kind counters of handled events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputStats {
    pub pointer_moves: u64,
    pub clicks: u64,
    pub double_clicks: u64,
    pub cancels: u64,
    pub rejected: u64,
}

/// Routes viewport events to a [`MeasurementSession`]
///
/// The session is borrowed mutably for the duration of each call, so a
/// transition always completes before the next event can reach the session.
#[derive(Debug, Default)]
pub struct InputAdapter {
    stats: InputStats,
}

impl InputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> InputStats {
        self.stats
    }

    /// Dispatch one event
    pub fn handle(&mut self, event: MapEvent, session: &mut MeasurementSession) -> SessionEffect {
        if let Some(position) = event.position() {
            if !position.is_finite() {
                self.stats.rejected += 1;
                debug!(?event, "ignoring event with non-finite coordinates");
                return SessionEffect::None;
            }
        }

        match event {
            MapEvent::PointerMove(p) => self.on_pointer_move(p, session),
            MapEvent::Click(p) => self.on_click(p, session),
            MapEvent::DoubleClick(p) => self.on_double_click(p, session),
            MapEvent::RightClick(_) => self.on_cancel(session),
            MapEvent::PointerLeave => self.on_pointer_leave(session),
            MapEvent::Key(key) => self.on_key(key, session),
        }
    }

    /// Handle pointer motion
    pub fn on_pointer_move(
        &mut self,
        point: GeoPoint,
        session: &mut MeasurementSession,
    ) -> SessionEffect {
        self.stats.pointer_moves += 1;
        session.move_cursor(point)
    }

    /// Handle a single click
    pub fn on_click(&mut self, point: GeoPoint, session: &mut MeasurementSession) -> SessionEffect {
        self.stats.clicks += 1;
        session.add_point(point)
    }

    /// Handle a double-click: finish the current shape
    ///
    /// The clicks that make up the double-click were already captured.
    pub fn on_double_click(
        &mut self,
        point: GeoPoint,
        session: &mut MeasurementSession,
    ) -> SessionEffect {
        self.stats.double_clicks += 1;
        trace!(%point, points = session.point_count(), "double-click finish request");
        session.finalize()
    }

    /// Handle pointer leaving the map
    pub fn on_pointer_leave(&mut self, session: &mut MeasurementSession) -> SessionEffect {
        session.clear_cursor()
    }

    /// Handle a key press
    pub fn on_key(&mut self, key: Key, session: &mut MeasurementSession) -> SessionEffect {
        match key {
            Key::Escape => self.on_cancel(session),
            Key::Other => SessionEffect::None,
        }
    }

    fn on_cancel(&mut self, session: &mut MeasurementSession) -> SessionEffect {
        self.stats.cancels += 1;
        session.cancel_in_progress()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapmeasure_core::MeasurementMode;

    fn p(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon)
    }

    fn collecting(mode: MeasurementMode) -> MeasurementSession {
        let mut session = MeasurementSession::default();
        session.activate(mode);
        session
    }

    #[test]
    fn test_pointer_move_updates_cursor_only() {
        let mut input = InputAdapter::new();
        let mut session = collecting(MeasurementMode::Distance);

        let effect = input.handle(MapEvent::PointerMove(p(1.0, 2.0)), &mut session);
        assert_eq!(effect, SessionEffect::PreviewChanged);
        assert_eq!(session.cursor(), Some(p(1.0, 2.0)));
        assert_eq!(session.point_count(), 0);
    }

    #[test]
    fn test_double_click_sequence_finalizes_without_duplicate() {
        let mut input = InputAdapter::new();
        let mut session = collecting(MeasurementMode::Distance);

        input.handle(MapEvent::Click(p(0.0, 0.0)), &mut session);
        // Physical double-click at the end point
        input.handle(MapEvent::Click(p(0.0, 0.01)), &mut session);
        input.handle(MapEvent::Click(p(0.0, 0.01)), &mut session);
        let effect = input.handle(MapEvent::DoubleClick(p(0.0, 0.01)), &mut session);

        assert!(matches!(effect, SessionEffect::Finalized { .. }));
        assert_eq!(session.finalized()[0].points(), &[p(0.0, 0.0), p(0.0, 0.01)]);
        assert_eq!(session.point_count(), 0);
    }

    #[test]
    fn test_double_click_below_minimum_keeps_points() {
        let mut input = InputAdapter::new();
        let mut session = collecting(MeasurementMode::Distance);

        input.handle(MapEvent::Click(p(0.0, 0.0)), &mut session);
        input.handle(MapEvent::Click(p(0.0, 0.0)), &mut session);
        let effect = input.handle(MapEvent::DoubleClick(p(0.0, 0.0)), &mut session);

        assert_eq!(effect, SessionEffect::None);
        assert_eq!(session.finalized_count(), 0);
        assert_eq!(session.point_count(), 2);
    }

    #[test]
    fn test_right_click_and_escape_cancel() {
        let mut input = InputAdapter::new();
        let mut session = collecting(MeasurementMode::Area);

        input.handle(MapEvent::Click(p(0.0, 0.0)), &mut session);
        assert_eq!(
            input.handle(MapEvent::RightClick(p(0.0, 0.0)), &mut session),
            SessionEffect::InProgressCleared
        );
        assert_eq!(session.point_count(), 0);

        input.handle(MapEvent::Click(p(0.0, 0.0)), &mut session);
        assert_eq!(
            input.handle(MapEvent::Key(Key::Escape), &mut session),
            SessionEffect::InProgressCleared
        );
        // Cancelling with nothing captured is safe
        assert_eq!(input.handle(MapEvent::Key(Key::Escape), &mut session), SessionEffect::None);
        assert_eq!(session.active_mode(), Some(MeasurementMode::Area));
        assert_eq!(input.stats().cancels, 3);
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut input = InputAdapter::new();
        let mut session = collecting(MeasurementMode::Area);
        input.handle(MapEvent::Click(p(0.0, 0.0)), &mut session);
        assert_eq!(input.handle(MapEvent::Key(Key::Other), &mut session), SessionEffect::None);
        assert_eq!(session.point_count(), 1);
    }

    #[test]
    fn test_pointer_leave_clears_cursor() {
        let mut input = InputAdapter::new();
        let mut session = collecting(MeasurementMode::Distance);
        input.handle(MapEvent::PointerMove(p(1.0, 1.0)), &mut session);

        assert_eq!(input.handle(MapEvent::PointerLeave, &mut session), SessionEffect::PreviewChanged);
        assert_eq!(session.cursor(), None);
    }

    #[test]
    fn test_inactive_session_ignores_events() {
        let mut input = InputAdapter::new();
        let mut session = MeasurementSession::default();

        assert_eq!(input.handle(MapEvent::Click(p(0.0, 0.0)), &mut session), SessionEffect::None);
        assert_eq!(input.handle(MapEvent::DoubleClick(p(0.0, 0.0)), &mut session), SessionEffect::None);
        assert_eq!(session.point_count(), 0);
    }

    #[test]
    fn test_non_finite_coordinates_rejected() {
        let mut input = InputAdapter::new();
        let mut session = collecting(MeasurementMode::Distance);

        let effect = input.handle(MapEvent::Click(p(f64::NAN, 0.0)), &mut session);
        assert_eq!(effect, SessionEffect::None);
        assert_eq!(session.point_count(), 0);
        assert_eq!(input.stats().rejected, 1);
    }

    #[test]
    fn test_event_deserializes_from_json() {
        let event: MapEvent =
            serde_json::from_str(r#"{"click":{"lat":1.0,"lon":2.0}}"#).unwrap();
        assert_eq!(event, MapEvent::Click(p(1.0, 2.0)));

        let key: MapEvent = serde_json::from_str(r#"{"key":"escape"}"#).unwrap();
        assert_eq!(key, MapEvent::Key(Key::Escape));

        let other: MapEvent = serde_json::from_str(r#"{"key":"f5"}"#).unwrap();
        assert_eq!(other, MapEvent::Key(Key::Other));

        let leave: MapEvent = serde_json::from_str(r#""pointer_leave""#).unwrap();
        assert_eq!(leave, MapEvent::PointerLeave);
    }
}
