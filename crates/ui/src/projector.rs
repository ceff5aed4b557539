//! Projects measurement session state onto the map overlay
//!
//! After every [`SessionEffect`] the projector reconciles the overlay with the
//! session: a dashed preview with a floating tooltip, a marker per captured
//! point, and a solid shape plus permanent label per finalized measurement.
//! Every handle it draws is removed once the state behind it is gone.

use crate::scene::{Color, LabelPlacement, OverlayHandle, OverlayPrimitive, OverlayRenderer, Stroke};
use mapmeasure_core::{
    FinalizedMeasurement, GeoPoint, MeasureConfig, MeasurementId, MeasurementMode,
    MeasurementSession, Preview, SessionEffect, UnitSelection,
};
use std::collections::HashSet;

/// Visual configuration for measurement overlays
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    /// Preview line color
    pub preview_color: Color,

    /// Finalized shape outline color
    pub finalized_color: Color,

    /// Fill for area shapes (preview uses a fainter variant)
    pub area_fill: Color,

    /// Line width in pixels
    pub stroke_width: f32,

    /// Dash pattern for preview lines
    pub preview_dash: Vec<f32>,

    /// Vertex marker color
    pub marker_color: Color,

    /// Vertex marker radius in pixels
    pub marker_radius: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            preview_color: Color::rgba(0.2, 0.4, 0.9, 0.9),
            finalized_color: Color::rgba(0.85, 0.2, 0.2, 1.0),
            area_fill: Color::rgba(0.85, 0.2, 0.2, 0.2),
            stroke_width: 2.0,
            preview_dash: vec![6.0, 4.0],
            marker_color: Color::rgb(1.0, 1.0, 1.0),
            marker_radius: 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct FinalizedOverlay {
    id: MeasurementId,
    shape: OverlayHandle,
    label: OverlayHandle,
}

/// Keeps the map overlay in step with a [`MeasurementSession`]
#[derive(Debug)]
pub struct RenderProjector {
    style: OverlayStyle,
    start_prompt: String,
    continue_prompt: String,
    preview_shape: Option<OverlayHandle>,
    tooltip: Option<OverlayHandle>,
    markers: Vec<(OverlayHandle, GeoPoint)>,
    finalized: Vec<FinalizedOverlay>,
}

impl RenderProjector {
    pub fn new(config: &MeasureConfig, style: OverlayStyle) -> Self {
        Self {
            style,
            start_prompt: config.start_prompt.clone(),
            continue_prompt: config.continue_prompt.clone(),
            preview_shape: None,
            tooltip: None,
            markers: Vec::new(),
            finalized: Vec::new(),
        }
    }

    /// Number of overlay handles currently owned
    pub fn live_handles(&self) -> usize {
        self.preview_shape.iter().count()
            + self.tooltip.iter().count()
            + self.markers.len()
            + self.finalized.len() * 2
    }

    /// Bring the overlay up to date after `effect`
    pub fn apply<R: OverlayRenderer>(
        &mut self,
        effect: SessionEffect,
        session: &MeasurementSession,
        units: &UnitSelection,
        renderer: &mut R,
    ) {
        match effect {
            SessionEffect::None => {}
            SessionEffect::PreviewChanged => {
                self.sync_preview(session, units, renderer);
            }
            SessionEffect::ModeChanged { .. }
            | SessionEffect::PointAdded { .. }
            | SessionEffect::InProgressCleared => {
                self.sync_markers(session, renderer);
                self.sync_preview(session, units, renderer);
            }
            SessionEffect::Finalized { .. }
            | SessionEffect::AllCleared
            | SessionEffect::Deactivated => {
                self.sync_finalized(session, units, renderer);
                self.sync_markers(session, renderer);
                self.sync_preview(session, units, renderer);
            }
            SessionEffect::UnitsChanged => {
                self.relabel_finalized(session, units, renderer);
                self.sync_preview(session, units, renderer);
            }
        }
    }

    /// Remove every overlay this projector drew
    pub fn reset<R: OverlayRenderer>(&mut self, renderer: &mut R) {
        for handle in self.preview_shape.take().into_iter().chain(self.tooltip.take()) {
            renderer.remove(handle);
        }
        for (handle, _) in self.markers.drain(..) {
            renderer.remove(handle);
        }
        for overlay in self.finalized.drain(..) {
            renderer.remove(overlay.shape);
            renderer.remove(overlay.label);
        }
    }

    fn sync_markers<R: OverlayRenderer>(&mut self, session: &MeasurementSession, renderer: &mut R) {
        let captured = session.captured();

        let keep = self
            .markers
            .iter()
            .zip(captured)
            .take_while(|((_, drawn), point)| drawn == *point)
            .count();

        for (handle, _) in self.markers.drain(keep..) {
            renderer.remove(handle);
        }

        for point in &captured[keep..] {
            let handle = renderer.draw(OverlayPrimitive::Marker {
                position: *point,
                radius: self.style.marker_radius,
                color: self.style.marker_color,
            });
            self.markers.push((handle, *point));
        }
    }

    fn sync_preview<R: OverlayRenderer>(
        &mut self,
        session: &MeasurementSession,
        units: &UnitSelection,
        renderer: &mut R,
    ) {
        let preview = session.preview();

        let shape = preview.as_ref().and_then(|p| self.preview_primitive(p));
        upsert(&mut self.preview_shape, shape, renderer);

        let tooltip = preview.as_ref().and_then(|p| {
            let position = p.tooltip_anchor()?;
            let text = self.tooltip_text(p, session.point_count(), units);
            Some(OverlayPrimitive::Label { position, text, placement: LabelPlacement::Floating })
        });
        upsert(&mut self.tooltip, tooltip, renderer);
    }

    fn preview_primitive(&self, preview: &Preview) -> Option<OverlayPrimitive> {
        if preview.points.len() < 2 {
            return None;
        }
        let stroke = Stroke::dashed(
            self.style.preview_color,
            self.style.stroke_width,
            self.style.preview_dash.clone(),
        );
        let points = preview.points.clone();
        Some(match preview.mode {
            MeasurementMode::Area if points.len() >= 3 => OverlayPrimitive::Polygon {
                points,
                stroke,
                fill: Some(self.style.area_fill.with_alpha(self.style.area_fill.a * 0.5)),
            },
            _ => OverlayPrimitive::Polyline { points, stroke },
        })
    }

    fn tooltip_text(&self, preview: &Preview, captured: usize, units: &UnitSelection) -> String {
        if captured == 0 {
            self.start_prompt.clone()
        } else if !preview.meets_minimum {
            self.continue_prompt.clone()
        } else {
            units.format(preview.mode, preview.raw_value)
        }
    }

    fn sync_finalized<R: OverlayRenderer>(
        &mut self,
        session: &MeasurementSession,
        units: &UnitSelection,
        renderer: &mut R,
    ) {
        let live: HashSet<MeasurementId> = session.finalized().iter().map(|m| m.id()).collect();
        self.finalized.retain(|overlay| {
            let keep = live.contains(&overlay.id);
            if !keep {
                renderer.remove(overlay.shape);
                renderer.remove(overlay.label);
            }
            keep
        });

        let drawn: HashSet<MeasurementId> = self.finalized.iter().map(|o| o.id).collect();
        for measurement in session.finalized() {
            if drawn.contains(&measurement.id()) {
                continue;
            }
            let shape = renderer.draw(self.finalized_shape(measurement));
            let label = renderer.draw(finalized_label(measurement, session, units));
            self.finalized.push(FinalizedOverlay { id: measurement.id(), shape, label });
        }
    }

    fn relabel_finalized<R: OverlayRenderer>(
        &mut self,
        session: &MeasurementSession,
        units: &UnitSelection,
        renderer: &mut R,
    ) {
        for overlay in &self.finalized {
            if let Some(measurement) = session.get(overlay.id) {
                renderer.update(overlay.label, finalized_label(measurement, session, units));
            }
        }
    }

    fn finalized_shape(&self, measurement: &FinalizedMeasurement) -> OverlayPrimitive {
        let stroke = Stroke::solid(self.style.finalized_color, self.style.stroke_width);
        let points = measurement.points().to_vec();
        match measurement.mode() {
            MeasurementMode::Distance => OverlayPrimitive::Polyline { points, stroke },
            MeasurementMode::Area => {
                OverlayPrimitive::Polygon { points, stroke, fill: Some(self.style.area_fill) }
            }
        }
    }
}

fn finalized_label(
    measurement: &FinalizedMeasurement,
    session: &MeasurementSession,
    units: &UnitSelection,
) -> OverlayPrimitive {
    OverlayPrimitive::Label {
        position: measurement.label_position(session.sphere()),
        text: units.format(measurement.mode(), measurement.raw_value()),
        placement: LabelPlacement::Anchored,
    }
}

/// Draw, update or remove the primitive held in `slot`
fn upsert<R: OverlayRenderer>(
    slot: &mut Option<OverlayHandle>,
    primitive: Option<OverlayPrimitive>,
    renderer: &mut R,
) {
    match (*slot, primitive) {
        (Some(handle), Some(primitive)) => renderer.update(handle, primitive),
        (None, Some(primitive)) => *slot = Some(renderer.draw(primitive)),
        (Some(handle), None) => {
            renderer.remove(handle);
            *slot = None;
        }
        (None, None) => {}
    }
}
