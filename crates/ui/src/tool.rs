//! Measurement tool facade
//!
//! [`MeasureTool`] is the surface the surrounding UI talks to. It owns the
//! session, routes viewport events through the [`InputAdapter`], keeps the
//! overlay reconciled through the [`RenderProjector`] and persists unit
//! choices through a [`PreferenceStore`].

use crate::input::{InputAdapter, InputStats, MapEvent};
use crate::projector::{OverlayStyle, RenderProjector};
use crate::scene::OverlayRenderer;
use crate::toolbar::{button_state, ButtonState, ToolbarButton};
use mapmeasure_core::{
    FinalizedMeasurement, MeasureConfig, MeasureError, MeasurementId, MeasurementMode,
    MeasurementSession, PreferenceStore, QuantityKind, SessionEffect, UnitSelection,
};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Read-only view of a finalized measurement for listing in the UI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementView {
    pub id: MeasurementId,
    pub sequence: u64,
    pub mode: MeasurementMode,
    /// Value in meters or square meters
    pub raw_value: f64,
    /// Value converted to the selected unit
    pub display_value: f64,
    /// Formatted label text
    pub label: String,
    pub point_count: usize,
}

impl MeasurementView {
    fn new(measurement: &FinalizedMeasurement, units: &UnitSelection) -> Self {
        let mode = measurement.mode();
        let raw_value = measurement.raw_value();
        Self {
            id: measurement.id(),
            sequence: measurement.sequence(),
            mode,
            raw_value,
            display_value: units.spec_for(mode).convert(raw_value),
            label: units.format(mode, raw_value),
            point_count: measurement.points().len(),
        }
    }
}

/// Interactive distance and area measuring tool
pub struct MeasureTool<R: OverlayRenderer, S: PreferenceStore> {
    session: MeasurementSession,
    input: InputAdapter,
    projector: RenderProjector,
    units: UnitSelection,
    default_units: UnitSelection,
    store: S,
    renderer: R,
}

impl<R: OverlayRenderer, S: PreferenceStore> MeasureTool<R, S> {
    /// Create an inactive tool, restoring stored units when available
    pub fn new(config: &MeasureConfig, style: OverlayStyle, renderer: R, store: S) -> Self {
        let default_units = config.default_units;
        let units = load_units(&store, default_units);
        Self {
            session: MeasurementSession::new(config.sphere()),
            input: InputAdapter::new(),
            projector: RenderProjector::new(config, style),
            units,
            default_units,
            store,
            renderer,
        }
    }

    /// Enter collecting mode for `mode`, discarding any unfinished shape
    pub fn activate(&mut self, mode: MeasurementMode) {
        let effect = self.session.activate(mode);
        self.project(effect);
    }

    /// Mode button pressed
    ///
    /// Pressing the button of the active mode finishes the shape when it has
    /// enough points and does nothing otherwise. Any other mode is activated.
    pub fn toggle_button_pressed(&mut self, mode: MeasurementMode) {
        if self.session.active_mode() == Some(mode) {
            let effect = self.session.finalize();
            self.project(effect);
        } else {
            self.activate(mode);
        }
    }

    /// Select the display unit for `kind`
    ///
    /// Unknown symbols leave the selection unchanged. Labels are re-rendered
    /// from stored values; nothing is recomputed.
    pub fn set_unit(&mut self, kind: QuantityKind, symbol: &str) -> Result<(), MeasureError> {
        if let Err(error) = self.units.set(kind, symbol) {
            warn!(%kind, symbol, "ignoring unknown unit");
            return Err(error);
        }
        debug!(%kind, symbol, "display unit changed");

        if let Err(error) = self.store.save_units(&self.units) {
            warn!(%error, "failed to persist unit selection");
        }
        self.project(SessionEffect::UnitsChanged);
        Ok(())
    }

    /// Remove all measurements and the shape in progress; mode is kept
    pub fn clear_all(&mut self) {
        let effect = self.session.clear_all();
        self.project(effect);
    }

    /// Clear everything and leave collecting mode
    ///
    /// The unit selection is restored from the store, falling back to the
    /// configured defaults.
    pub fn deactivate(&mut self) {
        let effect = self.session.deactivate();
        self.units = load_units(&self.store, self.default_units);
        self.project(effect);
        info!("measurement tool closed");
    }

    /// Feed one viewport event
    pub fn handle_event(&mut self, event: MapEvent) {
        let effect = self.input.handle(event, &mut self.session);
        self.project(effect);
    }

    /// Toolbar button pressed
    pub fn press(&mut self, button: ToolbarButton) {
        if !self.button_state(button).enabled {
            debug!(?button, "ignoring press on disabled button");
            return;
        }
        match button {
            ToolbarButton::MeasureDistance | ToolbarButton::MeasureArea => {
                if let Some(mode) = button.mode() {
                    self.toggle_button_pressed(mode);
                }
            }
            ToolbarButton::Finish => {
                let effect = self.session.finalize();
                self.project(effect);
            }
            ToolbarButton::Clear => self.clear_all(),
            ToolbarButton::Close => self.deactivate(),
        }
    }

    pub fn button_state(&self, button: ToolbarButton) -> ButtonState {
        button_state(button, &self.session)
    }

    pub fn active_mode(&self) -> Option<MeasurementMode> {
        self.session.active_mode()
    }

    /// Points captured for the shape in progress
    pub fn point_count(&self) -> usize {
        self.session.point_count()
    }

    pub fn finalized_count(&self) -> usize {
        self.session.finalized_count()
    }

    /// Whether the clear action has anything to remove
    pub fn can_clear(&self) -> bool {
        self.session.has_content()
    }

    pub fn can_finish(&self) -> bool {
        self.session.can_finalize()
    }

    pub fn unit_selection(&self) -> UnitSelection {
        self.units
    }

    /// Finalized measurements in creation order, formatted with current units
    pub fn measurements(&self) -> Vec<MeasurementView> {
        self.session
            .finalized()
            .iter()
            .map(|m| MeasurementView::new(m, &self.units))
            .collect()
    }

    pub fn input_stats(&self) -> InputStats {
        self.input.stats()
    }

    pub fn session(&self) -> &MeasurementSession {
        &self.session
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn project(&mut self, effect: SessionEffect) {
        self.projector.apply(effect, &self.session, &self.units, &mut self.renderer);
    }
}

impl<R: OverlayRenderer, S: PreferenceStore> Drop for MeasureTool<R, S> {
    /// Remove every overlay the tool drew from the shared renderer
    fn drop(&mut self) {
        self.projector.reset(&mut self.renderer);
    }
}

fn load_units<S: PreferenceStore>(store: &S, fallback: UnitSelection) -> UnitSelection {
    match store.load_units() {
        Ok(Some(units)) => units,
        Ok(None) => fallback,
        Err(error) => {
            warn!(%error, "failed to load unit preferences, using defaults");
            fallback
        }
    }
}
