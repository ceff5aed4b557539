//! Measurement toolbar buttons and their enabled/active state

use mapmeasure_core::{MeasurementMode, MeasurementSession};

/// Represents a measurement toolbar button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolbarButton {
    /// Start or finish a distance measurement
    MeasureDistance,
    /// Start or finish an area measurement
    MeasureArea,
    /// Finish the shape in progress
    Finish,
    /// Remove all measurements
    Clear,
    /// Close the measurement panel
    Close,
}

impl ToolbarButton {
    pub const ALL: [ToolbarButton; 5] = [
        ToolbarButton::MeasureDistance,
        ToolbarButton::MeasureArea,
        ToolbarButton::Finish,
        ToolbarButton::Clear,
        ToolbarButton::Close,
    ];

    /// Mode toggled by this button, for the two mode buttons
    pub fn mode(&self) -> Option<MeasurementMode> {
        match self {
            ToolbarButton::MeasureDistance => Some(MeasurementMode::Distance),
            ToolbarButton::MeasureArea => Some(MeasurementMode::Area),
            _ => None,
        }
    }

    /// Hover text
    pub fn tooltip(&self) -> &'static str {
        match self {
            ToolbarButton::MeasureDistance => "Measure distance",
            ToolbarButton::MeasureArea => "Measure area",
            ToolbarButton::Finish => "Finish measurement",
            ToolbarButton::Clear => "Clear measurements",
            ToolbarButton::Close => "Close measuring tool",
        }
    }
}

/// Rendered state of a button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    /// Button accepts presses
    pub enabled: bool,
    /// Button is highlighted as the current mode
    pub active: bool,
}

/// Derive a button's state from the session
pub fn button_state(button: ToolbarButton, session: &MeasurementSession) -> ButtonState {
    match button {
        ToolbarButton::MeasureDistance | ToolbarButton::MeasureArea => ButtonState {
            enabled: true,
            active: button.mode() == session.active_mode(),
        },
        ToolbarButton::Finish => ButtonState { enabled: session.can_finalize(), active: false },
        ToolbarButton::Clear => ButtonState { enabled: session.has_content(), active: false },
        ToolbarButton::Close => ButtonState { enabled: session.is_collecting(), active: false },
    }
}
