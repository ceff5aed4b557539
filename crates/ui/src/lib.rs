//! Map Measurement UI Library
//!
//! Input routing, toolbar state and overlay projection for the measuring
//! tool. Rendering is abstracted behind [`scene::OverlayRenderer`].

pub mod input;
pub mod projector;
pub mod scene;
pub mod tool;
pub mod toolbar;

pub use input::{InputAdapter, InputStats, Key, MapEvent};
pub use projector::{OverlayStyle, RenderProjector};
pub use scene::{
    Color, LabelPlacement, OverlayHandle, OverlayPrimitive, OverlayRenderer, OverlayScene,
    SceneStats, Stroke,
};
pub use tool::{MeasureTool, MeasurementView};
pub use toolbar::{button_state, ButtonState, ToolbarButton};
