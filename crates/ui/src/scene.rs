//! Retained overlay scene for measurement graphics
//!
//! The map's drawing layer is an external collaborator. [`OverlayRenderer`] is
//! the narrow contract the measurement tool draws through, and
//! [`OverlayScene`] is an in-memory retained implementation used by the CLI
//! and tests. Primitives are positioned in geographic coordinates; projecting
//! them to screen space is the map engine's job.

use mapmeasure_core::GeoPoint;
use std::collections::BTreeMap;

/// Handle to a drawn overlay primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OverlayHandle(u64);

impl OverlayHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// RGBA color value
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create a new color from RGBA values (0.0 to 1.0)
    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new opaque color from RGB values
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

/// Line styling
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
    /// Dash pattern in pixels (on, off, ...); empty for a solid line
    pub dash: Vec<f32>,
}

impl Stroke {
    pub fn solid(color: Color, width: f32) -> Self {
        Self { color, width, dash: Vec::new() }
    }

    pub fn dashed(color: Color, width: f32, dash: Vec<f32>) -> Self {
        Self { color, width, dash }
    }

    pub fn is_dashed(&self) -> bool {
        !self.dash.is_empty()
    }
}

/// How a text label is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPlacement {
    /// Tooltip following the pointer
    Floating,
    /// Permanent label pinned to a map position
    Anchored,
}

/// Drawable overlay primitives
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlayPrimitive {
    /// Open path
    Polyline { points: Vec<GeoPoint>, stroke: Stroke },
    /// Closed ring with optional fill
    Polygon { points: Vec<GeoPoint>, stroke: Stroke, fill: Option<Color> },
    /// Vertex marker
    Marker { position: GeoPoint, radius: f32, color: Color },
    /// Text label
    Label { position: GeoPoint, text: String, placement: LabelPlacement },
}

impl OverlayPrimitive {
    pub fn kind(&self) -> &'static str {
        match self {
            OverlayPrimitive::Polyline { .. } => "polyline",
            OverlayPrimitive::Polygon { .. } => "polygon",
            OverlayPrimitive::Marker { .. } => "marker",
            OverlayPrimitive::Label { .. } => "label",
        }
    }

    /// Label text, if this primitive is a label
    pub fn text(&self) -> Option<&str> {
        match self {
            OverlayPrimitive::Label { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Drawing contract toward the map's rendering layer
pub trait OverlayRenderer {
    /// Add a primitive to the map and return its handle
    fn draw(&mut self, primitive: OverlayPrimitive) -> OverlayHandle;

    /// Replace the primitive behind `handle`
    fn update(&mut self, handle: OverlayHandle, primitive: OverlayPrimitive);

    /// Remove the primitive behind `handle` from the map
    fn remove(&mut self, handle: OverlayHandle);
}

/// Counters of renderer calls, for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct SceneStats {
    pub draws: u64,
    pub updates: u64,
    pub removes: u64,
}

/// In-memory retained overlay
#[derive(Debug, Default)]
pub struct OverlayScene {
    nodes: BTreeMap<OverlayHandle, OverlayPrimitive>,
    next_handle: u64,
    stats: SceneStats,
}

impl OverlayScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live primitives
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, handle: OverlayHandle) -> Option<&OverlayPrimitive> {
        self.nodes.get(&handle)
    }

    pub fn contains(&self, handle: OverlayHandle) -> bool {
        self.nodes.contains_key(&handle)
    }

    /// Live primitives in draw order
    pub fn primitives(&self) -> impl Iterator<Item = &OverlayPrimitive> {
        self.nodes.values()
    }

    /// Count of live primitives of one kind (see [`OverlayPrimitive::kind`])
    pub fn count_kind(&self, kind: &str) -> usize {
        self.nodes.values().filter(|p| p.kind() == kind).count()
    }

    /// Texts of all live labels in draw order
    pub fn label_texts(&self) -> Vec<&str> {
        self.nodes.values().filter_map(|p| p.text()).collect()
    }

    pub fn stats(&self) -> SceneStats {
        self.stats
    }

}

impl OverlayRenderer for OverlayScene {
    fn draw(&mut self, primitive: OverlayPrimitive) -> OverlayHandle {
        self.next_handle += 1;
        let handle = OverlayHandle(self.next_handle);
        self.nodes.insert(handle, primitive);
        self.stats.draws += 1;
        handle
    }

    fn update(&mut self, handle: OverlayHandle, primitive: OverlayPrimitive) {
        match self.nodes.get_mut(&handle) {
            Some(slot) => {
                *slot = primitive;
                self.stats.updates += 1;
            }
            None => tracing::warn!(handle = handle.raw(), "update of unknown overlay handle"),
        }
    }

    fn remove(&mut self, handle: OverlayHandle) {
        if self.nodes.remove(&handle).is_some() {
            self.stats.removes += 1;
        } else {
            tracing::warn!(handle = handle.raw(), "remove of unknown overlay handle");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(lat: f64) -> OverlayPrimitive {
        OverlayPrimitive::Marker {
            position: GeoPoint::new(lat, 0.0),
            radius: 4.0,
            color: Color::rgb(1.0, 0.0, 0.0),
        }
    }

    #[test]
    fn test_handles_are_unique() {
        let mut scene = OverlayScene::new();
        let a = scene.draw(marker(0.0));
        let b = scene.draw(marker(1.0));
        assert_ne!(a, b);
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn test_update_replaces_primitive() {
        let mut scene = OverlayScene::new();
        let h = scene.draw(marker(0.0));

        scene.update(h, marker(2.0));
        assert_eq!(scene.stats().updates, 1);
        assert_eq!(scene.get(h), Some(&marker(2.0)));
    }

    #[test]
    fn test_remove() {
        let mut scene = OverlayScene::new();
        let h = scene.draw(marker(0.0));
        scene.remove(h);
        assert!(scene.is_empty());
        assert!(!scene.contains(h));

        // Removing twice only counts once
        scene.remove(h);
        assert_eq!(scene.stats(), SceneStats { draws: 1, updates: 0, removes: 1 });
    }

    #[test]
    fn test_label_queries() {
        let mut scene = OverlayScene::new();
        scene.draw(marker(0.0));
        scene.draw(OverlayPrimitive::Label {
            position: GeoPoint::new(0.0, 0.0),
            text: "12 m".to_string(),
            placement: LabelPlacement::Anchored,
        });
        assert_eq!(scene.count_kind("marker"), 1);
        assert_eq!(scene.label_texts(), vec!["12 m"]);
    }

    #[test]
    fn test_stroke_dash() {
        let c = Color::rgb(0.0, 0.0, 0.0);
        assert!(!Stroke::solid(c, 2.0).is_dashed());
        assert!(Stroke::dashed(c, 2.0, vec![6.0, 4.0]).is_dashed());
    }
}
