use crate::error::RenderError;
use crate::models::geometry::{Bounds, LngLat};
use crate::models::layer::LayerSet;
use serde_json::{Map, Value};

/// Padding and animation used when the view is framed to an extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameOptions {
    pub padding: u32,
    pub duration_ms: u64,
}

impl Default for FrameOptions {
    fn default() -> Self {
        FrameOptions {
            padding: 40,
            duration_ms: 500,
        }
    }
}

/// A feature reported by a rendering surface under a queried point.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFeature {
    pub layer_id: String,
    pub source_id: String,
    pub geometry_type: String,
    pub properties: Map<String, Value>,
}

/// The map engine, seen only through declarative sources and layers.
pub trait RenderSurface {
    /// Add one GeoJSON source and its styled layers. On error nothing of the set may remain.
    fn create_layer_set(&mut self, set: &LayerSet, data: &Value) -> Result<(), RenderError>;

    /// Remove the set's layers then its source. Missing objects are ignored.
    fn destroy_layer_set(&mut self, set: &LayerSet);

    fn set_visibility(&mut self, set: &LayerSet, visible: bool);

    /// Features drawn at `point`, restricted to `layer_ids`, topmost first.
    fn query_at(&self, point: LngLat, layer_ids: &[String]) -> Vec<RenderedFeature>;

    fn frame(&mut self, bounds: Bounds, options: FrameOptions);
}
