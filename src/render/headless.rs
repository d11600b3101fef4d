use crate::error::RenderError;
use crate::models::geometry::{Bounds, LngLat};
use crate::models::layer::{LayerSet, LayerSpec};
use crate::traits::{FrameOptions, RenderSurface, RenderedFeature};
use crate::utils::geometry::extract_positions;
use serde_json::Value;
use std::collections::HashMap;

/// Display state of one layer held by the headless surface.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessLayer {
    pub spec: LayerSpec,
    pub source_id: String,
    pub visible: bool,
}

/// In-memory rendering surface. Keeps the declarative state a map engine
/// would hold and answers point queries by hit-testing the source data.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    sources: HashMap<String, Value>,
    /// Bottom to top.
    layers: Vec<HeadlessLayer>,
    view: Option<(Bounds, FrameOptions)>,
    frame_count: usize,
    /// Pick radius in degrees for points and lines.
    pick_tolerance: f64,
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::with_tolerance(0.01)
    }

    pub fn with_tolerance(pick_tolerance: f64) -> Self {
        Self {
            sources: HashMap::new(),
            layers: Vec::new(),
            view: None,
            frame_count: 0,
            pick_tolerance,
        }
    }

    pub fn source_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.sources.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Layer ids in z-order, bottom first.
    pub fn layer_ids(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.spec.id.as_str()).collect()
    }

    pub fn layer(&self, id: &str) -> Option<&HeadlessLayer> {
        self.layers.iter().find(|l| l.spec.id == id)
    }

    pub fn view(&self) -> Option<Bounds> {
        self.view.map(|(b, _)| b)
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    fn hit(&self, geometry: &Value, point: LngLat) -> bool {
        let Some(coordinates) = geometry.get("coordinates") else {
            return false;
        };
        let tol = self.pick_tolerance;
        match geometry.get("type").and_then(Value::as_str) {
            Some("Point") => extract_positions(coordinates)
                .first()
                .is_some_and(|p| distance(*p, point) <= tol),
            Some("LineString") => extract_positions(coordinates)
                .windows(2)
                .any(|seg| segment_distance(point, seg[0], seg[1]) <= tol),
            Some("Polygon") => polygon_contains(coordinates, point),
            _ => false,
        }
    }
}

impl RenderSurface for HeadlessSurface {
    fn create_layer_set(&mut self, set: &LayerSet, data: &Value) -> Result<(), RenderError> {
        if self.sources.contains_key(&set.source_id) {
            return Err(RenderError::DuplicateSource(set.source_id.clone()));
        }
        if let Some(dup) = set.layers.iter().find(|l| self.layer(&l.id).is_some()) {
            return Err(RenderError::DuplicateLayer(dup.id.clone()));
        }

        self.sources.insert(set.source_id.clone(), data.clone());
        self.layers.extend(set.layers.iter().map(|spec| HeadlessLayer {
            spec: spec.clone(),
            source_id: set.source_id.clone(),
            visible: true,
        }));
        Ok(())
    }

    fn destroy_layer_set(&mut self, set: &LayerSet) {
        self.layers
            .retain(|l| !set.layers.iter().any(|spec| spec.id == l.spec.id));
        self.sources.remove(&set.source_id);
    }

    fn set_visibility(&mut self, set: &LayerSet, visible: bool) {
        for layer in self
            .layers
            .iter_mut()
            .filter(|l| set.layers.iter().any(|spec| spec.id == l.spec.id))
        {
            layer.visible = visible;
        }
    }

    fn query_at(&self, point: LngLat, layer_ids: &[String]) -> Vec<RenderedFeature> {
        let mut found = Vec::new();
        for layer in self.layers.iter().rev() {
            if !layer.visible || !layer_ids.iter().any(|id| *id == layer.spec.id) {
                continue;
            }
            let Some(features) = self
                .sources
                .get(&layer.source_id)
                .and_then(|data| data.get("features"))
                .and_then(Value::as_array)
            else {
                continue;
            };
            for feature in features {
                let Some(geometry) = feature.get("geometry").filter(|g| g.is_object()) else {
                    continue;
                };
                let geometry_type = geometry
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                if !layer.spec.filter.matches(geometry_type) || !self.hit(geometry, point) {
                    continue;
                }
                found.push(RenderedFeature {
                    layer_id: layer.spec.id.clone(),
                    source_id: layer.source_id.clone(),
                    geometry_type: geometry_type.to_string(),
                    properties: feature
                        .get("properties")
                        .and_then(Value::as_object)
                        .cloned()
                        .unwrap_or_default(),
                });
            }
        }
        found
    }

    fn frame(&mut self, bounds: Bounds, options: FrameOptions) {
        self.view = Some((bounds, options));
        self.frame_count += 1;
    }
}

fn distance(a: LngLat, b: LngLat) -> f64 {
    ((a.lng - b.lng).powi(2) + (a.lat - b.lat).powi(2)).sqrt()
}

fn segment_distance(p: LngLat, a: LngLat, b: LngLat) -> f64 {
    let (dx, dy) = (b.lng - a.lng, b.lat - a.lat);
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return distance(p, a);
    }
    let t = (((p.lng - a.lng) * dx + (p.lat - a.lat) * dy) / len2).clamp(0.0, 1.0);
    distance(p, LngLat::new(a.lng + t * dx, a.lat + t * dy))
}

/// Even-odd test across all rings, so holes fall out naturally.
fn polygon_contains(rings: &Value, p: LngLat) -> bool {
    let Some(rings) = rings.as_array() else {
        return false;
    };
    let mut inside = false;
    for ring in rings {
        let ring = extract_positions(ring);
        let n = ring.len();
        for i in 0..n {
            let (a, b) = (ring[i], ring[(i + n - 1) % n]);
            if (a.lat > p.lat) != (b.lat > p.lat)
                && p.lng < (b.lng - a.lng) * (p.lat - a.lat) / (b.lat - a.lat) + a.lng
            {
                inside = !inside;
            }
        }
    }
    inside
}
