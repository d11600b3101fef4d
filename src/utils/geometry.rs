use crate::models::geometry::{Bounds, LngLat};
use serde_json::Value;

/// A leaf whose first element is numeric but which is not a usable position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MalformedPosition;

/// Extent of every position in a `FeatureCollection`.
///
/// Features without a geometry, geometries without coordinates and
/// non-array coordinate members contribute nothing. A malformed position
/// (for example `[10]` or `[10, "north"]`) abandons the whole pass and the
/// collection is reported as having no bounds.
pub fn feature_collection_bounds(collection: &Value) -> Option<Bounds> {
    let mut bounds = Bounds::empty();
    let features = collection.get("features").and_then(Value::as_array)?;
    for feature in features {
        if let Some(geometry) = feature.get("geometry") {
            extend_geometry(&mut bounds, geometry).ok()?;
        }
    }
    non_empty(bounds)
}

/// Flatten a coordinate tree into its leaf positions.
pub fn extract_positions(coordinates: &Value) -> Vec<LngLat> {
    let mut out = Vec::new();
    // Malformed leaves are dropped here; only the bounds pass treats them as fatal
    let _ = walk(coordinates, &mut |p| out.push(p));
    out
}

fn non_empty(bounds: Bounds) -> Option<Bounds> {
    (!bounds.is_empty()).then_some(bounds)
}

fn extend_geometry(bounds: &mut Bounds, geometry: &Value) -> Result<(), MalformedPosition> {
    if let Some(coordinates) = geometry.get("coordinates") {
        walk(coordinates, &mut |p| bounds.extend(p))?;
    }
    if let Some(children) = geometry.get("geometries").and_then(Value::as_array) {
        for child in children {
            extend_geometry(bounds, child)?;
        }
    }
    Ok(())
}

fn walk(node: &Value, visit: &mut impl FnMut(LngLat)) -> Result<(), MalformedPosition> {
    let Some(items) = node.as_array() else {
        return Ok(());
    };
    match items.first() {
        None => Ok(()),
        Some(Value::Number(_)) => {
            let lng = items.first().and_then(Value::as_f64);
            let lat = items.get(1).and_then(Value::as_f64);
            match (lng, lat) {
                (Some(lng), Some(lat)) if lng.is_finite() && lat.is_finite() => {
                    visit(LngLat::new(lng, lat));
                    Ok(())
                }
                _ => Err(MalformedPosition),
            }
        }
        Some(_) => {
            for child in items {
                walk(child, visit)?;
            }
            Ok(())
        }
    }
}
