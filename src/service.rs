use crate::error::BundleError;
use crate::models::bundle::{Bundle, BundleFile};
use crate::traits::BundleStore;
use crate::utils::ids::{is_valid_id, short_id};
use serde_json::Value;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

pub struct BundleService {
    store: Arc<dyn BundleStore>,
    id_length: usize,
}

impl BundleService {
    pub fn new(store: Arc<dyn BundleStore>, id_length: usize) -> Self {
        Self { store, id_length }
    }

    /// Validate and persist a share request body, returning the new id.
    pub async fn create_bundle(&self, body: Value) -> Result<String, BundleError> {
        let files = validate_share_request(body)?;
        let id = short_id(self.id_length);
        let count = files.len();
        self.store
            .put(
                id.clone(),
                Bundle {
                    files,
                    created_at: now_millis(),
                },
            )
            .await;
        let stored = self.store.count().await;
        tracing::info!(%id, files = count, stored, "bundle created");
        Ok(id)
    }

    pub async fn get_bundle(&self, id: &str) -> Result<Arc<Bundle>, BundleError> {
        if !is_valid_id(id) {
            return Err(BundleError::NotFound);
        }
        match self.store.get(id).await {
            Some(bundle) => Ok(bundle),
            None => {
                tracing::debug!(%id, "bundle not found");
                Err(BundleError::NotFound)
            }
        }
    }
}

/// Check the shape `{ files: [{ name: string, geojson: FeatureCollection }] }`.
pub fn validate_share_request(body: Value) -> Result<Vec<BundleFile>, BundleError> {
    let invalid = |msg: String| BundleError::InvalidPayload(msg);

    let Value::Object(mut body) = body else {
        return Err(invalid("body must be a JSON object".into()));
    };
    let Some(Value::Array(entries)) = body.remove("files") else {
        return Err(invalid("'files' must be an array".into()));
    };
    if entries.is_empty() {
        return Err(invalid("'files' must not be empty".into()));
    }

    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let Value::Object(mut entry) = entry else {
                return Err(invalid(format!("files[{i}] must be an object")));
            };
            let name = match entry.remove("name") {
                Some(Value::String(name)) => name,
                _ => return Err(invalid(format!("files[{i}].name must be a string"))),
            };
            let geojson = entry.remove("geojson").unwrap_or(Value::Null);
            if !is_feature_collection(&geojson) {
                return Err(invalid(format!(
                    "files[{i}].geojson must be a FeatureCollection"
                )));
            }
            Ok(BundleFile { name, geojson })
        })
        .collect()
}

pub fn is_feature_collection(geojson: &Value) -> bool {
    geojson.get("type").and_then(Value::as_str) == Some("FeatureCollection")
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
