use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One named GeoJSON document inside a shared bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleFile {
    pub name: String,
    pub geojson: Value,
}

/// A persisted collection of files, as returned by `GET /api/view/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub files: Vec<BundleFile>,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
}

/// Body of `POST /api/share`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ShareRequest<'a> {
    pub files: &'a [BundleFile],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareResponse {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body of a 413 answer to a share request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TooLargeResponse {
    pub message: String,
    pub limit_bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::validate_share_request;
    use serde_json::json;

    #[test]
    fn share_request_passes_server_validation() {
        let files = vec![BundleFile {
            name: "a.geojson".into(),
            geojson: json!({"type": "FeatureCollection", "features": []}),
        }];
        let body = serde_json::to_value(ShareRequest { files: &files }).unwrap();
        assert_eq!(validate_share_request(body), Ok(files));
    }
}
