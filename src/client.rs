use crate::error::GeoShareError;
use crate::models::bundle::{
    Bundle, BundleFile, ErrorResponse, ShareRequest, ShareResponse, TooLargeResponse,
};
use crate::utils::ids::is_valid_id;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// HTTP client for the bundle endpoints of a geoshare server.
#[derive(Debug, Clone)]
pub struct ShareClient {
    http: reqwest::Client,
    base_url: String,
    /// Reported when the server answers 413 without saying what its limit is.
    max_payload_bytes: usize,
}

impl ShareClient {
    pub fn new(base_url: impl Into<String>, max_payload_bytes: usize) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            max_payload_bytes,
        }
    }

    /// Read-only link for a bundle id.
    pub fn share_url(&self, id: &str) -> String {
        format!("{}/v/{}", self.base_url, id)
    }

    pub async fn share(&self, files: &[BundleFile]) -> Result<String, GeoShareError> {
        let res = self
            .http
            .post(format!("{}/api/share", self.base_url))
            .json(&ShareRequest { files })
            .send()
            .await?;

        match res.status() {
            StatusCode::OK => Ok(decode::<ShareResponse>(res).await?.id),
            StatusCode::PAYLOAD_TOO_LARGE => {
                let limit_bytes = res
                    .json::<TooLargeResponse>()
                    .await
                    .map(|body| body.limit_bytes)
                    .unwrap_or(self.max_payload_bytes);
                Err(GeoShareError::PayloadTooLarge { limit_bytes })
            }
            status => Err(rejected(status, res).await),
        }
    }

    pub async fn fetch(&self, id: &str) -> Result<Bundle, GeoShareError> {
        if !is_valid_id(id) {
            return Err(GeoShareError::NotFound(id.to_string()));
        }
        let res = self
            .http
            .get(format!("{}/api/view/{}", self.base_url, id))
            .send()
            .await?;

        match res.status() {
            StatusCode::OK => decode::<Bundle>(res).await,
            StatusCode::NOT_FOUND => Err(GeoShareError::NotFound(id.to_string())),
            status => Err(rejected(status, res).await),
        }
    }
}

/// Transport errors while reading the body stay network failures; a body
/// that arrives but does not decode is the server's fault.
async fn decode<T: DeserializeOwned>(res: reqwest::Response) -> Result<T, GeoShareError> {
    let status = res.status().as_u16();
    let bytes = res.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| GeoShareError::UnexpectedResponse {
        status,
        reason: err.to_string(),
    })
}

async fn rejected(status: StatusCode, res: reqwest::Response) -> GeoShareError {
    let text = res.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    GeoShareError::Rejected {
        status: status.as_u16(),
        message,
    }
}

/// Split a share link such as `http://host:3001/v/AbC_12-x` into the server
/// base URL and the bundle id. A bare id yields no base URL.
pub fn parse_share_target(input: &str) -> Option<(Option<String>, String)> {
    let input = input.trim().trim_end_matches('/');
    match input.rsplit_once("/v/") {
        Some((base, id)) if is_valid_id(id) => {
            let base = (!base.is_empty()).then(|| base.to_string());
            Some((base, id.to_string()))
        }
        Some(_) => None,
        None if is_valid_id(input) => Some((None, input.to_string())),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_url_has_viewer_path() {
        let client = ShareClient::new("http://localhost:3001/", 1024);
        assert_eq!(client.share_url("abc"), "http://localhost:3001/v/abc");
    }

    #[test]
    fn parses_links_and_bare_ids() {
        assert_eq!(
            parse_share_target("http://localhost:3001/v/AbC_12-x"),
            Some((Some("http://localhost:3001".into()), "AbC_12-x".into()))
        );
        assert_eq!(parse_share_target("/v/abc/"), Some((None, "abc".into())));
        assert_eq!(parse_share_target("abc12345"), Some((None, "abc12345".into())));
        assert_eq!(parse_share_target("http://host/v/a.b"), None);
        assert_eq!(parse_share_target("http://host/map"), None);
    }

    #[tokio::test]
    async fn invalid_id_is_not_found_without_a_request() {
        // Nothing listens here; a request would be a network failure instead.
        let client = ShareClient::new("http://127.0.0.1:9", 1024);
        assert!(matches!(
            client.fetch("../secret").await,
            Err(GeoShareError::NotFound(_))
        ));
    }
}
