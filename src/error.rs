use crate::config::HumanSize;
use std::borrow::Borrow;
use thiserror::Error;

/// Everything a user can be told went wrong while loading or sharing files.
#[derive(Debug, Error)]
pub enum GeoShareError {
    #[error("'{name}' is not a .geojson or .json file")]
    InvalidFileType { name: String },

    #[error("'{name}' is not valid JSON: {source}")]
    ParseFailure {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("'{name}' is not a GeoJSON FeatureCollection (found type {found})")]
    SchemaMismatch { name: String, found: String },

    #[error("Shared map '{0}' not found (maybe expired)")]
    NotFound(String),

    #[error("{}", too_large_message(.limit_bytes))]
    PayloadTooLarge { limit_bytes: usize },

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Server rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected response from server ({status}): {reason}")]
    UnexpectedResponse { status: u16, reason: String },

    #[error("Uploads are disabled in read-only view mode")]
    ReadOnly,

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl GeoShareError {
    /// Name of the file an ingestion error is about, if any.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            GeoShareError::InvalidFileType { name }
            | GeoShareError::ParseFailure { name, .. }
            | GeoShareError::SchemaMismatch { name, .. } => Some(name),
            _ => None,
        }
    }
}

pub fn too_large_message(limit_bytes: impl Borrow<usize>) -> String {
    format!(
        "Files are too large to share (limit is {})",
        HumanSize(*limit_bytes.borrow())
    )
}

/// Failure reported by a rendering surface.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("Source '{0}' already exists")]
    DuplicateSource(String),

    #[error("Layer '{0}' already exists")]
    DuplicateLayer(String),

    #[error("Rendering surface failure: {0}")]
    Surface(String),
}

/// Failure of a bundle store operation, mapped onto HTTP statuses by the endpoints.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BundleError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Not found")]
    NotFound,
}
