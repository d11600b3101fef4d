//! One map view: a registry plus the share/read-only behaviour around it.

use crate::client::ShareClient;
use crate::error::GeoShareError;
use crate::registry::{BatchReport, Registry, UploadedFile};
use crate::traits::RenderSurface;
use crate::utils::ids::is_valid_id;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewMode {
    Editable,
    /// Entered from any `/v/...` path. `segment` is the rest of the path,
    /// which may not be a well-formed id.
    ReadOnly { segment: String },
}

impl ViewMode {
    pub fn from_path(path: &str) -> Self {
        match path.strip_prefix("/v/") {
            Some(rest) => ViewMode::ReadOnly {
                segment: rest.to_string(),
            },
            None => ViewMode::Editable,
        }
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self, ViewMode::ReadOnly { .. })
    }

    pub fn bundle_id(&self) -> Option<&str> {
        match self {
            ViewMode::ReadOnly { segment } if is_valid_id(segment) => Some(segment),
            _ => None,
        }
    }
}

/// Result of a user upload: what loaded, and what became of the share link.
#[derive(Debug)]
pub struct UploadOutcome {
    pub report: BatchReport,
    /// `None` when nothing new was loaded and no share was attempted.
    pub share: Option<Result<String, GeoShareError>>,
}

pub struct Session<R: RenderSurface> {
    registry: Registry<R>,
    mode: ViewMode,
    share_link: Option<String>,
}

impl<R: RenderSurface> Session<R> {
    pub fn new(surface: R, path: &str) -> Self {
        Self {
            registry: Registry::new(surface),
            mode: ViewMode::from_path(path),
            share_link: None,
        }
    }

    pub fn mode(&self) -> &ViewMode {
        &self.mode
    }

    pub fn registry(&self) -> &Registry<R> {
        &self.registry
    }

    /// The most recent link successfully created for this view.
    pub fn share_link(&self) -> Option<&str> {
        self.share_link.as_deref()
    }

    /// Ingest a batch, then share everything loaded once the whole batch is in.
    ///
    /// Share failures are returned in the outcome instead of as an error, so
    /// the files stay on the map either way.
    pub async fn upload_batch(
        &mut self,
        client: &ShareClient,
        files: Vec<UploadedFile>,
    ) -> Result<UploadOutcome, GeoShareError> {
        if self.mode.is_read_only() {
            return Err(GeoShareError::ReadOnly);
        }

        let report = self.registry.ingest_batch(files);
        if report.added.is_empty() {
            return Ok(UploadOutcome {
                report,
                share: None,
            });
        }

        let share = client
            .share(&self.registry.share_files())
            .await
            .map(|id| client.share_url(&id));
        match &share {
            Ok(link) => {
                tracing::info!(%link, files = self.registry.len(), "share link created");
                self.share_link = Some(link.clone());
            }
            Err(err) => tracing::warn!(error = %err, "share failed"),
        }

        Ok(UploadOutcome {
            report,
            share: Some(share),
        })
    }

    /// Load the shared bundle named by a `/v/<id>` path.
    ///
    /// Errors are final for this view: nothing is loaded and nothing retried.
    /// Editable views have nothing to hydrate and return an empty report.
    pub async fn hydrate(&mut self, client: &ShareClient) -> Result<BatchReport, GeoShareError> {
        let id = match &self.mode {
            ViewMode::Editable => return Ok(BatchReport::default()),
            ViewMode::ReadOnly { segment } => segment.clone(),
        };

        // Malformed ids are refused by the client without a request
        let bundle = client.fetch(&id).await?;
        tracing::info!(%id, files = bundle.files.len(), "hydrating shared map");
        Ok(self.registry.ingest_bundle(bundle.files))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessSurface;

    #[test]
    fn view_mode_from_path() {
        assert_eq!(ViewMode::from_path("/"), ViewMode::Editable);
        assert_eq!(ViewMode::from_path("/map/v/abc"), ViewMode::Editable);
        assert_eq!(ViewMode::from_path("/v/AbC_12-x").bundle_id(), Some("AbC_12-x"));
        let nested = ViewMode::from_path("/v/abc/def");
        assert!(nested.is_read_only());
        assert_eq!(nested.bundle_id(), None);
    }

    #[tokio::test]
    async fn read_only_sessions_refuse_uploads() {
        let client = ShareClient::new("http://127.0.0.1:9", 1024);
        let mut session = Session::new(HeadlessSurface::new(), "/v/abc");
        let err = session
            .upload_batch(&client, vec![UploadedFile::new("a.json", "{}")])
            .await
            .unwrap_err();
        assert!(matches!(err, GeoShareError::ReadOnly));
        assert!(session.registry().is_empty());
    }

    #[tokio::test]
    async fn failed_batch_does_not_share() {
        let client = ShareClient::new("http://127.0.0.1:9", 1024);
        let mut session = Session::new(HeadlessSurface::new(), "/");
        let outcome = session
            .upload_batch(&client, vec![UploadedFile::new("a.txt", "{}")])
            .await
            .unwrap();
        assert!(outcome.share.is_none());
        assert_eq!(outcome.report.errors.len(), 1);
        assert_eq!(session.share_link(), None);
    }

    #[tokio::test]
    async fn malformed_view_path_fails_hydration() {
        let client = ShareClient::new("http://127.0.0.1:9", 1024);
        let mut session = Session::new(HeadlessSurface::new(), "/v/abc/def");
        let err = session.hydrate(&client).await.unwrap_err();
        assert!(matches!(err, GeoShareError::NotFound(ref id) if id == "abc/def"));
        assert!(err.to_string().contains("'abc/def'"));
        assert!(session.registry().is_empty());
    }
}
