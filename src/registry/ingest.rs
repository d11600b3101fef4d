use super::{FileId, Registry};
use crate::error::GeoShareError;
use crate::models::bundle::BundleFile;
use crate::traits::RenderSurface;
use serde_json::Value;
use std::path::Path;

const EXTENSIONS: [&str; 2] = ["geojson", "json"];

/// A file handed over by the user, not yet parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub contents: String,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

/// Outcome of loading several files at once. Failures never stop the batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub added: Vec<FileId>,
    pub errors: Vec<GeoShareError>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    fn record(&mut self, result: Result<FileId, GeoShareError>) {
        match result {
            Ok(id) => self.added.push(id),
            Err(err) => {
                tracing::warn!(error = %err, "file rejected");
                self.errors.push(err);
            }
        }
    }
}

pub fn has_geojson_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|s| s.to_str())
        .map(|ext| EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Extension and JSON syntax checks. The FeatureCollection check is left to
/// [`Registry::add_file`].
pub fn parse_upload(file: &UploadedFile) -> Result<Value, GeoShareError> {
    if !has_geojson_extension(&file.name) {
        return Err(GeoShareError::InvalidFileType {
            name: file.name.clone(),
        });
    }
    serde_json::from_str(&file.contents).map_err(|source| GeoShareError::ParseFailure {
        name: file.name.clone(),
        source,
    })
}

impl<R: RenderSurface> Registry<R> {
    /// Load user files one by one, collecting per-file errors.
    pub fn ingest_batch(&mut self, files: impl IntoIterator<Item = UploadedFile>) -> BatchReport {
        let mut report = BatchReport::default();
        for file in files {
            let result =
                parse_upload(&file).and_then(|geojson| self.ingest_value(file.name, geojson));
            report.record(result);
        }
        report
    }

    /// Replay the files of a shared bundle.
    pub fn ingest_bundle(&mut self, files: impl IntoIterator<Item = BundleFile>) -> BatchReport {
        let mut report = BatchReport::default();
        for file in files {
            report.record(self.ingest_value(file.name, file.geojson));
        }
        report
    }

    fn ingest_value(&mut self, name: String, geojson: Value) -> Result<FileId, GeoShareError> {
        self.add_file(name, geojson).map(|entry| entry.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessSurface;
    use serde_json::json;

    const VALID: &str = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [10, 20]}}
    ]}"#;

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(has_geojson_extension("a.geojson"));
        assert!(has_geojson_extension("A.JSON"));
        assert!(has_geojson_extension("dir/x.GeoJSON"));
        assert!(!has_geojson_extension("a.kml"));
        assert!(!has_geojson_extension("geojson"));
        assert!(!has_geojson_extension("a.json.txt"));
    }

    #[test]
    fn one_bad_file_does_not_stop_the_batch() {
        let mut reg = Registry::new(HeadlessSurface::new());
        let report = reg.ingest_batch(vec![
            UploadedFile::new("roads.kml", VALID),
            UploadedFile::new("points.geojson", VALID),
        ]);
        assert_eq!(reg.len(), 1);
        assert_eq!(report.added.len(), 1);
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(
            &report.errors[0],
            GeoShareError::InvalidFileType { name } if name == "roads.kml"
        ));
        assert_eq!(reg.list_files()[0].name, "points.geojson");
    }

    #[test]
    fn each_failure_kind_is_reported() {
        let mut reg = Registry::new(HeadlessSurface::new());
        let report = reg.ingest_batch(vec![
            UploadedFile::new("broken.json", "{ not json"),
            UploadedFile::new("feature.json", r#"{"type": "Feature"}"#),
            UploadedFile::new("ok.json", VALID),
        ]);
        assert!(matches!(report.errors[0], GeoShareError::ParseFailure { .. }));
        assert!(matches!(report.errors[1], GeoShareError::SchemaMismatch { .. }));
        assert_eq!(report.added.len(), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn bundle_replay_uses_the_same_checks() {
        let mut reg = Registry::new(HeadlessSurface::new());
        let report = reg.ingest_bundle(vec![
            BundleFile {
                name: "a.geojson".into(),
                geojson: serde_json::from_str(VALID).unwrap(),
            },
            BundleFile {
                name: "b.geojson".into(),
                geojson: json!({"type": "Topology"}),
            },
        ]);
        assert_eq!(report.added.len(), 1);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(reg.list_files()[0].bounds.unwrap().min().lng, 10.0);
    }
}
