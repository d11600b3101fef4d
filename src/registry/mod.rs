//! Loaded files and the rendering objects bound to them.
//!
//! Every [`FileEntry`] owns exactly one source and four layers on the
//! [`RenderSurface`]. They are created together in [`Registry::add_file`] and
//! torn down together in [`Registry::remove_file`], so the surface never holds
//! a partial set for a file.

pub mod ingest;

use crate::error::GeoShareError;
use crate::models::bundle::BundleFile;
use crate::models::geometry::{Bounds, LngLat};
use crate::models::layer::LayerSet;
use crate::service::is_feature_collection;
use crate::traits::{FrameOptions, RenderSurface};
use crate::utils::geometry::feature_collection_bounds;
use serde_json::Value;
use std::fmt;

pub use ingest::{BatchReport, UploadedFile, has_geojson_extension};

/// Session-local file identifier. Never reused within a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(pub u64);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    pub id: FileId,
    pub name: String,
    pub geojson: Value,
    pub bounds: Option<Bounds>,
    pub visible: bool,
    layer_set: LayerSet,
}

impl FileEntry {
    pub fn source_id(&self) -> &str {
        &self.layer_set.source_id
    }

    pub fn layer_ids(&self) -> Vec<String> {
        self.layer_set.layer_ids()
    }

    pub fn feature_count(&self) -> usize {
        self.geojson
            .get("features")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Default,
    Pointer,
}

/// Property table shown for the feature under a click.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub at: LngLat,
    pub rows: Vec<(String, String)>,
}

impl Popup {
    pub fn to_html(&self) -> String {
        let rows: String = self
            .rows
            .iter()
            .map(|(k, v)| {
                format!(
                    r#"<tr><td class="key">{}</td><td>{}</td></tr>"#,
                    escape_html(k),
                    escape_html(v)
                )
            })
            .collect();
        format!(r#"<div class="popup"><table>{}</table></div>"#, rows)
    }
}

type ChangeListener = Box<dyn FnMut(&[FileEntry]) + Send>;

pub struct Registry<R: RenderSurface> {
    surface: R,
    files: Vec<FileEntry>,
    next_id: u64,
    /// Set by the first successful add; only that add may frame the view.
    loaded_once: bool,
    interactive_layers: Vec<String>,
    on_change: Option<ChangeListener>,
}

impl<R: RenderSurface> Registry<R> {
    pub fn new(surface: R) -> Self {
        Self {
            surface,
            files: Vec::new(),
            next_id: 1,
            loaded_once: false,
            interactive_layers: Vec::new(),
            on_change: None,
        }
    }

    /// Called with the full file list after every add, remove and toggle.
    pub fn set_on_change(&mut self, listener: impl FnMut(&[FileEntry]) + Send + 'static) {
        self.on_change = Some(Box::new(listener));
    }

    pub fn add_file(
        &mut self,
        name: impl Into<String>,
        geojson: Value,
    ) -> Result<&FileEntry, GeoShareError> {
        let name = name.into();
        if !is_feature_collection(&geojson) {
            let found = match geojson.get("type") {
                Some(Value::String(t)) => t.clone(),
                Some(other) => other.to_string(),
                None => "none".to_string(),
            };
            return Err(GeoShareError::SchemaMismatch { name, found });
        }

        let id = FileId(self.next_id);
        self.next_id += 1;

        let layer_set = LayerSet::for_source(format!("file-{}", id));
        if let Err(err) = self.surface.create_layer_set(&layer_set, &geojson) {
            self.surface.destroy_layer_set(&layer_set);
            return Err(err.into());
        }

        let bounds = feature_collection_bounds(&geojson);
        if !self.loaded_once {
            self.loaded_once = true;
            if let Some(bounds) = bounds {
                self.surface.frame(bounds, FrameOptions::default());
            }
        }

        tracing::debug!(%id, %name, ?bounds, "file added");
        let index = self.files.len();
        self.files.push(FileEntry {
            id,
            name,
            geojson,
            bounds,
            visible: true,
            layer_set,
        });
        self.refresh_interactions();
        self.notify();
        Ok(&self.files[index])
    }

    /// Remove a file and its rendering objects. Unknown ids are ignored.
    pub fn remove_file(&mut self, id: FileId) -> Option<FileEntry> {
        let index = self.files.iter().position(|f| f.id == id)?;
        self.surface.destroy_layer_set(&self.files[index].layer_set);
        let entry = self.files.remove(index);
        tracing::debug!(%id, name = %entry.name, "file removed");
        self.refresh_interactions();
        self.notify();
        Some(entry)
    }

    /// Flip visibility, returning the new state, or `None` for unknown ids.
    pub fn toggle_visibility(&mut self, id: FileId) -> Option<bool> {
        let entry = self.files.iter_mut().find(|f| f.id == id)?;
        entry.visible = !entry.visible;
        let visible = entry.visible;
        self.surface.set_visibility(&entry.layer_set, visible);
        self.notify();
        Some(visible)
    }

    /// Files in insertion order, which is also draw order.
    pub fn list_files(&self) -> &[FileEntry] {
        &self.files
    }

    pub fn get(&self, id: FileId) -> Option<&FileEntry> {
        self.files.iter().find(|f| f.id == id)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    /// Interactive layers of every loaded file, in draw order.
    pub fn interactive_layer_ids(&self) -> &[String] {
        &self.interactive_layers
    }

    pub fn hover(&self, point: LngLat) -> Cursor {
        if self.interactive_layers.is_empty()
            || self
                .surface
                .query_at(point, &self.interactive_layers)
                .is_empty()
        {
            Cursor::Default
        } else {
            Cursor::Pointer
        }
    }

    /// Popup for the topmost feature at `point`.
    pub fn click(&self, point: LngLat) -> Option<Popup> {
        if self.interactive_layers.is_empty() {
            return None;
        }
        let feature = self
            .surface
            .query_at(point, &self.interactive_layers)
            .into_iter()
            .next()?;
        let rows = feature
            .properties
            .into_iter()
            .map(|(k, v)| {
                let v = match v {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (k, v)
            })
            .collect();
        Some(Popup { at: point, rows })
    }

    /// Frame the view on one file. Returns false if it has no bounds.
    pub fn zoom_to(&mut self, id: FileId) -> bool {
        match self.get(id).and_then(|f| f.bounds) {
            Some(bounds) => {
                self.surface.frame(bounds, FrameOptions::default());
                true
            }
            None => false,
        }
    }

    /// Extent covering every loaded file that has one.
    pub fn combined_bounds(&self) -> Option<Bounds> {
        self.files
            .iter()
            .filter_map(|f| f.bounds)
            .reduce(|a, b| a.union(&b))
    }

    /// Files as they are sent to the bundle service.
    pub fn share_files(&self) -> Vec<BundleFile> {
        self.files
            .iter()
            .map(|f| BundleFile {
                name: f.name.clone(),
                geojson: f.geojson.clone(),
            })
            .collect()
    }

    fn refresh_interactions(&mut self) {
        self.interactive_layers = self
            .files
            .iter()
            .flat_map(|f| f.layer_set.interactive_layer_ids().map(str::to_string))
            .collect();
    }

    fn notify(&mut self) {
        if let Some(listener) = self.on_change.as_mut() {
            listener(&self.files);
        }
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
