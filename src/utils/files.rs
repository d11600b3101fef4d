use crate::registry::{UploadedFile, has_geojson_extension};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Expand the given paths into candidate files. Directories are walked for
/// `.geojson`/`.json` files; explicitly named files are kept whatever their
/// extension so ingestion can report them.
pub fn collect_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| e.file_type().is_file())
                .filter(|e| {
                    e.file_name()
                        .to_str()
                        .map(has_geojson_extension)
                        .unwrap_or(false)
                })
                .map(|e| e.into_path())
                .collect();
            found.sort();
            out.extend(found);
        } else {
            out.push(path.clone());
        }
    }
    out
}

/// Read files into uploads with a progress bar. Unreadable files are
/// reported as `(path, reason)` and left out.
pub fn read_uploads(paths: &[PathBuf]) -> (Vec<UploadedFile>, Vec<(PathBuf, String)>) {
    let total_bytes: u64 = paths
        .iter()
        .filter_map(|p| p.metadata().ok())
        .map(|m| m.len())
        .sum();

    let pb = ProgressBar::new(paths.len() as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("{msg}\n[{bar:40.cyan/blue}] {pos}/{len} {percent}%")
    {
        pb.set_style(style.progress_chars("█▇▆▅▄▃▂▁  "));
    }

    let mut uploads = Vec::new();
    let mut failures = Vec::new();
    let mut loaded_bytes = 0u64;
    for path in paths {
        let name = display_name(path);
        loaded_bytes += path.metadata().map(|m| m.len()).unwrap_or(0);
        pb.set_message(format!(
            "Reading {:<30}  ({:.2}/{:.2} MiB)",
            name,
            loaded_bytes as f64 / 1024.0 / 1024.0,
            total_bytes as f64 / 1024.0 / 1024.0
        ));

        match std::fs::read_to_string(path) {
            Ok(contents) => uploads.push(UploadedFile { name, contents }),
            Err(err) => failures.push((path.clone(), err.to_string())),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();
    (uploads, failures)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}
