use crate::error::GeoShareError;
use crate::models::geometry::Bounds;
use crate::registry::FileEntry;
use comfy_table::{Attribute, Cell, CellAlignment, Table};

fn header(title: &str) -> Cell {
    Cell::new(title)
        .add_attribute(Attribute::Bold)
        .set_alignment(CellAlignment::Center)
}

fn format_bounds(bounds: Option<Bounds>) -> String {
    match bounds {
        Some(b) => format!(
            "[{:.4}, {:.4}] → [{:.4}, {:.4}]",
            b.minx, b.miny, b.maxx, b.maxy
        ),
        None => "none".to_string(),
    }
}

pub fn file_table(files: &[FileEntry]) -> Table {
    let mut table = Table::new();
    table
        .set_header(vec![
            header(""),
            header("Id"),
            header("File"),
            header("Features"),
            header("Bounds"),
        ])
        .load_preset(comfy_table::presets::ASCII_BORDERS_ONLY_CONDENSED);

    for file in files {
        table.add_row(vec![
            Cell::new(if file.visible { "👁" } else { "🚫" }).set_alignment(CellAlignment::Center),
            Cell::new(file.id).set_alignment(CellAlignment::Center),
            Cell::new(&file.name),
            Cell::new(file.feature_count()).set_alignment(CellAlignment::Center),
            Cell::new(format_bounds(file.bounds)),
        ]);
    }
    table
}

/// Print loaded files, then any per-file errors, the way the server prints
/// its startup summary.
pub fn print_file_summary(files: &[FileEntry], errors: &[GeoShareError]) {
    println!("\nLoaded files:\n{}", file_table(files));

    if !errors.is_empty() {
        println!("\nWarnings:");
        for error in errors {
            println!("  ⚠️ {}", error);
        }
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::render::HeadlessSurface;
    use serde_json::json;

    #[test]
    fn table_lists_each_file() {
        let mut reg = Registry::new(HeadlessSurface::new());
        reg.add_file(
            "parks.geojson",
            json!({"type": "FeatureCollection", "features": [
                {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [10, 20]}}
            ]}),
        )
        .unwrap();
        reg.add_file("empty.json", json!({"type": "FeatureCollection", "features": []}))
            .unwrap();

        let rendered = file_table(reg.list_files()).to_string();
        assert!(rendered.contains("parks.geojson"));
        assert!(rendered.contains("[10.0000, 20.0000] → [10.0000, 20.0000]"));
        assert!(rendered.contains("empty.json"));
        assert!(rendered.contains("none"));
    }
}
