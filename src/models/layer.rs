use serde::Serialize;
use std::fmt;

/// Main overlay colour.
pub const PRIMARY: &str = "#2563eb";
/// Line emphasis colour.
pub const PRIMARY_DARK: &str = "#1e40af";
pub const FILL_OPACITY: f64 = 0.354;
pub const OUTLINE_WIDTH: f64 = 3.0;
pub const LINE_WIDTH: f64 = 4.0;
pub const LINE_OPACITY: f64 = 0.9;
pub const CIRCLE_RADIUS: f64 = 7.0;
pub const CIRCLE_STROKE_WIDTH: f64 = 2.0;
pub const CIRCLE_STROKE_COLOR: &str = "#ffffff";

/// GeoJSON geometry type a layer is filtered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GeometryFilter {
    Point,
    LineString,
    Polygon,
}

impl GeometryFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryFilter::Point => "Point",
            GeometryFilter::LineString => "LineString",
            GeometryFilter::Polygon => "Polygon",
        }
    }

    /// Whether a GeoJSON `type` tag is drawn by this filter.
    pub fn matches(&self, geometry_type: &str) -> bool {
        geometry_type == self.as_str()
    }
}

impl fmt::Display for GeometryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerKind {
    PolygonFill,
    PolygonOutline,
    Line,
    Point,
}

impl LayerKind {
    pub const ALL: [LayerKind; 4] = [
        LayerKind::PolygonFill,
        LayerKind::PolygonOutline,
        LayerKind::Line,
        LayerKind::Point,
    ];

    pub fn suffix(&self) -> &'static str {
        match self {
            LayerKind::PolygonFill => "polygons",
            LayerKind::PolygonOutline => "polygons-outline",
            LayerKind::Line => "lines",
            LayerKind::Point => "points",
        }
    }

    pub fn filter(&self) -> GeometryFilter {
        match self {
            LayerKind::PolygonFill | LayerKind::PolygonOutline => GeometryFilter::Polygon,
            LayerKind::Line => GeometryFilter::LineString,
            LayerKind::Point => GeometryFilter::Point,
        }
    }

    /// Layers that take part in hover and click queries. Outlines are skipped.
    pub fn is_interactive(&self) -> bool {
        !matches!(self, LayerKind::PolygonOutline)
    }

    pub fn paint(&self) -> Paint {
        match self {
            LayerKind::PolygonFill => Paint::Fill {
                color: PRIMARY,
                opacity: FILL_OPACITY,
            },
            LayerKind::PolygonOutline => Paint::Line {
                color: PRIMARY,
                width: OUTLINE_WIDTH,
                opacity: 1.0,
            },
            LayerKind::Line => Paint::Line {
                color: PRIMARY_DARK,
                width: LINE_WIDTH,
                opacity: LINE_OPACITY,
            },
            LayerKind::Point => Paint::Circle {
                radius: CIRCLE_RADIUS,
                color: PRIMARY,
                stroke_width: CIRCLE_STROKE_WIDTH,
                stroke_color: CIRCLE_STROKE_COLOR,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Paint {
    Fill {
        color: &'static str,
        opacity: f64,
    },
    Line {
        color: &'static str,
        width: f64,
        opacity: f64,
    },
    Circle {
        radius: f64,
        color: &'static str,
        stroke_width: f64,
        stroke_color: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSpec {
    pub id: String,
    pub kind: LayerKind,
    pub filter: GeometryFilter,
    pub paint: Paint,
}

/// The source and the four styled layers drawn for one loaded file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSet {
    pub source_id: String,
    pub layers: Vec<LayerSpec>,
}

impl LayerSet {
    pub fn for_source(source_id: impl Into<String>) -> Self {
        let source_id = source_id.into();
        let layers = LayerKind::ALL
            .iter()
            .map(|kind| LayerSpec {
                id: format!("{}-{}", source_id, kind.suffix()),
                kind: *kind,
                filter: kind.filter(),
                paint: kind.paint(),
            })
            .collect();
        LayerSet { source_id, layers }
    }

    pub fn layer_ids(&self) -> Vec<String> {
        self.layers.iter().map(|l| l.id.clone()).collect()
    }

    pub fn interactive_layer_ids(&self) -> impl Iterator<Item = &str> {
        self.layers
            .iter()
            .filter(|l| l.kind.is_interactive())
            .map(|l| l.id.as_str())
    }
}
