//! Wire types for the geosearch `/tiles/search` request body.

use serde::Serialize;

use geoquery_core::BBox;

/// Request body for the geosearch service.
///
/// Both fields are optional on the wire; absent fields are omitted rather
/// than sent as null.
#[derive(Debug, Clone, Serialize)]
pub struct SearchPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BboxFilter>,
}

/// The exact nested bbox wrapper the geosearch contract requires:
///
/// ```json
/// {"bbox": {"min": {"x": ..., "y": ...}, "max": {"x": ..., "y": ...}}, "srid": 4326}
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct BboxFilter {
    pub bbox: Corners,
    pub srid: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Corners {
    pub min: Point,
    pub max: Point,
}

#[derive(Debug, Clone, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// WGS84 geographic coordinates; the only SRID the index accepts.
const SRID_WGS84: u32 = 4326;

impl SearchPayload {
    /// Builds the payload from extracted intent fields.
    ///
    /// `text` is included only when non-empty, `bbox` only when normalization
    /// already succeeded upstream; a query with neither is a valid (if broad)
    /// search.
    #[must_use]
    pub fn new(content: &str, bbox: Option<BBox>) -> Self {
        Self {
            text: (!content.is_empty()).then(|| content.to_string()),
            bbox: bbox.map(BboxFilter::from),
        }
    }
}

impl From<BBox> for BboxFilter {
    fn from(bbox: BBox) -> Self {
        Self {
            bbox: Corners {
                min: Point {
                    x: bbox.min_x,
                    y: bbox.min_y,
                },
                max: Point {
                    x: bbox.max_x,
                    y: bbox.max_y,
                },
            },
            srid: SRID_WGS84,
        }
    }
}
