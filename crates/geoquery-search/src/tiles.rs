//! Per-tile aggregation of raw geosearch results.
//!
//! The search index returns tiles whose metadata varies by ingestion source:
//! the bounding box may live under `metadata.bbox` or `metadata.misc.bbox`
//! in any of the encodings [`geoquery_core::normalize_bbox`] understands, or
//! the tile may carry bare lat/lon fields instead. A tile with no derivable
//! coordinate is unusable and is dropped silently; a missing caption or
//! thumbnail never excludes a tile.

use serde_json::Value;

use geoquery_core::{centroid, normalize_bbox, Coordinate};

/// One usable result record: a map point with its caption and, when the
/// index stored thumbnail bytes, an inline data URL.
#[derive(Debug, Clone, PartialEq)]
pub struct TileHit {
    pub coordinate: Coordinate,
    pub caption: String,
    pub thumbnail: Option<String>,
}

/// Index-aligned result sequences for the map client.
///
/// The three vectors always have the same length: a tile contributes an
/// entry to all of them or to none.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TileSet {
    pub coordinates: Vec<Coordinate>,
    pub captions: Vec<String>,
    pub thumbnails: Vec<Option<String>>,
}

impl TileSet {
    fn push(&mut self, hit: TileHit) {
        self.coordinates.push(hit.coordinate);
        self.captions.push(hit.caption);
        self.thumbnails.push(hit.thumbnail);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

/// Aggregates every tile independently, skipping unusable ones.
#[must_use]
pub fn aggregate_tiles(tiles: &[Value]) -> TileSet {
    let mut set = TileSet::default();
    for tile in tiles {
        if let Some(hit) = aggregate_tile(tile) {
            set.push(hit);
        } else {
            tracing::debug!("skipping tile with no derivable coordinate");
        }
    }
    set
}

/// Normalizes one raw tile, or returns `None` when no coordinate can be
/// derived from it. Pure function of the record.
#[must_use]
pub fn aggregate_tile(tile: &Value) -> Option<TileHit> {
    let metadata = tile.get("metadata");
    let coordinate = coordinate_from_metadata(metadata)?;

    let caption = metadata
        .and_then(|m| m.get("caption"))
        .filter(|v| !v.is_null())
        .map_or_else(String::new, stringify);

    let thumbnail = thumbnail_from_data(tile.get("data"));

    Some(TileHit {
        coordinate,
        caption,
        thumbnail,
    })
}

/// Coordinate resolution, first success wins: bbox centroid, then explicit
/// lat/lon fields.
fn coordinate_from_metadata(metadata: Option<&Value>) -> Option<Coordinate> {
    let metadata = metadata?;

    let bbox_candidate = metadata
        .get("bbox")
        .filter(|v| !v.is_null())
        .or_else(|| metadata.get("misc").and_then(|misc| misc.get("bbox")));
    if let Some(bbox) = bbox_candidate.and_then(normalize_bbox) {
        return Some(centroid(&bbox));
    }

    // Fallback: bare coordinate fields under their common aliases. Both
    // halves must be present and numeric or the tile is unusable.
    let lat = first_present(metadata, &["lat", "latitude", "y"])?.as_f64()?;
    let lon = first_present(metadata, &["lon", "lng", "longitude", "x"])?.as_f64()?;
    Some(Coordinate { lat, lon })
}

fn first_present<'a>(metadata: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| metadata.get(*key).filter(|v| !v.is_null()))
}

/// Builds a `data:{mime};base64,{bytes}` URL from the tile's stored
/// thumbnail, when present. The mime defaults to JPEG; a `type` field of the
/// form `"image/png,base64"` overrides it with the part before the comma.
fn thumbnail_from_data(data: Option<&Value>) -> Option<String> {
    let data = data?;
    let base64_data = data
        .get("base64_data")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())?;

    let mime = data
        .get("type")
        .and_then(Value::as_str)
        .and_then(|t| t.split_once(',').map(|(mime, _)| mime))
        .unwrap_or("image/jpeg");

    Some(format!("data:{mime};base64,{base64_data}"))
}

fn stringify(value: &Value) -> String {
    value
        .as_str()
        .map_or_else(|| value.to_string(), str::to_string)
}
