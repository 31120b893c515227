//! Bounding-box normalization and centroid computation.
//!
//! The geosearch index and the assistant model each emit bounding boxes in a
//! handful of incompatible shapes. [`normalize_bbox`] canonicalizes all of
//! them into a single [`BBox`] by structural inspection; unrecognized shapes
//! yield `None` rather than an error, since malformed geometry is a routine
//! occurrence in upstream data.

use serde_json::Value;

/// Axis-aligned bounding box as four ordered coordinates, WGS84 lon/lat.
///
/// All values are finite. No min/max ordering is enforced: an inverted box
/// still has a well-defined midpoint, and upstream sources do produce them.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// A `(latitude, longitude)` pair, i.e. `(y, x)`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

/// Canonicalizes a bounding box from any of the supported encodings.
///
/// Recognized shapes, first structural match wins:
/// 1. an array of at least four numbers, positional `[minx, miny, maxx, maxy]`
///    (extra elements ignored);
/// 2. an object with `xmin`/`ymin`/`xmax`/`ymax`;
/// 3. an object with `left`/`bottom`/`right`/`top`;
/// 4. an object with nested `min: {x, y}` and `max: {x, y}`;
/// 5. an object whose `bbox` value is one of shapes 1–4 (unwrapped once).
///
/// Returns `None` for anything else: missing fields, non-numeric or
/// non-finite values, null, or empty input.
#[must_use]
pub fn normalize_bbox(raw: &Value) -> Option<BBox> {
    normalize_inner(raw, true)
}

fn normalize_inner(raw: &Value, allow_unwrap: bool) -> Option<BBox> {
    if let Some(items) = raw.as_array() {
        if items.len() < 4 {
            return None;
        }
        return from_parts(
            items[0].as_f64()?,
            items[1].as_f64()?,
            items[2].as_f64()?,
            items[3].as_f64()?,
        );
    }

    let obj = raw.as_object()?;

    if let (Some(min_x), Some(min_y), Some(max_x), Some(max_y)) = (
        number_field(raw, "xmin"),
        number_field(raw, "ymin"),
        number_field(raw, "xmax"),
        number_field(raw, "ymax"),
    ) {
        return from_parts(min_x, min_y, max_x, max_y);
    }

    if let (Some(left), Some(bottom), Some(right), Some(top)) = (
        number_field(raw, "left"),
        number_field(raw, "bottom"),
        number_field(raw, "right"),
        number_field(raw, "top"),
    ) {
        return from_parts(left, bottom, right, top);
    }

    if let (Some(min), Some(max)) = (obj.get("min"), obj.get("max")) {
        return from_parts(
            number_field(min, "x")?,
            number_field(min, "y")?,
            number_field(max, "x")?,
            number_field(max, "y")?,
        );
    }

    // One level of `{"bbox": ...}` unwrapping only; deeper nesting is not a
    // shape any known source produces.
    if allow_unwrap {
        if let Some(inner) = obj.get("bbox") {
            return normalize_inner(inner, false);
        }
    }

    None
}

/// Midpoint of a bounding box, latitude first.
///
/// Degenerate and inverted boxes are not rejected; the midpoint is
/// well-defined either way.
#[must_use]
pub fn centroid(bbox: &BBox) -> Coordinate {
    Coordinate {
        lat: (bbox.min_y + bbox.max_y) / 2.0,
        lon: (bbox.min_x + bbox.max_x) / 2.0,
    }
}

fn number_field(value: &Value, key: &str) -> Option<f64> {
    value.get(key).and_then(Value::as_f64)
}

fn from_parts(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Option<BBox> {
    if [min_x, min_y, max_x, max_y].iter().all(|v| v.is_finite()) {
        Some(BBox {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const EPSILON: f64 = 1e-6;

    fn assert_coord_eq(actual: Coordinate, lat: f64, lon: f64) {
        assert!(
            (actual.lat - lat).abs() < EPSILON && (actual.lon - lon).abs() < EPSILON,
            "expected ({lat}, {lon}), got ({}, {})",
            actual.lat,
            actual.lon
        );
    }

    #[test]
    fn normalizes_positional_array() {
        let bbox = normalize_bbox(&json!([-74.01, 40.70, -73.99, 40.72])).unwrap();
        assert_coord_eq(centroid(&bbox), 40.71, -74.00);
    }

    #[test]
    fn ignores_extra_array_elements() {
        let bbox = normalize_bbox(&json!([1.0, 2.0, 3.0, 4.0, 99.0])).unwrap();
        assert_eq!(bbox.max_y, 4.0);
    }

    #[test]
    fn normalizes_xmin_keys() {
        let bbox =
            normalize_bbox(&json!({"xmin": -74.01, "ymin": 40.70, "xmax": -73.99, "ymax": 40.72}))
                .unwrap();
        assert_coord_eq(centroid(&bbox), 40.71, -74.00);
    }

    #[test]
    fn normalizes_edge_keys() {
        let bbox =
            normalize_bbox(&json!({"left": -74.01, "bottom": 40.70, "right": -73.99, "top": 40.72}))
                .unwrap();
        assert_coord_eq(centroid(&bbox), 40.71, -74.00);
    }

    #[test]
    fn normalizes_min_max_points() {
        let bbox = normalize_bbox(&json!({
            "min": {"x": -74.01, "y": 40.70},
            "max": {"x": -73.99, "y": 40.72}
        }))
        .unwrap();
        assert_coord_eq(centroid(&bbox), 40.71, -74.00);
    }

    #[test]
    fn all_encodings_agree_on_centroid() {
        let shapes = [
            json!([-74.01, 40.70, -73.99, 40.72]),
            json!({"xmin": -74.01, "ymin": 40.70, "xmax": -73.99, "ymax": 40.72}),
            json!({"left": -74.01, "bottom": 40.70, "right": -73.99, "top": 40.72}),
            json!({"min": {"x": -74.01, "y": 40.70}, "max": {"x": -73.99, "y": 40.72}}),
        ];
        for shape in &shapes {
            let bbox = normalize_bbox(shape).expect("shape should normalize");
            assert_coord_eq(centroid(&bbox), 40.71, -74.00);
        }
    }

    #[test]
    fn unwraps_bbox_wrapper_one_level() {
        let bbox = normalize_bbox(&json!({"bbox": [1.0, 2.0, 3.0, 4.0]})).unwrap();
        assert_coord_eq(centroid(&bbox), 3.0, 2.0);

        let bbox = normalize_bbox(&json!({
            "bbox": {"min": {"x": 1.0, "y": 2.0}, "max": {"x": 3.0, "y": 4.0}},
            "srid": 4326
        }))
        .unwrap();
        assert_coord_eq(centroid(&bbox), 3.0, 2.0);
    }

    #[test]
    fn rejects_double_wrapped_bbox() {
        assert!(normalize_bbox(&json!({"bbox": {"bbox": [1.0, 2.0, 3.0, 4.0]}})).is_none());
    }

    #[test]
    fn rejects_null_and_empty() {
        assert!(normalize_bbox(&Value::Null).is_none());
        assert!(normalize_bbox(&json!({})).is_none());
        assert!(normalize_bbox(&json!([])).is_none());
        assert!(normalize_bbox(&json!("[-74, 40, -73, 41]")).is_none());
    }

    #[test]
    fn rejects_short_array() {
        assert!(normalize_bbox(&json!([1.0, 2.0, 3.0])).is_none());
    }

    #[test]
    fn rejects_non_numeric_values() {
        assert!(normalize_bbox(&json!([1.0, "two", 3.0, 4.0])).is_none());
        assert!(
            normalize_bbox(&json!({"xmin": "a", "ymin": 1.0, "xmax": 2.0, "ymax": 3.0})).is_none()
        );
    }

    #[test]
    fn rejects_missing_fields() {
        assert!(normalize_bbox(&json!({"xmin": 1.0, "ymin": 2.0, "xmax": 3.0})).is_none());
        assert!(normalize_bbox(&json!({"min": {"x": 1.0}, "max": {"x": 2.0, "y": 3.0}})).is_none());
    }

    #[test]
    fn inverted_box_still_yields_midpoint() {
        // minx > maxx is accepted; the midpoint is deterministic regardless.
        let bbox = normalize_bbox(&json!([10.0, 5.0, 2.0, 1.0])).unwrap();
        assert_coord_eq(centroid(&bbox), 3.0, 6.0);
    }

    #[test]
    fn centroid_is_reproducible() {
        let bbox = BBox {
            min_x: -74.013_572,
            min_y: 40.700_001,
            max_x: -73.985_428,
            max_y: 40.721_337,
        };
        assert_eq!(centroid(&bbox), centroid(&bbox));
    }
}
