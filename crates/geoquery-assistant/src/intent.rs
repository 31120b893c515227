//! Parsing assistant output into a structured search intent.

use serde_json::{Map, Value};

use geoquery_core::{normalize_bbox, BBox};

use crate::extract::extract_json_object;

/// Structured search parameters derived from a free-form query.
///
/// `content` is never empty when the original query had text: parsing
/// failures fall back to the raw input rather than losing the query.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedIntent {
    pub content: String,
    pub location: Option<String>,
    pub bbox: Option<BBox>,
}

impl ExtractedIntent {
    /// The intent used when the assistant is unavailable or its output is
    /// unusable: search on the raw query text, with no location constraint.
    #[must_use]
    pub fn fallback(query: &str) -> Self {
        Self {
            content: query.to_string(),
            location: None,
            bbox: None,
        }
    }
}

/// Derives an [`ExtractedIntent`] from raw assistant output.
///
/// Key aliases observed in the wild are accepted: `query` for `content`,
/// `place` for `location`. Empty strings are treated as absent. The bbox is
/// run through [`normalize_bbox`], so any of the supported encodings works;
/// an unusable bbox simply drops the spatial constraint.
#[must_use]
pub fn intent_from_response(text: &str, query: &str) -> ExtractedIntent {
    let Some(obj) = extract_json_object(text) else {
        tracing::info!("assistant output held no JSON object; falling back to raw query");
        return ExtractedIntent::fallback(query);
    };

    let content = non_empty_string(&obj, "content")
        .or_else(|| non_empty_string(&obj, "query"))
        .unwrap_or_else(|| query.to_string());
    let location = non_empty_string(&obj, "location").or_else(|| non_empty_string(&obj, "place"));
    let bbox = obj.get("bbox").and_then(normalize_bbox);

    ExtractedIntent {
        content,
        location,
        bbox,
    }
}

fn non_empty_string(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
