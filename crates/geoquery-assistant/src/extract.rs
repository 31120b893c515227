//! Best-effort extraction of a JSON object from free-form model output.
//!
//! Assistant models routinely wrap their JSON answer in prose or code fences.
//! [`extract_json_object`] recovers the object anyway; failure to find one is
//! a normal outcome, not an error.

use serde_json::{Map, Value};

/// Parses a JSON object out of arbitrary text.
///
/// Two attempts, first success wins:
/// 1. the whole trimmed text as JSON;
/// 2. the substring from the first `{` to the last `}` inclusive.
///
/// Returns `None` when neither attempt yields an object. Non-object JSON
/// (arrays, strings, numbers) is also `None`: callers want keyed fields.
#[must_use]
pub fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(obj) = parse_object(trimmed) {
        return Some(obj);
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end < start {
        return None;
    }
    parse_object(&trimmed[start..=end])
}

fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(obj)) => Some(obj),
        _ => None,
    }
}
