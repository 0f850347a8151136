// ABOUTME: Shared parse helpers for provider response normalization
// ABOUTME: Best-effort extraction where invalid or missing values become None
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde_json::Value;

/// Parse a JSON value as f64, accepting numbers and numeric strings.
/// Anything else (null, objects, garbage strings) normalizes to `None`.
pub(crate) fn parse_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse a JSON value as a rounded i64, via [`parse_f64`]
pub(crate) fn parse_i64(value: Option<&Value>) -> Option<i64> {
    parse_f64(value).map(|v| v.round() as i64)
}

/// Extract a non-empty string field
pub(crate) fn parse_str(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Walk an ordered fallback list of keys on a JSON object, returning the
/// first non-empty string value
pub(crate) fn first_str<'a>(record: &Value, keys: impl IntoIterator<Item = &'a str>) -> Option<String> {
    keys.into_iter().find_map(|key| parse_str(record.get(key)))
}

/// First parseable f64 across an ordered fallback list of keys
pub(crate) fn first_f64<'a>(record: &Value, keys: impl IntoIterator<Item = &'a str>) -> Option<f64> {
    keys.into_iter().find_map(|key| parse_f64(record.get(key)))
}

/// First parseable rounded i64 across an ordered fallback list of keys
pub(crate) fn first_i64<'a>(record: &Value, keys: impl IntoIterator<Item = &'a str>) -> Option<i64> {
    keys.into_iter().find_map(|key| parse_i64(record.get(key)))
}
