//! Error normalization.
//!
//! Converts the error-bearing portion of a body, in any recognized
//! representation (string, string array, object array, field map, single
//! object), into an ordered sequence of [`NormalizedError`] values.

use crate::classify::{extract_path_from_string, infer_code_from_string, normalize_code};
use crate::error::{ErrorCode, NormalizedError, Severity};
use crate::shape::is_validation_map;
use serde_json::{Map, Value};

/// Fallback text used when a source error carries no message of its own.
pub const FALLBACK_MESSAGE: &str = "Unknown error";

// Keys consumed by the named attributes of `NormalizedError`; everything
// else an error object carries is collected into `meta`.
const CONSUMED_KEYS: [&str; 7] = [
    "code",
    "message",
    "msg",
    "path",
    "severity",
    "retryable",
    "meta",
];

/// Normalize an arbitrary error source into an ordered error sequence.
///
/// `None` and `null` yield an empty sequence. Arrays are mapped
/// element-wise and concatenated in order.
pub fn normalize_errors(source: Option<&Value>) -> Vec<NormalizedError> {
    let source = match source {
        None | Some(Value::Null) => return Vec::new(),
        Some(source) => source,
    };
    match source {
        Value::String(text) => normalize_text(text).into_iter().collect(),
        Value::Array(items) => items.iter().flat_map(normalize_element).collect(),
        Value::Object(map) => normalize_object(map),
        other => vec![fallback_error(other)],
    }
}

/// A blank string carries no information and produces nothing; any other
/// string becomes a single error with code and path inferred from the text.
fn normalize_text(text: &str) -> Option<NormalizedError> {
    if text.trim().is_empty() {
        return None;
    }
    let code = infer_code_from_string(text);
    let mut error = NormalizedError::new(code, text);
    if let Some(path) = extract_path_from_string(text) {
        error = error.with_path(path);
    }
    Some(error)
}

fn normalize_element(item: &Value) -> Vec<NormalizedError> {
    match item {
        Value::String(text) => normalize_text(text).into_iter().collect(),
        Value::Object(map) => normalize_object(map),
        // Numbers, booleans, nulls and nested arrays inside an errors
        // array: keep the element visible via its JSON text.
        other => vec![NormalizedError::new(ErrorCode::Unknown, other.to_string())],
    }
}

fn normalize_object(map: &Map<String, Value>) -> Vec<NormalizedError> {
    if is_validation_map(map) {
        return normalize_validation_map(map);
    }
    if map.contains_key("code") || map.contains_key("message") || map.contains_key("msg") {
        return vec![normalize_structured(map)];
    }
    vec![fallback_error(&Value::Object(map.clone()))]
}

/// A field map: one VALIDATION error per (field, message) pair, in source
/// order, with the field name anchored under the `input.` namespace.
fn normalize_validation_map(map: &Map<String, Value>) -> Vec<NormalizedError> {
    let mut out = Vec::new();
    for (field, messages) in map {
        let items = match messages {
            Value::Array(items) => items,
            _ => continue,
        };
        let path = if field.starts_with("input.") {
            field.clone()
        } else {
            format!("input.{field}")
        };
        for message in items {
            let text = match message.as_str() {
                Some(text) => text,
                None => continue,
            };
            out.push(NormalizedError::new(ErrorCode::Validation, text).with_path(path.clone()));
        }
    }
    out
}

/// An object carrying `code` and/or `message`/`msg`.
fn normalize_structured(map: &Map<String, Value>) -> NormalizedError {
    let code = map
        .get("code")
        .and_then(Value::as_str)
        .map(normalize_code)
        .unwrap_or(ErrorCode::Unknown);

    let message = map
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| map.get("msg").and_then(Value::as_str))
        .unwrap_or(FALLBACK_MESSAGE);

    let severity = map
        .get("severity")
        .and_then(Value::as_str)
        .and_then(Severity::parse)
        .unwrap_or_else(|| code.default_severity());

    // An explicit `retryable: true` is honored; otherwise the code decides.
    let retryable = map.get("retryable") == Some(&Value::Bool(true)) || code.is_retryable();

    let mut error = NormalizedError::new(code, message)
        .with_severity(severity)
        .with_retryable(retryable);

    if let Some(path) = map.get("path").and_then(Value::as_str) {
        error = error.with_path(path);
    }

    // Collect unconsumed fields, then let an explicit `meta` object win on
    // key collisions.
    let mut meta = Map::new();
    for (key, value) in map {
        if !CONSUMED_KEYS.contains(&key.as_str()) {
            meta.insert(key.clone(), value.clone());
        }
    }
    if let Some(Value::Object(explicit)) = map.get("meta") {
        for (key, value) in explicit {
            meta.insert(key.clone(), value.clone());
        }
    }
    error.with_meta(meta)
}

/// Last resort for a value nothing else recognized.
fn fallback_error(raw: &Value) -> NormalizedError {
    NormalizedError::new(ErrorCode::Unknown, FALLBACK_MESSAGE)
        .with_meta_entry("rawValue", raw.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_and_missing_sources_are_empty() {
        assert!(normalize_errors(None).is_empty());
        assert!(normalize_errors(Some(&Value::Null)).is_empty());
    }

    #[test]
    fn test_blank_string_is_empty() {
        assert!(normalize_errors(Some(&json!(""))).is_empty());
        assert!(normalize_errors(Some(&json!("   "))).is_empty());
    }

    #[test]
    fn test_string_infers_code_and_path() {
        let errors =
            normalize_errors(Some(&json!("No access to data.phoneNumber, missing group")));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::NoAccess);
        assert_eq!(errors[0].path.as_deref(), Some("data.phoneNumber"));
        assert_eq!(errors[0].severity, Severity::Error);
        assert!(!errors[0].retryable);
    }

    #[test]
    fn test_array_maps_elements_in_order() {
        let errors = normalize_errors(Some(&json!([
            "Resource not found",
            { "code": "CONFLICT", "message": "Version mismatch" },
            42
        ])));
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].code, ErrorCode::NotFound);
        assert_eq!(errors[1].code, ErrorCode::Conflict);
        assert_eq!(errors[2].code, ErrorCode::Unknown);
        assert_eq!(errors[2].message, "42");
    }

    #[test]
    fn test_array_skips_blank_strings() {
        let errors = normalize_errors(Some(&json!(["", "oops"])));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "oops");
    }

    #[test]
    fn test_validation_map_orders_and_prefixes() {
        let errors = normalize_errors(Some(&json!({
            "phoneNumber": ["Invalid format", "Too short"],
            "surname": ["Required"]
        })));
        assert_eq!(errors.len(), 3);
        for error in &errors {
            assert_eq!(error.code, ErrorCode::Validation);
            assert_eq!(error.severity, Severity::Error);
            assert!(!error.retryable);
        }
        assert_eq!(errors[0].path.as_deref(), Some("input.phoneNumber"));
        assert_eq!(errors[0].message, "Invalid format");
        assert_eq!(errors[1].path.as_deref(), Some("input.phoneNumber"));
        assert_eq!(errors[1].message, "Too short");
        assert_eq!(errors[2].path.as_deref(), Some("input.surname"));
    }

    #[test]
    fn test_validation_map_keeps_existing_prefix() {
        let errors = normalize_errors(Some(&json!({ "input.surname": ["Required"] })));
        assert_eq!(errors[0].path.as_deref(), Some("input.surname"));
    }

    #[test]
    fn test_structured_object_full() {
        let errors = normalize_errors(Some(&json!({
            "code": "RATE_LIMIT",
            "message": "Too many requests",
            "retryAfter": 10
        })));
        assert_eq!(errors.len(), 1);
        let error = &errors[0];
        assert_eq!(error.code, ErrorCode::RateLimit);
        assert!(error.retryable);
        assert_eq!(error.meta_value("retryAfter"), Some(&json!(10)));
    }

    #[test]
    fn test_structured_message_fallbacks() {
        let errors = normalize_errors(Some(&json!({ "code": "NOT_FOUND" })));
        assert_eq!(errors[0].message, FALLBACK_MESSAGE);

        let errors = normalize_errors(Some(&json!({ "msg": "short form" })));
        assert_eq!(errors[0].message, "short form");
        assert_eq!(errors[0].code, ErrorCode::Unknown);
    }

    #[test]
    fn test_structured_explicit_severity_overrides() {
        let errors = normalize_errors(Some(&json!({
            "code": "INTERNAL",
            "message": "degraded",
            "severity": "warning"
        })));
        assert_eq!(errors[0].severity, Severity::Warning);

        // An unrecognized severity falls back to the code default.
        let errors = normalize_errors(Some(&json!({
            "code": "MAINTENANCE",
            "message": "window",
            "severity": "catastrophic"
        })));
        assert_eq!(errors[0].severity, Severity::Warning);
    }

    #[test]
    fn test_structured_retryable_rules() {
        // Explicit true on a non-retryable code.
        let errors = normalize_errors(Some(&json!({
            "code": "INTERNAL", "message": "x", "retryable": true
        })));
        assert!(errors[0].retryable);

        // Explicit false cannot veto a retryable code.
        let errors = normalize_errors(Some(&json!({
            "code": "RATE_LIMIT", "message": "x", "retryable": false
        })));
        assert!(errors[0].retryable);

        // Non-boolean values are ignored.
        let errors = normalize_errors(Some(&json!({
            "code": "CONFLICT", "message": "x", "retryable": "yes"
        })));
        assert!(!errors[0].retryable);
    }

    #[test]
    fn test_meta_collects_extras_and_explicit_wins() {
        let errors = normalize_errors(Some(&json!({
            "code": "CONFLICT",
            "message": "stale write",
            "expected": "v2",
            "actual": "v1",
            "meta": { "actual": "v3", "hint": "reload" }
        })));
        let meta = errors[0].meta.as_ref().unwrap();
        assert_eq!(meta.get("expected"), Some(&json!("v2")));
        assert_eq!(meta.get("actual"), Some(&json!("v3")));
        assert_eq!(meta.get("hint"), Some(&json!("reload")));
        assert!(meta.get("meta").is_none());
    }

    #[test]
    fn test_meta_omitted_when_nothing_collected() {
        let errors = normalize_errors(Some(&json!({
            "code": "NOT_FOUND", "message": "gone", "path": "data.user"
        })));
        assert!(errors[0].meta.is_none());
        assert_eq!(errors[0].path.as_deref(), Some("data.user"));
    }

    #[test]
    fn test_unrecognized_object_carries_raw_value() {
        let raw = json!({ "weird": true });
        let errors = normalize_errors(Some(&raw));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::Unknown);
        assert_eq!(errors[0].message, FALLBACK_MESSAGE);
        assert_eq!(errors[0].meta_value("rawValue"), Some(&raw));
    }

    #[test]
    fn test_unrecognized_primitive_carries_raw_value() {
        let errors = normalize_errors(Some(&json!(42)));
        assert_eq!(errors[0].code, ErrorCode::Unknown);
        assert_eq!(errors[0].meta_value("rawValue"), Some(&json!(42)));
    }

    #[test]
    fn test_empty_object_is_a_vacuous_validation_map() {
        // Every value of {} is a string array, vacuously.
        assert!(normalize_errors(Some(&json!({}))).is_empty());
    }
}
