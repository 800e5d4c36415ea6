//! Response shape detection.
//!
//! Classifies a decoded body into one of a fixed set of recognized shapes.
//! The priority order matters: a singular `error` object always wins over
//! any `errors` field inspection, and a validation map is only recognized
//! when every value under `errors` is itself an array of strings.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structural pattern an API response body follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseShape {
    /// `{ data, errors: [...] }` envelope.
    Standard,
    /// `{ error: { ... } }` with a single error object.
    SingleError,
    /// `errors` is a string or an array of strings.
    StringErrors,
    /// `errors` maps field names to arrays of messages.
    ValidationMap,
    /// The body is a bare string (e.g. an HTML/text error page).
    PlainText,
    /// No body at all.
    Empty,
    Unknown,
}

/// Classify a body. `None` models the caller having no decoded body.
pub fn detect_shape(body: Option<&Value>) -> ResponseShape {
    let body = match body {
        None | Some(Value::Null) => return ResponseShape::Empty,
        Some(body) => body,
    };
    match body {
        Value::String(_) => ResponseShape::PlainText,
        Value::Object(map) => detect_object_shape(map),
        // Numbers, booleans and top-level arrays carry no recognizable
        // fields to dispatch on.
        _ => ResponseShape::Unknown,
    }
}

fn detect_object_shape(map: &Map<String, Value>) -> ResponseShape {
    // A singular `error` object takes precedence over everything below.
    if matches!(map.get("error"), Some(Value::Object(_))) {
        return ResponseShape::SingleError;
    }

    if let Some(errors) = map.get("errors") {
        match errors {
            Value::String(_) => return ResponseShape::StringErrors,
            Value::Array(items) => {
                // Only the first element is inspected; a mixed array
                // follows its first element's type.
                return match items.first() {
                    None if map.contains_key("data") => ResponseShape::Standard,
                    None => ResponseShape::Unknown,
                    Some(Value::String(_)) => ResponseShape::StringErrors,
                    Some(Value::Object(_)) => ResponseShape::Standard,
                    Some(_) => ResponseShape::Unknown,
                };
            }
            Value::Null => {
                return if map.contains_key("data") {
                    ResponseShape::Standard
                } else {
                    ResponseShape::Unknown
                };
            }
            Value::Object(fields) if is_validation_map(fields) => {
                return ResponseShape::ValidationMap;
            }
            // A non-conforming `errors` value (number, boolean, or a map
            // with a non-string-array field) falls through to the `data`
            // checks below.
            _ => {}
        }
    }

    if map.contains_key("data") {
        ResponseShape::Standard
    } else {
        ResponseShape::Unknown
    }
}

/// True when every value in the map is an array of strings.
pub(crate) fn is_validation_map(fields: &Map<String, Value>) -> bool {
    fields
        .values()
        .all(|value| matches!(value, Value::Array(items) if items.iter().all(Value::is_string)))
}
