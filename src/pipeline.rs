//! Pipeline entry point and result classification.
//!
//! `parse_api_response` runs the fixed pipeline: detect the body's shape,
//! extract the error source and candidate data for that shape, normalize
//! the errors, optionally validate the data against a schema, then
//! classify the outcome. It is a pure function of its inputs and never
//! fails: every anomaly becomes a [`NormalizedError`] inside the returned
//! [`ApiResult`].

use crate::error::{ErrorCode, NormalizedError};
use crate::normalize::normalize_errors;
use crate::path;
use crate::query;
use crate::schema::{Schema, Validation};
use crate::shape::{detect_shape, ResponseShape};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Overall outcome category of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Success,
    Partial,
    Failure,
}

/// The uniform result every response normalizes into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResult {
    pub kind: ResultKind,
    /// Extracted (and, when a schema was given, validated) payload.
    pub data: Option<Value>,
    /// Normalization errors in encounter order, schema errors appended.
    pub errors: Vec<NormalizedError>,
    /// Original numeric status, passed through unchanged. `0` means no
    /// real HTTP exchange occurred.
    pub http_status: u16,
}

impl ApiResult {
    pub fn is_success(&self) -> bool {
        self.kind == ResultKind::Success
    }

    pub fn is_partial(&self) -> bool {
        self.kind == ResultKind::Partial
    }

    pub fn is_failure(&self) -> bool {
        self.kind == ResultKind::Failure
    }

    /// Deserialize the payload into a concrete type.
    pub fn data_as<T: DeserializeOwned>(&self) -> Option<T> {
        self.data
            .as_ref()
            .and_then(|data| serde_json::from_value(data.clone()).ok())
    }

    /// Whether any error suggests waiting and re-issuing the request.
    pub fn has_retryable_error(&self) -> bool {
        query::has_retryable_error(&self.errors)
    }

    /// Whether any error demands re-authentication.
    pub fn requires_auth(&self) -> bool {
        query::requires_auth(&self.errors)
    }

    /// A failure synthesized by the caller for a transport-level fault,
    /// bypassing the pipeline. Status `0` marks the absence of a real
    /// HTTP exchange.
    pub fn transport_failure(message: impl Into<String>) -> Self {
        Self {
            kind: ResultKind::Failure,
            data: None,
            errors: vec![NormalizedError::new(ErrorCode::Unavailable, message)],
            http_status: 0,
        }
    }
}

/// Normalize a decoded response into an [`ApiResult`].
///
/// `body` is the already-decoded payload (`None` when the response had no
/// body). When `schema` is given and candidate data was extracted, the
/// data is validated and any mismatches are appended under the `data.`
/// locator; the original data is retained so consumers can still render a
/// partial view.
pub fn parse_api_response(
    http_status: u16,
    body: Option<&Value>,
    schema: Option<&dyn Schema>,
) -> ApiResult {
    let shape = detect_shape(body);
    debug!(http_status, ?shape, "detected response shape");

    let (mut data, mut errors) = extract(shape, body);

    if let (Some(schema), Some(candidate)) = (schema, data.as_ref()) {
        match schema.validate(candidate) {
            Validation::Valid(validated) => data = Some(validated),
            // Absent-key outcomes cannot occur for a present top-level
            // value; keep the candidate unchanged if a schema produces one.
            Validation::Omit => {}
            Validation::Invalid(schema_errors) => {
                errors.extend(schema_errors.into_iter().map(|mut error| {
                    if let Some(child) = error.path.take() {
                        error = error.with_path(path::join_key("data", &child));
                    }
                    error
                }));
            }
        }
    }

    let kind = classify(http_status, data.is_some(), !errors.is_empty());
    if kind == ResultKind::Failure {
        data = None;
    }
    debug!(?kind, error_count = errors.len(), "classified response");

    ApiResult {
        kind,
        data,
        errors,
        http_status,
    }
}

/// Normalize a raw response body, decoding it first.
///
/// Bodies that fail JSON decoding are treated as plain text, which is what
/// proxy and gateway error pages usually are.
pub fn parse_api_response_text(
    http_status: u16,
    raw: &str,
    schema: Option<&dyn Schema>,
) -> ApiResult {
    match serde_json::from_str::<Value>(raw) {
        Ok(body) => parse_api_response(http_status, Some(&body), schema),
        Err(_) => parse_api_response(http_status, Some(&Value::String(raw.to_string())), schema),
    }
}

/// Per-shape extraction of the error source and candidate data.
fn extract(shape: ResponseShape, body: Option<&Value>) -> (Option<Value>, Vec<NormalizedError>) {
    match shape {
        ResponseShape::Empty => (
            None,
            vec![NormalizedError::new(ErrorCode::Unknown, "Empty response")],
        ),
        ResponseShape::PlainText => {
            let text = body.and_then(Value::as_str).unwrap_or_default();
            let message = if text.trim().is_empty() {
                "Internal server error"
            } else {
                text
            };
            (
                None,
                vec![NormalizedError::new(ErrorCode::Internal, message)],
            )
        }
        ResponseShape::SingleError => (
            None,
            normalize_errors(body.and_then(|body| body.get("error"))),
        ),
        ResponseShape::ValidationMap => (
            None,
            normalize_errors(body.and_then(|body| body.get("errors"))),
        ),
        ResponseShape::StringErrors => {
            let errors = normalize_errors(body.and_then(|body| body.get("errors")));
            // A data field may legitimately accompany string errors.
            let data = body
                .and_then(|body| body.get("data"))
                .filter(|data| !data.is_null() && !data.is_string())
                .cloned();
            (data, errors)
        }
        ResponseShape::Standard => extract_standard(body),
        ResponseShape::Unknown => (None, vec![unknown_body_error(body)]),
    }
}

fn extract_standard(body: Option<&Value>) -> (Option<Value>, Vec<NormalizedError>) {
    let map = match body.and_then(Value::as_object) {
        Some(map) => map,
        None => return (None, Vec::new()),
    };

    let mut errors = Vec::new();
    // Both carriers contribute when present, `errors` first.
    if let Some(value) = map.get("errors") {
        if !value.is_null() {
            errors.extend(normalize_errors(Some(value)));
        }
    }
    if let Some(value) = map.get("error") {
        if !value.is_null() {
            errors.extend(normalize_errors(Some(value)));
        }
    }

    let mut data = None;
    match map.get("data") {
        None | Some(Value::Null) => {}
        Some(Value::String(_)) => {
            errors.push(NormalizedError::new(
                ErrorCode::InvalidResponse,
                "Data field has unexpected type: string",
            ));
        }
        Some(value) => data = Some(value.clone()),
    }
    (data, errors)
}

fn unknown_body_error(body: Option<&Value>) -> NormalizedError {
    let error = NormalizedError::new(ErrorCode::Unknown, "Unrecognized response format");
    match body {
        Some(Value::Object(map)) => error.with_meta(map.clone()),
        Some(other) => error.with_meta_entry("rawValue", other.clone()),
        None => error,
    }
}

/// Outcome classification. A status at or above 400 is a failure no
/// matter what the body said; the data/error signals only break the tie
/// for nominally successful statuses.
fn classify(http_status: u16, has_data: bool, has_errors: bool) -> ResultKind {
    if http_status >= 400 {
        return ResultKind::Failure;
    }
    match (has_data, has_errors) {
        (_, false) => ResultKind::Success,
        (true, true) => ResultKind::Partial,
        (false, true) => ResultKind::Failure,
    }
}
