//! The uniform error record and the closed code vocabulary.
//!
//! Every anomaly the pipeline encounters, whatever its source
//! representation, ends up as a [`NormalizedError`]. The record is plain
//! data: created fresh per invocation, immutable once returned, never
//! persisted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Semantic error code. This enumeration is the complete error vocabulary:
/// normalization and validation never produce a value outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NoAccess,
    Validation,
    Unauthenticated,
    Forbidden,
    NotFound,
    Conflict,
    RateLimit,
    Unavailable,
    DeprecatedField,
    Maintenance,
    Internal,
    InvalidResponse,
    Unknown,
}

impl ErrorCode {
    /// Wire-format name of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NoAccess => "NO_ACCESS",
            ErrorCode::Validation => "VALIDATION",
            ErrorCode::Unauthenticated => "UNAUTHENTICATED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::RateLimit => "RATE_LIMIT",
            ErrorCode::Unavailable => "UNAVAILABLE",
            ErrorCode::DeprecatedField => "DEPRECATED_FIELD",
            ErrorCode::Maintenance => "MAINTENANCE",
            ErrorCode::Internal => "INTERNAL",
            ErrorCode::InvalidResponse => "INVALID_RESPONSE",
            ErrorCode::Unknown => "UNKNOWN",
        }
    }

    /// Severity implied by the code when the source does not supply one.
    pub fn default_severity(&self) -> Severity {
        match self {
            ErrorCode::Maintenance | ErrorCode::DeprecatedField => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Whether re-issuing the same request can be expected to succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCode::RateLimit | ErrorCode::Unavailable)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity hint for consumers (UI, logs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Parse an explicit severity value from a source payload.
    ///
    /// Only the three recognized names are accepted; anything else returns
    /// `None` so the caller falls back to the code-derived default.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "info" => Some(Severity::Info),
            "warning" => Some(Severity::Warning),
            "error" => Some(Severity::Error),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(name)
    }
}

/// One detected problem, normalized from any source representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedError {
    /// Semantic code from the closed vocabulary.
    pub code: ErrorCode,
    /// Human-readable text; never empty after normalization.
    pub message: String,
    /// Dot/bracket locator into the data (e.g. `data.items[2].price`).
    /// `None` means the error is global, not attributable to one field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub severity: Severity,
    pub retryable: bool,
    /// Auxiliary source fields not consumed by the other attributes.
    /// Omitted entirely when nothing was collected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

impl NormalizedError {
    /// Create an error with severity and retryability derived from the code.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
            severity: code.default_severity(),
            retryable: code.is_retryable(),
            meta: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// Attach collected meta fields. An empty map is dropped so `meta`
    /// stays `None` when nothing was collected.
    pub fn with_meta(mut self, meta: Map<String, Value>) -> Self {
        self.meta = if meta.is_empty() { None } else { Some(meta) };
        self
    }

    /// Insert a single meta entry, creating the map if needed.
    pub fn with_meta_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Look up a meta field by key.
    pub fn meta_value(&self, key: &str) -> Option<&Value> {
        self.meta.as_ref().and_then(|meta| meta.get(key))
    }
}

impl fmt::Display for NormalizedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{} at {}: {}", self.code, path, self.message),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

impl std::error::Error for NormalizedError {}
