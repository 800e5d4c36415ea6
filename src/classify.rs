//! Error-code classification: raw-code lookup, free-text inference, and
//! best-effort path extraction.
//!
//! Backends are inconsistent about how they spell errors. Some send a
//! machine code, some only prose. The pattern tables here turn both into
//! the closed [`ErrorCode`] vocabulary; first match wins and the table
//! order is part of the contract.

use crate::error::ErrorCode;
use once_cell::sync::Lazy;
use regex::Regex;

/// Case-insensitive lookup of a raw code string against the known codes.
/// Anything not in the table maps to [`ErrorCode::Unknown`].
pub fn normalize_code(raw: &str) -> ErrorCode {
    match raw.trim().to_ascii_uppercase().as_str() {
        "NO_ACCESS" => ErrorCode::NoAccess,
        "VALIDATION" => ErrorCode::Validation,
        "UNAUTHENTICATED" => ErrorCode::Unauthenticated,
        "FORBIDDEN" => ErrorCode::Forbidden,
        "NOT_FOUND" => ErrorCode::NotFound,
        "CONFLICT" => ErrorCode::Conflict,
        "RATE_LIMIT" => ErrorCode::RateLimit,
        "UNAVAILABLE" => ErrorCode::Unavailable,
        "DEPRECATED_FIELD" => ErrorCode::DeprecatedField,
        "MAINTENANCE" => ErrorCode::Maintenance,
        "INTERNAL" => ErrorCode::Internal,
        "INVALID_RESPONSE" => ErrorCode::InvalidResponse,
        _ => ErrorCode::Unknown,
    }
}

// Ordered inference table. Earlier entries win, so access-denial phrasing
// takes precedence over the broader validation vocabulary, which in turn
// precedes auth/session phrasing.
static CODE_PATTERNS: Lazy<Vec<(Regex, ErrorCode)>> = Lazy::new(|| {
    let table: [(&str, ErrorCode); 9] = [
        (
            r"(?i)\bno access\b|\baccess denied\b|\bmissing (?:group|permission|role)\b",
            ErrorCode::NoAccess,
        ),
        (
            r"(?i)\bvalidation\b|\binvalid\b|\bformat\b|\brequired\b|\bmust be\b|\btoo (?:short|long)\b",
            ErrorCode::Validation,
        ),
        (
            r"(?i)\bunauthenticated\b|\bauthentication\b|\bnot (?:logged|signed) in\b|\b(?:session|token) expired\b|\blog ?in required\b",
            ErrorCode::Unauthenticated,
        ),
        (r"(?i)\bforbidden\b", ErrorCode::Forbidden),
        (r"(?i)\bnot found\b", ErrorCode::NotFound),
        (
            r"(?i)\bconflict\b|\bversion mismatch\b|\bstale\b",
            ErrorCode::Conflict,
        ),
        (
            r"(?i)\brate limit|\btoo many requests\b|\bthrottl",
            ErrorCode::RateLimit,
        ),
        (
            r"(?i)\bunavailable\b|\bmaintenance\b|\btemporarily (?:down|offline)\b",
            ErrorCode::Unavailable,
        ),
        (r"(?i)\bdeprecated\b", ErrorCode::DeprecatedField),
    ];
    table
        .into_iter()
        .map(|(pattern, code)| (Regex::new(pattern).expect("static pattern"), code))
        .collect()
});

// Path conventions seen in upstream error prose: "access to <path>" and
// "path: <path>". A path is a dotted identifier chain with optional
// bracketed indices, so trailing sentence punctuation never matches.
static PATH_CONVENTIONS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\baccess to ([A-Za-z_$][A-Za-z0-9_$]*(?:\.[A-Za-z0-9_$]+|\[[0-9]+\])*)",
        r"(?i)\bpath:\s*([A-Za-z_$][A-Za-z0-9_$]*(?:\.[A-Za-z0-9_$]+|\[[0-9]+\])*)",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("static pattern"))
    .collect()
});

/// Infer a semantic code from free-form error text.
///
/// Deterministic and order-stable: the first matching pattern in the table
/// always wins, no match yields [`ErrorCode::Unknown`].
pub fn infer_code_from_string(text: &str) -> ErrorCode {
    for (pattern, code) in CODE_PATTERNS.iter() {
        if pattern.is_match(text) {
            return *code;
        }
    }
    ErrorCode::Unknown
}

/// Best-effort extraction of a field locator from error text.
pub fn extract_path_from_string(text: &str) -> Option<String> {
    for convention in PATH_CONVENTIONS.iter() {
        if let Some(captures) = convention.captures(text) {
            return Some(captures[1].to_string());
        }
    }
    None
}
