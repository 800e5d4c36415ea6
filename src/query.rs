//! Consumer-side helpers over normalized errors.
//!
//! Pure functions answering the questions a UI (or any other consumer)
//! asks of an [`ApiResult`](crate::ApiResult): which fields are in
//! trouble, whether retrying makes sense, whether re-authentication is
//! needed. None of them mutate anything.

use crate::error::{ErrorCode, NormalizedError, Severity};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Presentation state of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldState {
    Ok,
    /// The caller lacks access to the field (`NO_ACCESS`).
    Locked,
    /// The field is denied outright (`FORBIDDEN`).
    Denied,
    Warning,
    Error,
}

/// State of the field at `path`.
///
/// Priority: `NO_ACCESS` beats `FORBIDDEN` beats error severity beats
/// warning severity; any remaining match still reads as an error.
pub fn field_state(errors: &[NormalizedError], path: &str) -> FieldState {
    let matching: Vec<&NormalizedError> = field_errors(errors, path);
    if matching.is_empty() {
        return FieldState::Ok;
    }
    if matching.iter().any(|e| e.code == ErrorCode::NoAccess) {
        return FieldState::Locked;
    }
    if matching.iter().any(|e| e.code == ErrorCode::Forbidden) {
        return FieldState::Denied;
    }
    if matching.iter().any(|e| e.severity == Severity::Error) {
        return FieldState::Error;
    }
    if matching.iter().any(|e| e.severity == Severity::Warning) {
        return FieldState::Warning;
    }
    FieldState::Error
}

/// Errors attributed exactly to `path`.
pub fn field_errors<'a>(errors: &'a [NormalizedError], path: &str) -> Vec<&'a NormalizedError> {
    errors
        .iter()
        .filter(|e| e.path.as_deref() == Some(path))
        .collect()
}

/// Errors whose path starts with `prefix`.
pub fn errors_by_prefix<'a>(
    errors: &'a [NormalizedError],
    prefix: &str,
) -> Vec<&'a NormalizedError> {
    errors
        .iter()
        .filter(|e| e.path.as_deref().is_some_and(|p| p.starts_with(prefix)))
        .collect()
}

/// Errors not attributable to any one field.
pub fn global_errors(errors: &[NormalizedError]) -> Vec<&NormalizedError> {
    errors.iter().filter(|e| e.path.is_none()).collect()
}

/// Errors attributed to some field.
pub fn field_level_errors(errors: &[NormalizedError]) -> Vec<&NormalizedError> {
    errors.iter().filter(|e| e.path.is_some()).collect()
}

pub fn has_retryable_error(errors: &[NormalizedError]) -> bool {
    errors.iter().any(|e| e.retryable)
}

/// Retry delay from the first error carrying `meta.retryAfter`, in
/// encounter order.
pub fn retry_after(errors: &[NormalizedError]) -> Option<u64> {
    errors
        .iter()
        .find(|e| e.meta_value("retryAfter").is_some())
        .and_then(|e| e.meta_value("retryAfter"))
        .and_then(Value::as_u64)
}

/// Whether any error demands re-authentication, field-scoped or not.
pub fn requires_auth(errors: &[NormalizedError]) -> bool {
    errors.iter().any(|e| e.code == ErrorCode::Unauthenticated)
}

/// Whether the response as a whole is forbidden. A field-scoped
/// `FORBIDDEN` does not count.
pub fn is_forbidden(errors: &[NormalizedError]) -> bool {
    errors
        .iter()
        .any(|e| e.code == ErrorCode::Forbidden && e.path.is_none())
}

pub fn has_deprecation_warnings(errors: &[NormalizedError]) -> bool {
    errors.iter().any(|e| e.code == ErrorCode::DeprecatedField)
}

/// Field state for every distinct path present.
pub fn build_field_state_map(errors: &[NormalizedError]) -> BTreeMap<String, FieldState> {
    let mut map = BTreeMap::new();
    for error in errors {
        if let Some(path) = &error.path {
            map.entry(path.clone())
                .or_insert_with(|| field_state(errors, path));
        }
    }
    map
}

/// Distinct codes in encounter order.
pub fn error_codes(errors: &[NormalizedError]) -> Vec<ErrorCode> {
    let mut seen = Vec::new();
    for error in errors {
        if !seen.contains(&error.code) {
            seen.push(error.code);
        }
    }
    seen
}

/// Errors partitioned by severity, encounter order preserved per bucket.
#[derive(Debug, Default)]
pub struct SeverityGroups<'a> {
    pub errors: Vec<&'a NormalizedError>,
    pub warnings: Vec<&'a NormalizedError>,
    pub infos: Vec<&'a NormalizedError>,
}

pub fn group_by_severity(errors: &[NormalizedError]) -> SeverityGroups<'_> {
    let mut groups = SeverityGroups::default();
    for error in errors {
        match error.severity {
            Severity::Error => groups.errors.push(error),
            Severity::Warning => groups.warnings.push(error),
            Severity::Info => groups.infos.push(error),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn err(code: ErrorCode, path: Option<&str>) -> NormalizedError {
        let error = NormalizedError::new(code, "test");
        match path {
            Some(path) => error.with_path(path),
            None => error,
        }
    }

    #[test]
    fn test_field_state_priority_ladder() {
        let path = Some("data.name");
        let errors = vec![
            err(ErrorCode::Validation, path),
            err(ErrorCode::Forbidden, path),
            err(ErrorCode::NoAccess, path),
        ];
        assert_eq!(field_state(&errors, "data.name"), FieldState::Locked);

        let errors = vec![
            err(ErrorCode::Validation, path),
            err(ErrorCode::Forbidden, path),
        ];
        assert_eq!(field_state(&errors, "data.name"), FieldState::Denied);

        let errors = vec![err(ErrorCode::Validation, path)];
        assert_eq!(field_state(&errors, "data.name"), FieldState::Error);

        let errors = vec![err(ErrorCode::DeprecatedField, path)];
        assert_eq!(field_state(&errors, "data.name"), FieldState::Warning);

        // Info-only still reads as an error.
        let errors =
            vec![err(ErrorCode::Unknown, path).with_severity(Severity::Info)];
        assert_eq!(field_state(&errors, "data.name"), FieldState::Error);

        assert_eq!(field_state(&errors, "data.other"), FieldState::Ok);
    }

    #[test]
    fn test_prefix_and_partition() {
        let errors = vec![
            err(ErrorCode::Validation, Some("input.phoneNumber")),
            err(ErrorCode::Validation, Some("input.surname")),
            err(ErrorCode::Internal, None),
        ];
        assert_eq!(errors_by_prefix(&errors, "input.").len(), 2);
        assert_eq!(errors_by_prefix(&errors, "input.phone").len(), 1);
        assert_eq!(global_errors(&errors).len(), 1);
        assert_eq!(field_level_errors(&errors).len(), 2);
        assert_eq!(field_errors(&errors, "input.surname").len(), 1);
    }

    #[test]
    fn test_retry_helpers() {
        let errors = vec![
            err(ErrorCode::Internal, None),
            err(ErrorCode::RateLimit, None).with_meta_entry("retryAfter", 10),
            err(ErrorCode::RateLimit, None).with_meta_entry("retryAfter", 99),
        ];
        assert!(has_retryable_error(&errors));
        assert_eq!(retry_after(&errors), Some(10));

        let errors = vec![err(ErrorCode::Internal, None)];
        assert!(!has_retryable_error(&errors));
        assert_eq!(retry_after(&errors), None);
    }

    #[test]
    fn test_auth_and_forbidden() {
        let errors = vec![err(ErrorCode::Unauthenticated, Some("data.email"))];
        assert!(requires_auth(&errors));

        // Field-scoped FORBIDDEN is not a global denial.
        let errors = vec![err(ErrorCode::Forbidden, Some("data.email"))];
        assert!(!is_forbidden(&errors));
        let errors = vec![err(ErrorCode::Forbidden, None)];
        assert!(is_forbidden(&errors));
    }

    #[test]
    fn test_deprecation_flag() {
        let errors = vec![err(ErrorCode::DeprecatedField, Some("data.fax"))];
        assert!(has_deprecation_warnings(&errors));
        assert!(!has_deprecation_warnings(&[]));
    }

    #[test]
    fn test_build_field_state_map() {
        let errors = vec![
            err(ErrorCode::NoAccess, Some("data.salary")),
            err(ErrorCode::Validation, Some("input.surname")),
            err(ErrorCode::Internal, None),
        ];
        let map = build_field_state_map(&errors);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("data.salary"), Some(&FieldState::Locked));
        assert_eq!(map.get("input.surname"), Some(&FieldState::Error));
    }

    #[test]
    fn test_error_codes_distinct_in_order() {
        let errors = vec![
            err(ErrorCode::Validation, None),
            err(ErrorCode::Internal, None),
            err(ErrorCode::Validation, None),
        ];
        assert_eq!(
            error_codes(&errors),
            vec![ErrorCode::Validation, ErrorCode::Internal]
        );
    }

    #[test]
    fn test_group_by_severity() {
        let errors = vec![
            err(ErrorCode::Validation, None),
            err(ErrorCode::Maintenance, None),
            err(ErrorCode::Unknown, None).with_severity(Severity::Info),
            err(ErrorCode::Internal, None),
        ];
        let groups = group_by_severity(&errors);
        assert_eq!(groups.errors.len(), 2);
        assert_eq!(groups.warnings.len(), 1);
        assert_eq!(groups.infos.len(), 1);
        assert_eq!(groups.errors[0].code, ErrorCode::Validation);
        assert_eq!(groups.errors[1].code, ErrorCode::Internal);
    }

    #[test]
    fn test_retry_after_ignores_non_numeric_carrier() {
        let errors = vec![
            err(ErrorCode::RateLimit, None).with_meta_entry("retryAfter", json!("soon")),
            err(ErrorCode::RateLimit, None).with_meta_entry("retryAfter", 30),
        ];
        // First carrier wins even when its value is not numeric.
        assert_eq!(retry_after(&errors), None);
    }
}
