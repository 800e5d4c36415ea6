//! # resnorm
//!
//! Uniform API response normalization: turn an HTTP payload whose shape is
//! not reliably known in advance into one result structure that downstream
//! code handles with a single code path.
//!
//! ## Overview
//!
//! Backends misbehave in predictable ways. The same endpoint may emit a
//! well-formed `{ data, errors }` envelope, a single error object, an
//! array of error strings, a field-validation map, a raw-text error page,
//! or nothing at all. This library runs a fixed pipeline over the decoded
//! body:
//!
//! shape detection → error normalization → optional schema validation →
//! result classification
//!
//! and returns an [`ApiResult`]: the extracted payload (if any), an
//! ordered list of [`NormalizedError`] values drawn from a closed code
//! vocabulary, and a success/partial/failure classification. The pipeline
//! is a pure function of its inputs. It never panics and never returns an
//! error for malformed input; every anomaly becomes data.
//!
//! ## Quick Start
//!
//! ```
//! use resnorm::{parse_api_response, schema, ResultKind};
//! use serde_json::json;
//!
//! let body = json!({ "data": { "name": "Ada", "age": 36 } });
//! let shape = schema::object()
//!     .field("name", schema::string())
//!     .field("age", schema::number());
//!
//! let result = parse_api_response(200, Some(&body), Some(&shape));
//! assert_eq!(result.kind, ResultKind::Success);
//! assert!(result.errors.is_empty());
//! ```
//!
//! Error-bearing responses come back classified instead of failing:
//!
//! ```
//! use resnorm::{parse_api_response, ErrorCode, ResultKind};
//! use serde_json::json;
//!
//! let body = json!({
//!     "errors": { "phoneNumber": ["Invalid format"] }
//! });
//! let result = parse_api_response(422, Some(&body), None);
//! assert_eq!(result.kind, ResultKind::Failure);
//! assert_eq!(result.errors[0].code, ErrorCode::Validation);
//! assert_eq!(result.errors[0].path.as_deref(), Some("input.phoneNumber"));
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`pipeline`] | Entry points, [`ApiResult`] and outcome classification |
//! | [`shape`] | Response shape detection |
//! | [`normalize`] | Error normalization from any source representation |
//! | [`classify`] | Raw-code lookup and free-text code inference |
//! | [`schema`] | Composable runtime schema validation |
//! | [`error`] | [`NormalizedError`], [`ErrorCode`], [`Severity`] |
//! | [`path`] | Dot/bracket locator utilities |
//! | [`query`] | Consumer helpers (field state, retryability, auth) |

pub mod classify;
pub mod error;
pub mod normalize;
pub mod path;
pub mod pipeline;
pub mod query;
pub mod schema;
pub mod shape;

// Re-export the main surface for convenience
pub use error::{ErrorCode, NormalizedError, Severity};
pub use normalize::normalize_errors;
pub use pipeline::{parse_api_response, parse_api_response_text, ApiResult, ResultKind};
pub use query::FieldState;
pub use schema::{Schema, Validation};
pub use shape::{detect_shape, ResponseShape};
