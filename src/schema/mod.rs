//! Composable runtime schema validation.
//!
//! A schema is a capability with one operation: validate a decoded value,
//! returning either the (possibly narrowed) value or a list of
//! path-qualified [`NormalizedError`] entries. Validation never panics and
//! never throws; every mismatch is reported as data.
//!
//! Schemas are built from primitives and combinators:
//!
//! ```
//! use resnorm::schema::{array, number, object, optional, string, Schema};
//! use serde_json::json;
//!
//! let schema = object()
//!     .field("name", string())
//!     .field("price", number())
//!     .field("tags", optional(array(string())));
//!
//! let result = schema.validate(&json!({ "name": "Widget", "price": 9.5 }));
//! assert!(result.is_valid());
//! ```
//!
//! Failures carry code `INVALID_RESPONSE` and a locator composed while the
//! recursion unwinds, so an invalid third element of an `items` field
//! reports at `items[2]`.

mod combinators;
mod primitives;

pub use combinators::{
    array, literal, nullable, object, optional, union, unknown, ArraySchema, LiteralSchema,
    NullableSchema, ObjectSchema, OptionalSchema, UnionSchema, UnknownSchema,
};
pub use primitives::{boolean, number, string, BooleanSchema, NumberSchema, StringSchema};

use crate::error::{ErrorCode, NormalizedError};
use serde_json::Value;

/// Outcome of validating one value against a schema.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    /// Value accepted; carries the validated (possibly narrowed) value.
    Valid(Value),
    /// An optional key was absent; the key stays out of the validated
    /// output.
    Omit,
    /// Value rejected; one entry per detected mismatch.
    Invalid(Vec<NormalizedError>),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        !matches!(self, Validation::Invalid(_))
    }

    /// The accepted value, when there is one.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Validation::Valid(value) => Some(value),
            _ => None,
        }
    }

    /// Convert into a `Result`, mapping `Omit` to `None`.
    pub fn into_result(self) -> Result<Option<Value>, Vec<NormalizedError>> {
        match self {
            Validation::Valid(value) => Ok(Some(value)),
            Validation::Omit => Ok(None),
            Validation::Invalid(errors) => Err(errors),
        }
    }
}

/// A runtime type-checker over decoded values.
///
/// Implementations hold only their inner schemas; validation is a pure
/// function of the input and may run concurrently without coordination.
pub trait Schema: Send + Sync {
    /// Validate a value. `None` models a declared object key that is
    /// absent from the input.
    fn validate_opt(&self, value: Option<&Value>) -> Validation;

    /// Validate a present value.
    fn validate(&self, value: &Value) -> Validation {
        self.validate_opt(Some(value))
    }
}

impl<S: Schema + ?Sized> Schema for Box<S> {
    fn validate_opt(&self, value: Option<&Value>) -> Validation {
        (**self).validate_opt(value)
    }
}

pub(crate) fn mismatch(message: impl Into<String>) -> NormalizedError {
    NormalizedError::new(ErrorCode::InvalidResponse, message)
}

pub(crate) fn type_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "nothing",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}
