//! Primitive schemas.

use super::{mismatch, type_name, Schema, Validation};
use serde_json::Value;

/// Accepts any JSON string.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringSchema;

pub fn string() -> StringSchema {
    StringSchema
}

impl Schema for StringSchema {
    fn validate_opt(&self, value: Option<&Value>) -> Validation {
        match value {
            Some(value @ Value::String(_)) => Validation::Valid(value.clone()),
            other => Validation::Invalid(vec![mismatch(format!(
                "Expected string, got {}",
                type_name(other)
            ))]),
        }
    }
}

/// Accepts any finite JSON number. NaN is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberSchema;

pub fn number() -> NumberSchema {
    NumberSchema
}

impl Schema for NumberSchema {
    fn validate_opt(&self, value: Option<&Value>) -> Validation {
        match value {
            Some(value @ Value::Number(number)) => {
                if number.as_f64().is_some_and(f64::is_nan) {
                    Validation::Invalid(vec![mismatch("Expected number, got NaN")])
                } else {
                    Validation::Valid(value.clone())
                }
            }
            other => Validation::Invalid(vec![mismatch(format!(
                "Expected number, got {}",
                type_name(other)
            ))]),
        }
    }
}

/// Accepts any JSON boolean.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanSchema;

pub fn boolean() -> BooleanSchema {
    BooleanSchema
}

impl Schema for BooleanSchema {
    fn validate_opt(&self, value: Option<&Value>) -> Validation {
        match value {
            Some(value @ Value::Bool(_)) => Validation::Valid(value.clone()),
            other => Validation::Invalid(vec![mismatch(format!(
                "Expected boolean, got {}",
                type_name(other)
            ))]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn first_message(validation: Validation) -> String {
        match validation {
            Validation::Invalid(errors) => errors[0].message.clone(),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_string_accepts_and_rejects() {
        assert!(string().validate(&json!("hello")).is_valid());
        assert_eq!(
            first_message(string().validate(&json!(42))),
            "Expected string, got number"
        );
        assert_eq!(
            first_message(string().validate(&json!(null))),
            "Expected string, got null"
        );
        assert_eq!(
            first_message(string().validate_opt(None)),
            "Expected string, got nothing"
        );
    }

    #[test]
    fn test_number_accepts_ints_and_floats() {
        assert!(number().validate(&json!(42)).is_valid());
        assert!(number().validate(&json!(-1.5)).is_valid());
        assert_eq!(
            first_message(number().validate(&json!("42"))),
            "Expected number, got string"
        );
    }

    #[test]
    fn test_boolean() {
        assert!(boolean().validate(&json!(true)).is_valid());
        assert_eq!(
            first_message(boolean().validate(&json!(0))),
            "Expected boolean, got number"
        );
    }
}
