//! Schema combinators.
//!
//! Each combinator is a small struct holding its inner schema(s). Error
//! paths are composed while the recursion unwinds: object keys join with
//! `.`, array indices append inline as `[i]`.

use super::{mismatch, type_name, Schema, Validation};
use crate::error::NormalizedError;
use crate::path;
use serde_json::Value;

fn prefix_key(mut error: NormalizedError, key: &str) -> NormalizedError {
    let child = error.path.take().unwrap_or_default();
    error.with_path(path::join_key(key, &child))
}

fn prefix_index(mut error: NormalizedError, index: usize) -> NormalizedError {
    let child = error.path.take().unwrap_or_default();
    error.with_path(path::join_index(index, &child))
}

/// Accepts `null` (and an absent key) as `null`; otherwise delegates.
pub struct NullableSchema {
    inner: Box<dyn Schema>,
}

pub fn nullable(inner: impl Schema + 'static) -> NullableSchema {
    NullableSchema {
        inner: Box::new(inner),
    }
}

impl Schema for NullableSchema {
    fn validate_opt(&self, value: Option<&Value>) -> Validation {
        match value {
            None | Some(Value::Null) => Validation::Valid(Value::Null),
            Some(value) => self.inner.validate(value),
        }
    }
}

/// Accepts an absent key, leaving it out of the output; otherwise delegates.
pub struct OptionalSchema {
    inner: Box<dyn Schema>,
}

pub fn optional(inner: impl Schema + 'static) -> OptionalSchema {
    OptionalSchema {
        inner: Box::new(inner),
    }
}

impl Schema for OptionalSchema {
    fn validate_opt(&self, value: Option<&Value>) -> Validation {
        match value {
            None => Validation::Omit,
            Some(value) => self.inner.validate(value),
        }
    }
}

/// Validates every element against the item schema.
///
/// Does not short-circuit: all element failures are reported, each under
/// its `[index]` locator.
pub struct ArraySchema {
    item: Box<dyn Schema>,
}

pub fn array(item: impl Schema + 'static) -> ArraySchema {
    ArraySchema {
        item: Box::new(item),
    }
}

impl Schema for ArraySchema {
    fn validate_opt(&self, value: Option<&Value>) -> Validation {
        let items = match value {
            Some(Value::Array(items)) => items,
            other => {
                return Validation::Invalid(vec![mismatch(format!(
                    "Expected array, got {}",
                    type_name(other)
                ))])
            }
        };
        let mut out = Vec::with_capacity(items.len());
        let mut errors = Vec::new();
        for (index, item) in items.iter().enumerate() {
            match self.item.validate(item) {
                Validation::Valid(value) => out.push(value),
                Validation::Omit => out.push(item.clone()),
                Validation::Invalid(item_errors) => {
                    errors.extend(
                        item_errors
                            .into_iter()
                            .map(|error| prefix_index(error, index)),
                    );
                }
            }
        }
        if errors.is_empty() {
            Validation::Valid(Value::Array(out))
        } else {
            Validation::Invalid(errors)
        }
    }
}

/// Validates declared keys; undeclared keys pass through untouched.
///
/// All per-key failures are collected, each under its key locator. The
/// validated output replaces declared keys with their narrowed values.
pub struct ObjectSchema {
    fields: Vec<(String, Box<dyn Schema>)>,
}

pub fn object() -> ObjectSchema {
    ObjectSchema { fields: Vec::new() }
}

impl ObjectSchema {
    /// Declare a key and the schema its value must satisfy.
    pub fn field(mut self, name: impl Into<String>, schema: impl Schema + 'static) -> Self {
        self.fields.push((name.into(), Box::new(schema)));
        self
    }
}

impl Schema for ObjectSchema {
    fn validate_opt(&self, value: Option<&Value>) -> Validation {
        let map = match value {
            Some(Value::Object(map)) => map,
            other => {
                return Validation::Invalid(vec![mismatch(format!(
                    "Expected object, got {}",
                    type_name(other)
                ))])
            }
        };
        let mut out = map.clone();
        let mut errors = Vec::new();
        for (name, schema) in &self.fields {
            match schema.validate_opt(map.get(name)) {
                Validation::Valid(value) => {
                    out.insert(name.clone(), value);
                }
                Validation::Omit => {
                    out.remove(name);
                }
                Validation::Invalid(field_errors) => {
                    errors.extend(
                        field_errors
                            .into_iter()
                            .map(|error| prefix_key(error, name)),
                    );
                }
            }
        }
        if errors.is_empty() {
            Validation::Valid(Value::Object(out))
        } else {
            Validation::Invalid(errors)
        }
    }
}

/// Accepts exactly one value.
pub struct LiteralSchema {
    expected: Value,
}

pub fn literal(expected: impl Into<Value>) -> LiteralSchema {
    LiteralSchema {
        expected: expected.into(),
    }
}

impl Schema for LiteralSchema {
    fn validate_opt(&self, value: Option<&Value>) -> Validation {
        match value {
            Some(value) if *value == self.expected => Validation::Valid(value.clone()),
            other => {
                let actual = match other {
                    Some(value) => value.to_string(),
                    None => "nothing".to_string(),
                };
                Validation::Invalid(vec![mismatch(format!(
                    "Expected literal {}, got {}",
                    self.expected, actual
                ))])
            }
        }
    }
}

/// Tries each variant in order; the first success wins.
///
/// On total failure a single generic error is reported; the per-variant
/// diagnostics are discarded.
pub struct UnionSchema {
    variants: Vec<Box<dyn Schema>>,
}

pub fn union() -> UnionSchema {
    UnionSchema {
        variants: Vec::new(),
    }
}

impl UnionSchema {
    pub fn variant(mut self, schema: impl Schema + 'static) -> Self {
        self.variants.push(Box::new(schema));
        self
    }
}

impl Schema for UnionSchema {
    fn validate_opt(&self, value: Option<&Value>) -> Validation {
        for variant in &self.variants {
            match variant.validate_opt(value) {
                Validation::Invalid(_) => continue,
                accepted => return accepted,
            }
        }
        Validation::Invalid(vec![mismatch("Value does not match any allowed variant")])
    }
}

/// Accepts anything, unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnknownSchema;

pub fn unknown() -> UnknownSchema {
    UnknownSchema
}

impl Schema for UnknownSchema {
    fn validate_opt(&self, value: Option<&Value>) -> Validation {
        match value {
            Some(value) => Validation::Valid(value.clone()),
            None => Validation::Omit,
        }
    }
}
