//! # Validator Synthesis
//!
//! A [`Validator`] is built once for a schema node and the path it sits
//! at, then applied to every value written there. It is immutable and
//! cheap to clone (the schema and compiled pattern are shared).
//!
//! ## Rules
//!
//! | Resolved type      | Checks                                              |
//! |--------------------|-----------------------------------------------------|
//! | any                | runtime type equals the resolved type, no coercion  |
//! | `number`/`integer` | `maximum`, `minimum` (inclusive or exclusive), `multipleOf` |
//! | `string`           | `maxLength`, `minLength`, `pattern` (unanchored)    |
//!
//! `enum` is not part of [`Validator::validate`].

use std::sync::Arc;

use regex::Regex;
use serde_json::Value;
use swr_core::{runtime_type_name, values_equal, PropertyPath, Schema, SchemaType};

use crate::error::{render_path, ValidationError, Violation};

/// Validation function for one schema node at one property path.
#[derive(Debug, Clone)]
pub struct Validator {
    schema: Arc<Schema>,
    schema_type: SchemaType,
    path: PropertyPath,
    pattern: Option<Regex>,
}

impl Validator {
    /// Synthesize the validator for `schema` located at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPattern`] if the schema's `pattern`
    /// does not compile.
    pub fn new(schema: Arc<Schema>, path: PropertyPath) -> Result<Self, ValidationError> {
        let pattern = match &schema.pattern {
            Some(source) => Some(Regex::new(source).map_err(|e| {
                ValidationError::InvalidPattern {
                    path: render_path(&path, None),
                    pattern: source.clone(),
                    reason: e.to_string(),
                }
            })?),
            None => None,
        };
        Ok(Self {
            schema_type: schema.schema_type(),
            schema,
            path,
            pattern,
        })
    }

    /// The schema node this validator enforces.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// The resolved type of the schema node.
    pub fn schema_type(&self) -> &SchemaType {
        &self.schema_type
    }

    /// The path errors are reported against.
    pub fn path(&self) -> &PropertyPath {
        &self.path
    }

    /// Validate a value written at this validator's path.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        self.check(value).map_err(|violation| ValidationError::InvalidValue {
            path: render_path(&self.path, None),
            violation,
        })
    }

    /// Validate a value written at `index` below this validator's path.
    /// Errors report the path with an `[index]` suffix.
    pub fn validate_at(&self, value: &Value, index: usize) -> Result<(), ValidationError> {
        self.check(value).map_err(|violation| ValidationError::InvalidValue {
            path: render_path(&self.path, Some(index)),
            violation,
        })
    }

    /// Evaluate the rules and return the first one broken.
    pub fn check(&self, value: &Value) -> Result<(), Violation> {
        if !self.schema_type.matches(value) {
            return Err(Violation::InvalidType {
                expected: self.schema_type.to_string(),
                found: runtime_type_name(value),
            });
        }

        if self.schema_type.is_numeric() {
            if let Some(number) = value.as_f64() {
                self.check_number(number)?;
            }
        }

        if let Value::String(text) = value {
            self.check_string(text)?;
        }

        Ok(())
    }

    fn check_number(&self, value: f64) -> Result<(), Violation> {
        for bound in self.schema.upper_bounds() {
            if value > bound.limit || (bound.exclusive && value == bound.limit) {
                return Err(Violation::AboveMaximum {
                    value,
                    limit: bound.limit,
                    exclusive: bound.exclusive,
                });
            }
        }

        for bound in self.schema.lower_bounds() {
            if value < bound.limit || (bound.exclusive && value == bound.limit) {
                return Err(Violation::BelowMinimum {
                    value,
                    limit: bound.limit,
                    exclusive: bound.exclusive,
                });
            }
        }

        // Plain remainder: representation error can reject true multiples.
        if let Some(multiple_of) = self.schema.multiple_of {
            if value % multiple_of != 0.0 {
                return Err(Violation::NotMultipleOf { value, multiple_of });
            }
        }

        Ok(())
    }

    fn check_string(&self, value: &str) -> Result<(), Violation> {
        let length = value.chars().count();

        if let Some(max_length) = self.schema.max_length {
            if length as u64 > max_length {
                return Err(Violation::TooLong {
                    value: value.to_string(),
                    length,
                    max_length,
                });
            }
        }

        if let Some(min_length) = self.schema.min_length {
            if (length as u64) < min_length {
                return Err(Violation::TooShort {
                    value: value.to_string(),
                    length,
                    min_length,
                });
            }
        }

        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(value) {
                return Err(Violation::PatternMismatch {
                    value: value.to_string(),
                    pattern: pattern.as_str().to_string(),
                });
            }
        }

        Ok(())
    }

    /// Whether `value` equals one of the schema's `enum` entries, using
    /// structural equality. `None` when the schema declares no `enum`.
    ///
    /// Not consulted by [`Validator::validate`]: writes outside the enum
    /// are currently accepted.
    pub fn enum_allows(&self, value: &Value) -> Option<bool> {
        self.schema
            .enum_values
            .as_ref()
            .map(|allowed| allowed.iter().any(|candidate| values_equal(value, candidate)))
    }
}
