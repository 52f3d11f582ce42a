//! # Validation Errors
//!
//! Every rejected write surfaces as a [`ValidationError`] carrying the full
//! property path (`pets[0].name`) and, for constraint failures, a typed
//! [`Violation`] describing the rule that failed.

use std::fmt;

use swr_core::PropertyPath;
use thiserror::Error;

/// A rejected write or read on a constrained value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The value broke a type or constraint rule.
    #[error("invalid value for {path}: {violation}")]
    InvalidValue {
        /// Rendered path of the target, including any index suffix.
        path: String,
        /// The rule that failed.
        violation: Violation,
    },

    /// The key is not among the schema's declared properties.
    #[error("no such property '{property}' on {path}")]
    UnknownProperty {
        /// Rendered path of the object that was addressed.
        path: String,
        /// The undeclared key.
        property: String,
    },

    /// The write would need a slot at or past the array's maximum length.
    #[error("index {index} out of range for {path}")]
    IndexOutOfRange {
        /// Rendered path of the array.
        path: String,
        /// The slot index that could not be reached.
        index: usize,
    },

    /// The schema's `pattern` is not a valid regular expression.
    #[error("invalid pattern '{pattern}' for {path}: {reason}")]
    InvalidPattern {
        /// Rendered path of the schema node.
        path: String,
        /// The offending pattern source.
        pattern: String,
        /// Compiler diagnostic.
        reason: String,
    },
}

impl ValidationError {
    /// The rendered path the error refers to.
    pub fn path(&self) -> &str {
        match self {
            Self::InvalidValue { path, .. }
            | Self::UnknownProperty { path, .. }
            | Self::IndexOutOfRange { path, .. }
            | Self::InvalidPattern { path, .. } => path,
        }
    }

    /// The failed rule, for constraint failures.
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Self::InvalidValue { violation, .. } => Some(violation),
            _ => None,
        }
    }

    pub(crate) fn unknown_property(path: &PropertyPath, property: &str) -> Self {
        Self::UnknownProperty {
            path: render_path(path, None),
            property: property.to_string(),
        }
    }
}

/// Render a path for messages. The root renders as `(root)`.
pub(crate) fn render_path(path: &PropertyPath, index: Option<usize>) -> String {
    let mut rendered = path.to_string();
    if let Some(index) = index {
        rendered.push_str(&format!("[{index}]"));
    }
    if rendered.is_empty() {
        rendered.push_str("(root)");
    }
    rendered
}

/// The specific rule a value broke.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// Runtime type does not match the resolved schema type.
    InvalidType {
        /// Resolved schema type name.
        expected: String,
        /// Runtime type name of the value.
        found: &'static str,
    },
    /// Above `maximum`, or equal to it when the bound is exclusive.
    AboveMaximum {
        value: f64,
        limit: f64,
        exclusive: bool,
    },
    /// Below `minimum`, or equal to it when the bound is exclusive.
    BelowMinimum {
        value: f64,
        limit: f64,
        exclusive: bool,
    },
    /// `value % multipleOf` is non-zero.
    NotMultipleOf { value: f64, multiple_of: f64 },
    /// Character count above `maxLength`.
    TooLong {
        value: String,
        length: usize,
        max_length: u64,
    },
    /// Character count below `minLength`.
    TooShort {
        value: String,
        length: usize,
        min_length: u64,
    },
    /// No match for `pattern`.
    PatternMismatch { value: String, pattern: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidType { expected, found } => {
                write!(f, "invalid type, expected {expected} but found {found}")
            }
            Self::AboveMaximum {
                value,
                limit,
                exclusive,
            } => write!(f, "value {value} over {}maximum {limit}", qualifier(*exclusive)),
            Self::BelowMinimum {
                value,
                limit,
                exclusive,
            } => write!(f, "value {value} under {}minimum {limit}", qualifier(*exclusive)),
            Self::NotMultipleOf { value, multiple_of } => {
                write!(f, "value {value} not a multiple of {multiple_of}")
            }
            Self::TooLong {
                value,
                length,
                max_length,
            } => write!(
                f,
                "value {value} has length ({length}) above max length {max_length}"
            ),
            Self::TooShort {
                value,
                length,
                min_length,
            } => write!(
                f,
                "value {value} has length ({length}) below min length {min_length}"
            ),
            Self::PatternMismatch { value, pattern } => {
                write!(f, "value {value} does not match pattern {pattern}")
            }
        }
    }
}

fn qualifier(exclusive: bool) -> &'static str {
    if exclusive {
        "exclusive "
    } else {
        ""
    }
}
