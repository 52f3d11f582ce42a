//! # Error Types
//!
//! Errors raised while interpreting raw JSON as a [`Schema`](crate::Schema).
//! Validation failures of *values* live in `swr-schema`.

use thiserror::Error;

/// A raw JSON fragment could not be read as a schema node.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The fragment is not a JSON object.
    #[error("schema node must be an object, found {found}")]
    NotAnObject {
        /// Runtime type of the offending fragment.
        found: &'static str,
    },

    /// A keyword carried a value of the wrong shape.
    #[error("malformed schema node: {0}")]
    Malformed(#[from] serde_json::Error),
}
