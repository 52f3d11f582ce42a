//! # Response Errors
//!
//! Everything that can go wrong between a request and a managed response:
//! metadata lookup, schema shape, the constrained build itself, and, for
//! document-backed resolution, loading and operation matching.

use swr_core::SchemaError;
use swr_schema::ValidationError;
use thiserror::Error;

use crate::resolver::ResolveError;

/// Failure to produce a managed response.
#[derive(Error, Debug)]
pub enum ResponseError {
    /// A key along the metadata chain does not exist.
    #[error("unexpected object structure: {missing} does not exist at {path} in {shape}")]
    StructuralLookup {
        /// The key that was looked for.
        missing: String,
        /// Dotted path walked so far, `(root)` when nothing was walked.
        path: String,
        /// Short description of the value the key was looked up in.
        shape: String,
    },

    /// The response schema resolves to neither `object` nor `array`.
    #[error("response can only be managed if the schema is an array or object, found {found}")]
    UnsupportedSchemaType { found: String },

    /// The response schema fragment could not be read as a schema.
    #[error("invalid response schema for code '{code}': {source}")]
    InvalidSchema {
        code: String,
        #[source]
        source: SchemaError,
    },

    /// Building the constrained value failed, typically on a default.
    #[error("response build failed: {0}")]
    Validation(#[from] ValidationError),

    /// The document path does not end in `.json`, `.yaml` or `.yml`.
    #[error("document path must be a .json, .yaml or .yml file: {path}")]
    UnsupportedDocumentFormat { path: String },

    /// The request is not usable.
    #[error("invalid request: {reason}")]
    InvalidInput { reason: String },

    /// The document could not be read or parsed.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoad { path: String, reason: String },

    /// No operation in the document matches the request.
    #[error("operation resolution failed: {0}")]
    Resolve(#[from] ResolveError),
}
