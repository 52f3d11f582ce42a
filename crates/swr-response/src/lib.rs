//! # swr-response — Managed Responses
//!
//! Entry point of the workspace. Given a request that already carries
//! resolved operation metadata, builds the constrained value for one of the
//! operation's responses:
//!
//! ```text
//! request.swagger.operation.responses.<code>.schema
//!            │
//!            ▼
//!   resolve_type ──▶ object ──▶ ConstrainedObject
//!                ──▶ array  ──▶ ConstrainedArray
//!                ──▶ other  ──▶ UnsupportedSchemaType
//! ```
//!
//! When no metadata is present yet, [`resolve_from_document`] loads an API
//! document (`.json`, `.yaml` or `.yml`), lets an [`OperationResolver`]
//! attach the metadata, and then builds the response.
//!
//! ## Modules
//!
//! - [`facade`]: `resolve_response`, `manageable`, `prepare_request`,
//!   `resolve_from_document`.
//! - [`document`]: format detection and YAML/JSON loading.
//! - [`resolver`]: the operation-resolution seam and its path-template
//!   implementation.
//! - [`code`]: the [`ResponseCode`] key.
//! - [`error`]: [`ResponseError`].

pub mod code;
pub mod document;
pub mod error;
pub mod facade;
pub mod resolver;

pub use code::ResponseCode;
pub use document::{load_document, parse_document, DocumentFormat};
pub use error::ResponseError;
pub use facade::{
    manageable, prepare_request, resolve_from_document, resolve_response, ManagedResponse,
};
pub use resolver::{OperationResolver, PathTemplateResolver, ResolveError};
