//! # swr-core — Foundational Types
//!
//! Leaf crate of the `swr` workspace. Defines the read-only schema model
//! every constrained value is built from, plus the small primitives shared
//! by the validator, the constrained containers, and the response facade.
//!
//! ## Key Types
//!
//! - [`Schema`]: typed view of a JSON Schema / OpenAPI schema fragment.
//!   Deserialized once, shared behind `Arc`, never mutated.
//! - [`SchemaType`] and [`resolve_type`]: the type tag a schema node
//!   resolves to (explicit `type`, else `object` when `properties` is
//!   declared, else `undefined`).
//! - [`PropertyPath`]: `a.b[0].c` style address used in error messages.
//! - [`values_equal`]: structural equality across nested JSON values.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `swr-*` crates.
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests.

pub mod equality;
pub mod error;
pub mod path;
pub mod schema;

pub use equality::values_equal;
pub use error::SchemaError;
pub use path::{PathSegment, PropertyPath};
pub use schema::{resolve_type, runtime_type_name, ExclusiveBound, NumericBound, Schema, SchemaType};
