//! # swr-schema — Schema-Constrained Values
//!
//! Builds live values from schema nodes that refuse invalid writes at the
//! moment of assignment.
//!
//! ## Components
//!
//! - [`Validator`]: synthesized once per schema node and path; checks the
//!   runtime type and the numeric/string constraints of a value.
//! - [`ConstrainedObject`]: closed-shape record. Its key set is exactly
//!   the schema's declared properties; every write runs that key's
//!   validator first. Assigning to a nested object member **merges** into
//!   it rather than replacing it.
//! - [`ConstrainedArray`]: growable sequence over one item schema with
//!   `set`/`push`/`unshift`/`fill`/`splice`, all validated.
//! - [`Member`]: what a key or slot holds: a scalar, a nested object or a
//!   nested array.
//!
//! ## Write Guarantee
//!
//! A failed write never leaves partial state behind. Single writes validate
//! and materialize before touching the store; merges and multi-element
//! operations are staged and committed only when every element succeeds.
//!
//! ## Known Gaps
//!
//! - `enum` is parsed but not enforced. [`Validator::enum_allows`] exposes
//!   the comparison for callers that want it.
//! - `multipleOf` uses plain floating-point remainder, so values such as
//!   `0.3` against `multipleOf: 0.1` are rejected.

pub mod array;
pub mod error;
pub mod member;
pub mod object;
pub mod validator;

pub use array::{ConstrainedArray, MAX_LENGTH};
pub use error::{ValidationError, Violation};
pub use member::Member;
pub use object::ConstrainedObject;
pub use validator::Validator;
