//! # swr-inject — Parameter Injection
//!
//! Walks a response value and rewrites placeholder tokens inside its string
//! members with values taken from a data map:
//!
//! ```text
//! {"message": "Hello, {name}"}  +  {"name": "Bob"}  ──▶  {"message": "Hello, Bob"}
//! ```
//!
//! ## Patterns
//!
//! | Pattern            | Token        |
//! |--------------------|--------------|
//! | `Colon`            | `:name`      |
//! | `Handlebar`        | `{name}`     |
//! | `DoubleHandlebar`  | `{{name}}`   |
//! | `Custom(Regex)`    | capture 1    |
//!
//! Identifiers match `[_$a-z][_$a-z0-9]*` case-insensitively; the lookup
//! in the data map is case-sensitive. Tokens naming an unknown key stay as
//! they are.
//!
//! ## Walk
//!
//! A record has each string member substituted and, when the injector is
//! recursive, each structured member walked. A sequence has each element
//! walked; strings sitting directly inside a sequence are left alone.
//!
//! Constrained responses ([`swr_schema::ConstrainedObject`],
//! [`swr_schema::ConstrainedArray`]) route every substituted string back
//! through `set`, so a substitution that breaks a constraint fails.

pub mod error;
pub mod injector;
pub mod pattern;

pub use error::InjectError;
pub use injector::{inject_parameters, Injectable, Injector};
pub use pattern::{default_pattern, set_default_pattern, InjectorPattern};
