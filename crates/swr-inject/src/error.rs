//! Errors raised while building injector patterns.

use thiserror::Error;

/// A custom injector pattern could not be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InjectError {
    /// The pattern source does not compile.
    #[error("invalid injector pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The pattern has no capture group for the identifier.
    #[error("injector pattern '{pattern}' has no capture group for the identifier")]
    MissingCapture { pattern: String },

    /// The name is not one of the built-in patterns.
    #[error("unknown injector pattern '{0}', expected colon, handlebar or double-handlebar")]
    UnknownPattern(String),
}
