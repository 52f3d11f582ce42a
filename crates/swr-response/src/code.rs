//! Response code keys.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Key of an entry in an operation's `responses` map.
///
/// Numeric codes are stringified (`200` becomes `"200"`); the default is
/// the literal `"default"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseCode(String);

impl ResponseCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ResponseCode {
    fn default() -> Self {
        Self("default".to_string())
    }
}

impl From<u16> for ResponseCode {
    fn from(code: u16) -> Self {
        Self(code.to_string())
    }
}

impl From<&str> for ResponseCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

impl From<String> for ResponseCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
