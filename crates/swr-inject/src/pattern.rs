//! # Injector Patterns
//!
//! Token grammars for placeholder substitution, plus the process-wide
//! default used by [`crate::inject_parameters`] and [`crate::Injector::new`].
//!
//! The default starts as [`InjectorPattern::Handlebar`]. Changing it affects
//! injectors created afterwards; existing injectors keep their snapshot.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

use crate::error::InjectError;

static COLON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i):([_$a-z][_$a-z0-9]*)").expect("valid regex constant"));

static HANDLEBAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\{([_$a-z][_$a-z0-9]*)\}").expect("valid regex constant"));

static DOUBLE_HANDLEBAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\{\{([_$a-z][_$a-z0-9]*)\}\}").expect("valid regex constant")
});

static DEFAULT_PATTERN: Lazy<RwLock<InjectorPattern>> =
    Lazy::new(|| RwLock::new(InjectorPattern::Handlebar));

/// How placeholder tokens are recognized in a string.
#[derive(Debug, Clone)]
pub enum InjectorPattern {
    /// `:name`
    Colon,
    /// `{name}`
    Handlebar,
    /// `{{name}}`
    DoubleHandlebar,
    /// Caller-supplied expression; capture group 1 is the identifier.
    Custom(Regex),
}

impl InjectorPattern {
    /// Compile a custom pattern.
    ///
    /// # Errors
    ///
    /// [`InjectError::InvalidPattern`] if `source` does not compile,
    /// [`InjectError::MissingCapture`] if it has no capture group.
    pub fn custom(source: &str) -> Result<Self, InjectError> {
        let regex = Regex::new(source).map_err(|e| InjectError::InvalidPattern {
            pattern: source.to_string(),
            reason: e.to_string(),
        })?;
        if regex.captures_len() < 2 {
            return Err(InjectError::MissingCapture {
                pattern: source.to_string(),
            });
        }
        Ok(Self::Custom(regex))
    }

    /// The compiled expression behind this pattern.
    pub fn regex(&self) -> &Regex {
        match self {
            Self::Colon => &COLON,
            Self::Handlebar => &HANDLEBAR,
            Self::DoubleHandlebar => &DOUBLE_HANDLEBAR,
            Self::Custom(regex) => regex,
        }
    }

    /// Short name of the pattern.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Colon => "colon",
            Self::Handlebar => "handlebar",
            Self::DoubleHandlebar => "double-handlebar",
            Self::Custom(_) => "custom",
        }
    }

    /// Replace every token in `text` whose identifier is a key of `data`.
    ///
    /// String values are inserted verbatim; any other JSON value is
    /// inserted as its compact JSON text. Tokens naming unknown keys are
    /// kept literally.
    pub fn substitute<'t>(&self, text: &'t str, data: &Map<String, Value>) -> Cow<'t, str> {
        self.regex().replace_all(text, |caps: &Captures<'_>| {
            match caps.get(1).and_then(|name| data.get(name.as_str())) {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => caps[0].to_string(),
            }
        })
    }
}

impl Default for InjectorPattern {
    fn default() -> Self {
        Self::Handlebar
    }
}

impl fmt::Display for InjectorPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(regex) => write!(f, "custom({})", regex.as_str()),
            other => f.write_str(other.name()),
        }
    }
}

impl FromStr for InjectorPattern {
    type Err = InjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "colon" => Ok(Self::Colon),
            "handlebar" => Ok(Self::Handlebar),
            "double-handlebar" | "double_handlebar" | "doublehandlebar" => {
                Ok(Self::DoubleHandlebar)
            }
            _ => Err(InjectError::UnknownPattern(s.to_string())),
        }
    }
}

/// Replace the process-wide default pattern.
pub fn set_default_pattern(pattern: InjectorPattern) {
    tracing::debug!(pattern = %pattern, "default injector pattern changed");
    *DEFAULT_PATTERN.write() = pattern;
}

/// A copy of the current process-wide default pattern.
pub fn default_pattern() -> InjectorPattern {
    DEFAULT_PATTERN.read().clone()
}
