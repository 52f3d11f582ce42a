//! # Schema Nodes
//!
//! A [`Schema`] is the typed, read-only form of a schema fragment taken
//! from an API description document. Only the keywords the constrained
//! containers act on are modelled; every other keyword is ignored on
//! deserialization.
//!
//! ## Type Resolution
//!
//! ```text
//! "type" present        ──▶ that type
//! "properties" present  ──▶ object
//! otherwise             ──▶ undefined
//! ```
//!
//! `undefined` is a real tag: a value can never match it, so a property
//! without a type accepts no writes.
//!
//! ## Exclusive Bounds
//!
//! Swagger 2.0 spells `exclusiveMinimum`/`exclusiveMaximum` as booleans
//! modifying `minimum`/`maximum`; JSON Schema draft 6+ spells them as
//! standalone numeric limits. Both forms are accepted and surfaced
//! uniformly through [`Schema::lower_bounds`] and [`Schema::upper_bounds`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaError;

// ─── Type Tags ──────────────────────────────────────────────────────

/// The type tag a schema node resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SchemaType {
    /// A record with named members.
    Object,
    /// An ordered sequence.
    Array,
    /// A UTF-8 string.
    String,
    /// Any JSON number.
    Number,
    /// A JSON number without a fractional part.
    Integer,
    /// `true` or `false`.
    Boolean,
    /// JSON `null`.
    Null,
    /// No type declared and no properties: matches nothing.
    Undefined,
    /// A declared type name this crate does not know. Matches nothing.
    Other(String),
}

impl SchemaType {
    /// Map a declared `type` keyword to its tag.
    pub fn from_name(name: &str) -> Self {
        match name {
            "object" => Self::Object,
            "array" => Self::Array,
            "string" => Self::String,
            "number" => Self::Number,
            "integer" => Self::Integer,
            "boolean" => Self::Boolean,
            "null" => Self::Null,
            "undefined" => Self::Undefined,
            other => Self::Other(other.to_string()),
        }
    }

    /// The tag's name as it appears in a schema document.
    pub fn name(&self) -> &str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Undefined => "undefined",
            Self::Other(name) => name,
        }
    }

    /// Whether a value's runtime type satisfies this tag.
    ///
    /// Strict: no coercion, `Undefined` and `Other` never match.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => is_integral(value),
            Self::Boolean => value.is_boolean(),
            Self::Null => value.is_null(),
            Self::Undefined | Self::Other(_) => false,
        }
    }

    /// Whether numeric constraints (`minimum`, `multipleOf`, ...) apply.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Number | Self::Integer)
    }

    /// Whether values of this type are containers built by the
    /// constrained-value machinery rather than stored as scalars.
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Object | Self::Array)
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn is_integral(value: &Value) -> bool {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => true,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.fract() == 0.0),
        _ => false,
    }
}

/// Name of a value's runtime type, for diagnostics.
pub fn runtime_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ─── Bounds ─────────────────────────────────────────────────────────

/// `exclusiveMinimum` / `exclusiveMaximum` in either spelling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExclusiveBound {
    /// Swagger 2.0: makes the sibling `minimum`/`maximum` exclusive.
    Flag(bool),
    /// JSON Schema: an exclusive limit of its own.
    Limit(f64),
}

/// One numeric limit a value is compared against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericBound {
    /// The limit itself.
    pub limit: f64,
    /// Whether a value equal to `limit` is rejected.
    pub exclusive: bool,
}

// ─── Schema Node ────────────────────────────────────────────────────

/// Typed view of a schema fragment.
///
/// # Invariants
///
/// - Immutable once built; shared across every value built from it.
/// - Child nodes sit behind `Arc`, so building a nested container only
///   bumps reference counts.
/// - `properties` iterate in key order, which fixes member order in
///   serialized snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Declared `type` keyword.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    /// Declared member schemas (object schemas).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Arc<Schema>>>,
    /// Item schema (array schemas).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Arc<Schema>>,
    /// Value applied when a constrained object is first built.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Allowed values. Parsed but not enforced, see `Validator::enum_allows`.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<ExclusiveBound>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<ExclusiveBound>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl Schema {
    /// Read a schema node from a raw JSON fragment.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NotAnObject`] if `value` is not a JSON object,
    /// and [`SchemaError::Malformed`] if a modelled keyword has the wrong
    /// shape (e.g. `"minLength": "3"`).
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        if !value.is_object() {
            return Err(SchemaError::NotAnObject {
                found: runtime_type_name(value),
            });
        }
        Ok(Schema::deserialize(value)?)
    }

    /// Shorthand for a node with only a `type`.
    pub fn of_type(name: &str) -> Self {
        Self {
            type_name: Some(name.to_string()),
            ..Self::default()
        }
    }

    /// The resolved type tag. See [`resolve_type`].
    pub fn schema_type(&self) -> SchemaType {
        resolve_type(self)
    }

    /// Whether the node declares a `properties` map (possibly empty).
    pub fn has_properties(&self) -> bool {
        self.properties.is_some()
    }

    /// Declared member schemas, in key order.
    pub fn property_schemas(&self) -> impl Iterator<Item = (&String, &Arc<Schema>)> {
        self.properties.iter().flat_map(|props| props.iter())
    }

    /// Limits a value must stay at or above.
    pub fn lower_bounds(&self) -> Vec<NumericBound> {
        bounds(self.minimum, self.exclusive_minimum)
    }

    /// Limits a value must stay at or below.
    pub fn upper_bounds(&self) -> Vec<NumericBound> {
        bounds(self.maximum, self.exclusive_maximum)
    }
}

fn bounds(inclusive: Option<f64>, exclusive: Option<ExclusiveBound>) -> Vec<NumericBound> {
    let flag = matches!(exclusive, Some(ExclusiveBound::Flag(true)));
    let mut out = Vec::with_capacity(2);
    if let Some(limit) = inclusive {
        out.push(NumericBound {
            limit,
            exclusive: flag,
        });
    }
    if let Some(ExclusiveBound::Limit(limit)) = exclusive {
        out.push(NumericBound {
            limit,
            exclusive: true,
        });
    }
    out
}

/// Resolve the type tag of a schema node. Never fails.
pub fn resolve_type(node: &Schema) -> SchemaType {
    match (&node.type_name, &node.properties) {
        (Some(name), _) => SchemaType::from_name(name),
        (None, Some(_)) => SchemaType::Object,
        (None, None) => SchemaType::Undefined,
    }
}
