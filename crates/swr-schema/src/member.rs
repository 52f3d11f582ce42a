//! # Members
//!
//! The content of one object key or one array slot.

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::array::ConstrainedArray;
use crate::object::ConstrainedObject;

/// A value held by a constrained container.
#[derive(Debug, Clone)]
pub enum Member {
    /// A plain JSON value (string, number, boolean, schemaless object...).
    Scalar(Value),
    /// A nested closed-shape object.
    Object(ConstrainedObject),
    /// A nested constrained sequence.
    Array(ConstrainedArray),
}

impl Member {
    /// The scalar value, if this member is one.
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// The nested object, if this member is one.
    pub fn as_object(&self) -> Option<&ConstrainedObject> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Mutable access to the nested object.
    pub fn as_object_mut(&mut self) -> Option<&mut ConstrainedObject> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// The nested array, if this member is one.
    pub fn as_array(&self) -> Option<&ConstrainedArray> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Mutable access to the nested array.
    pub fn as_array_mut(&mut self) -> Option<&mut ConstrainedArray> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Plain JSON snapshot of this member.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Scalar(value) => value.clone(),
            Self::Object(object) => object.to_value(),
            Self::Array(array) => array.to_value(),
        }
    }
}

impl Serialize for Member {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Scalar(value) => value.serialize(serializer),
            Self::Object(object) => object.serialize(serializer),
            Self::Array(array) => array.serialize(serializer),
        }
    }
}
