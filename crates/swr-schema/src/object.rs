//! # Constrained Objects
//!
//! A [`ConstrainedObject`] is a record whose key set is fixed, at build
//! time, to exactly the declared `properties` of its schema. Reading or
//! writing any other key fails with
//! [`ValidationError::UnknownProperty`].
//!
//! ## Member Initialization
//!
//! ```text
//! array property                    ──▶ empty ConstrainedArray
//! object property with properties   ──▶ nested ConstrainedObject
//! anything else                     ──▶ unset
//! then: every property with a `default` is assigned through `set`
//! ```
//!
//! ## Assignment
//!
//! `set` validates first. On success:
//!
//! - **nested object**: the incoming keys are *merged* into the existing
//!   nested object. Keys the incoming value does not mention keep their
//!   current values. The merge is staged on a copy and committed whole.
//! - **array**: a fresh array is built and every element pushed through
//!   its item validator; it replaces the old array only if all pass.
//! - **scalar**: stored as is.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use swr_core::{PropertyPath, Schema, SchemaType};

use crate::array::ConstrainedArray;
use crate::error::ValidationError;
use crate::member::Member;
use crate::validator::Validator;

/// Closed-shape record over an object schema.
#[derive(Debug, Clone)]
pub struct ConstrainedObject {
    schema: Arc<Schema>,
    path: PropertyPath,
    fields: BTreeMap<String, Field>,
}

#[derive(Debug, Clone)]
struct Field {
    validator: Validator,
    value: Option<Member>,
}

impl ConstrainedObject {
    /// Build the object for `schema`, rooted at `path`.
    ///
    /// # Errors
    ///
    /// Fails if a property declares an invalid `pattern`, or if a declared
    /// `default` does not pass its own property's validator.
    pub fn build(schema: Arc<Schema>, path: PropertyPath) -> Result<Self, ValidationError> {
        let mut fields = BTreeMap::new();
        for (name, property) in schema.property_schemas() {
            let field_path = path.key(name.as_str());
            let validator = Validator::new(Arc::clone(property), field_path.clone())?;
            let value = match validator.schema_type() {
                SchemaType::Array => Some(Member::Array(ConstrainedArray::build(
                    Arc::clone(property),
                    field_path,
                )?)),
                SchemaType::Object if property.has_properties() => Some(Member::Object(
                    ConstrainedObject::build(Arc::clone(property), field_path)?,
                )),
                _ => None,
            };
            fields.insert(name.clone(), Field { validator, value });
        }

        let mut object = Self {
            schema: Arc::clone(&schema),
            path,
            fields,
        };
        for (name, property) in schema.property_schemas() {
            if let Some(default) = &property.default {
                object.set(name, default.clone())?;
            }
        }
        Ok(object)
    }

    /// The schema this object was built from.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// The object's location in its schema tree.
    pub fn path(&self) -> &PropertyPath {
        &self.path
    }

    /// Assign `value` to `key`.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownProperty`] if `key` is not declared;
    /// [`ValidationError::InvalidValue`] if `value` (or, for nested
    /// objects and arrays, any part of it) breaks a rule. On error the
    /// member keeps its previous value.
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), ValidationError> {
        let field = self
            .fields
            .get_mut(key)
            .ok_or_else(|| ValidationError::unknown_property(&self.path, key))?;

        field.validator.validate(&value)?;

        let is_array = *field.validator.schema_type() == SchemaType::Array;
        let member = match (field.value.as_mut(), value) {
            (Some(Member::Object(nested)), Value::Object(incoming)) => {
                nested.merge(incoming)?;
                return Ok(());
            }
            (_, Value::Array(items)) if is_array => {
                let mut array = ConstrainedArray::build(
                    Arc::clone(field.validator.schema()),
                    field.validator.path().clone(),
                )?;
                array.push_all(items)?;
                Member::Array(array)
            }
            (_, value) => Member::Scalar(value),
        };

        tracing::trace!(path = %field.validator.path(), "property assigned");
        field.value = Some(member);
        Ok(())
    }

    /// Merge every key of `incoming` into this object through [`set`].
    ///
    /// Keys absent from `incoming` are left untouched. All-or-nothing: if
    /// any key fails, no key is changed.
    ///
    /// [`set`]: ConstrainedObject::set
    pub fn merge(&mut self, incoming: Map<String, Value>) -> Result<(), ValidationError> {
        let mut staged = self.clone();
        staged.merge_in_place(incoming)?;
        *self = staged;
        Ok(())
    }

    pub(crate) fn merge_in_place(&mut self, incoming: Map<String, Value>) -> Result<(), ValidationError> {
        for (key, value) in incoming {
            self.set(&key, value)?;
        }
        Ok(())
    }

    /// Read `key`. `Ok(None)` means declared but unset.
    pub fn get(&self, key: &str) -> Result<Option<&Member>, ValidationError> {
        self.fields
            .get(key)
            .map(|field| field.value.as_ref())
            .ok_or_else(|| ValidationError::unknown_property(&self.path, key))
    }

    /// Mutable access to `key`'s member, for reaching nested containers.
    pub fn get_mut(&mut self, key: &str) -> Result<Option<&mut Member>, ValidationError> {
        match self.fields.get_mut(key) {
            Some(field) => Ok(field.value.as_mut()),
            None => Err(ValidationError::unknown_property(&self.path, key)),
        }
    }

    /// The nested object held by `key`, if it holds one.
    pub fn object_mut(&mut self, key: &str) -> Result<Option<&mut ConstrainedObject>, ValidationError> {
        Ok(self.get_mut(key)?.and_then(Member::as_object_mut))
    }

    /// The nested array held by `key`, if it holds one.
    pub fn array_mut(&mut self, key: &str) -> Result<Option<&mut ConstrainedArray>, ValidationError> {
        Ok(self.get_mut(key)?.and_then(Member::as_array_mut))
    }

    /// Whether `key` is a declared property.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Declared property names, in key order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Declared properties with their current members.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Member>)> {
        self.fields
            .iter()
            .map(|(key, field)| (key.as_str(), field.value.as_ref()))
    }

    /// Number of declared properties.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema declares no properties.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Plain JSON snapshot. Unset members are omitted.
    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .iter()
            .filter_map(|(key, member)| member.map(|m| (key.to_string(), m.to_value())))
            .collect();
        Value::Object(map)
    }
}

impl Serialize for ConstrainedObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let set: Vec<(&str, &Member)> = self
            .iter()
            .filter_map(|(key, member)| member.map(|m| (key, m)))
            .collect();
        let mut map = serializer.serialize_map(Some(set.len()))?;
        for (key, member) in set {
            map.serialize_entry(key, member)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn build(schema: Value) -> Result<ConstrainedObject, ValidationError> {
        let schema = Schema::from_value(&schema).unwrap();
        ConstrainedObject::build(Arc::new(schema), PropertyPath::root())
    }

    fn scalar<'a>(object: &'a ConstrainedObject, key: &str) -> Option<&'a Value> {
        object.get(key).unwrap().and_then(Member::as_scalar)
    }

    fn primitives() -> ConstrainedObject {
        build(json!({
            "type": "object",
            "properties": {
                "boolean": {"type": "boolean"},
                "string": {"type": "string", "minLength": 2, "maxLength": 5, "pattern": "^f"},
                "number": {"type": "number", "minimum": 0, "exclusiveMinimum": true, "maximum": 10},
                "number2": {"type": "number", "maximum": 10, "exclusiveMaximum": true}
            }
        }))
        .unwrap()
    }

    fn nested() -> ConstrainedObject {
        build(json!({
            "type": "object",
            "properties": {
                "foo": {
                    "type": "object",
                    "properties": {
                        "string": {"type": "string"},
                        "a": {"type": "number"},
                        "b": {"type": "number"}
                    }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_boolean_member() {
        let mut o = primitives();
        o.set("boolean", json!(true)).unwrap();
        assert_eq!(scalar(&o, "boolean"), Some(&json!(true)));
        assert!(o.set("boolean", json!(1)).is_err());
    }

    #[test]
    fn test_string_member_rules() {
        let mut o = primitives();
        o.set("string", json!("foo")).unwrap();
        assert_eq!(scalar(&o, "string"), Some(&json!("foo")));
        assert!(o.set("string", json!("bar")).is_err());
        assert!(o.set("string", json!("f")).is_err());
        assert!(o.set("string", json!("foofoofoo")).is_err());
    }

    #[test]
    fn test_number_member_rules() {
        let mut o = primitives();
        o.set("number", json!(1)).unwrap();
        assert_eq!(scalar(&o, "number"), Some(&json!(1)));
        assert!(o.set("number", json!(-1)).is_err());
        assert!(o.set("number", json!(0)).is_err());
        assert!(o.set("number", json!(11)).is_err());
        assert!(o.set("number2", json!(10)).is_err());
        o.set("number2", json!(9)).unwrap();
    }

    #[test]
    fn test_failed_write_keeps_prior_value() {
        let mut o = primitives();
        o.set("string", json!("foo")).unwrap();
        let err = o.set("string", json!("bar")).unwrap_err();
        assert_eq!(err.path(), "string");
        assert_eq!(scalar(&o, "string"), Some(&json!("foo")));
    }

    #[test]
    fn test_failed_first_write_leaves_unset() {
        let mut o = primitives();
        assert!(o.set("number", json!(0)).is_err());
        assert!(o.get("number").unwrap().is_none());
    }

    #[test]
    fn test_unknown_property_rejected() {
        let mut o = primitives();
        let err = o.set("number3", json!(5)).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownProperty { ref property, .. } if property == "number3"));
        assert!(o.get("number3").is_err());
        assert!(o.get_mut("number3").is_err());
        assert!(!o.contains_key("number3"));
        assert_eq!(o.keys().collect::<Vec<_>>(), vec!["boolean", "number", "number2", "string"]);
    }

    #[test]
    fn test_nested_object_rejects_scalar() {
        let mut o = nested();
        assert!(o.set("foo", json!("foo")).is_err());
    }

    #[test]
    fn test_nested_object_accepts_empty_object() {
        let mut o = nested();
        o.set("foo", json!({})).unwrap();
        let foo = o.get("foo").unwrap().and_then(Member::as_object).unwrap();
        assert!(foo.contains_key("string"));
        assert!(foo.get("string").unwrap().is_none());
    }

    #[test]
    fn test_nested_object_invalid_member_fails() {
        let mut o = nested();
        let err = o.set("foo", json!({"string": true})).unwrap_err();
        assert_eq!(err.path(), "foo.string");
    }

    #[test]
    fn test_nested_object_valid_member_passes() {
        let mut o = nested();
        o.set("foo", json!({"string": "string"})).unwrap();
        assert_eq!(o.to_value(), json!({"foo": {"string": "string"}}));
    }

    #[test]
    fn test_nested_assignment_merges() {
        let mut o = nested();
        o.set("foo", json!({"b": 2})).unwrap();
        o.set("foo", json!({"a": 1})).unwrap();
        assert_eq!(o.to_value(), json!({"foo": {"a": 1, "b": 2}}));
    }

    #[test]
    fn test_nested_merge_is_all_or_nothing() {
        let mut o = nested();
        o.set("foo", json!({"a": 1})).unwrap();
        assert!(o.set("foo", json!({"a": 5, "zzz": 1})).is_err());
        assert_eq!(o.to_value(), json!({"foo": {"a": 1}}));
    }

    #[test]
    fn test_nested_members_reachable_mutably() {
        let mut o = nested();
        o.object_mut("foo").unwrap().unwrap().set("a", json!(3)).unwrap();
        assert!(o.object_mut("foo").unwrap().unwrap().set("a", json!("3")).is_err());
        assert_eq!(o.to_value(), json!({"foo": {"a": 3}}));
    }

    #[test]
    fn test_defaults_applied_at_build() {
        let o = build(json!({
            "properties": {
                "status": {"type": "string", "default": "ok"},
                "meta": {
                    "type": "object",
                    "properties": {"count": {"type": "integer", "default": 0}}
                },
                "note": {"type": "string"}
            }
        }))
        .unwrap();
        assert_eq!(o.to_value(), json!({"status": "ok", "meta": {"count": 0}}));
    }

    #[test]
    fn test_invalid_default_fails_build() {
        let err = build(json!({
            "properties": {"status": {"type": "string", "maxLength": 1, "default": "long"}}
        }))
        .unwrap_err();
        assert_eq!(err.path(), "status");
    }

    #[test]
    fn test_array_member_initialized_empty() {
        let o = build(json!({
            "properties": {"tags": {"type": "array", "items": {"type": "string"}}}
        }))
        .unwrap();
        let tags = o.get("tags").unwrap().and_then(Member::as_array).unwrap();
        assert!(tags.is_empty());
        assert_eq!(o.to_value(), json!({"tags": []}));
    }

    #[test]
    fn test_array_member_replaced_and_revalidated() {
        let mut o = build(json!({
            "properties": {"tags": {"type": "array", "items": {"type": "string"}}}
        }))
        .unwrap();
        o.set("tags", json!(["a", "b"])).unwrap();
        assert_eq!(o.to_value(), json!({"tags": ["a", "b"]}));

        let err = o.set("tags", json!(["c", 1])).unwrap_err();
        assert_eq!(err.path(), "tags[1]");
        assert_eq!(o.to_value(), json!({"tags": ["a", "b"]}));

        o.array_mut("tags").unwrap().unwrap().push(json!("c")).unwrap();
        assert_eq!(o.to_value(), json!({"tags": ["a", "b", "c"]}));
    }

    #[test]
    fn test_schemaless_object_stored_raw() {
        let mut o = build(json!({"properties": {"extra": {"type": "object"}}})).unwrap();
        o.set("extra", json!({"anything": [1, 2]})).unwrap();
        assert_eq!(scalar(&o, "extra"), Some(&json!({"anything": [1, 2]})));
    }

    #[test]
    fn test_untyped_property_rejects_writes() {
        let mut o = build(json!({"properties": {"loose": {"description": "no type"}}})).unwrap();
        assert!(o.set("loose", json!("x")).is_err());
    }

    #[test]
    fn test_serialization_omits_unset() {
        let mut o = primitives();
        assert_eq!(serde_json::to_string(&o).unwrap(), "{}");
        o.set("boolean", json!(false)).unwrap();
        assert_eq!(serde_json::to_string(&o).unwrap(), r#"{"boolean":false}"#);
    }

    #[test]
    fn test_object_without_properties_is_empty() {
        let o = build(json!({"type": "object"})).unwrap();
        assert!(o.is_empty());
        assert_eq!(o.to_value(), json!({}));
    }
}
