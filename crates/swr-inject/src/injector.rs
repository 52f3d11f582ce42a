//! # Injector
//!
//! Walks values and applies an [`InjectorPattern`] to their string members.
//!
//! The walk distinguishes records from sequences. A record is an object, or
//! an array that sits directly inside a sequence; its string members are
//! substituted and, when recursive, its structured members are walked in
//! turn. A sequence is the root array or an array member of a record; its
//! elements are walked as records and its own strings are left alone.

use std::borrow::Cow;

use serde_json::{Map, Value};
use swr_schema::{ConstrainedArray, ConstrainedObject, Member, ValidationError};

use crate::pattern::{default_pattern, InjectorPattern};

/// Substitution settings: which tokens to look for, and whether to descend
/// into structured members of records.
#[derive(Debug, Clone)]
pub struct Injector {
    pattern: InjectorPattern,
    recursive: bool,
}

impl Injector {
    /// A recursive injector using the current process-wide default pattern.
    pub fn new() -> Self {
        Self::with_pattern(default_pattern())
    }

    /// A recursive injector using `pattern`.
    pub fn with_pattern(pattern: InjectorPattern) -> Self {
        Self {
            pattern,
            recursive: true,
        }
    }

    /// Set whether structured record members are walked.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn pattern(&self) -> &InjectorPattern {
        &self.pattern
    }

    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    /// Substitute placeholders throughout `target`.
    pub fn inject<T>(&self, target: &mut T, data: &Map<String, Value>) -> Result<(), T::Error>
    where
        T: Injectable + ?Sized,
    {
        target.inject_with(self, data)
    }

    /// The replacement for `text`, or `None` when nothing changed.
    fn replacement(&self, text: &str, data: &Map<String, Value>) -> Option<String> {
        match self.pattern.substitute(text, data) {
            Cow::Owned(replaced) if replaced != text => Some(replaced),
            _ => None,
        }
    }
}

impl Default for Injector {
    fn default() -> Self {
        Self::new()
    }
}

/// Substitute placeholders in `target` with a recursive injector using the
/// process-wide default pattern.
pub fn inject_parameters<T>(target: &mut T, data: &Map<String, Value>) -> Result<(), T::Error>
where
    T: Injectable + ?Sized,
{
    Injector::new().inject(target, data)
}

/// A value whose string members can be rewritten by an [`Injector`].
pub trait Injectable {
    type Error;

    fn inject_with(&mut self, injector: &Injector, data: &Map<String, Value>)
        -> Result<(), Self::Error>;
}

impl Injectable for Value {
    type Error = std::convert::Infallible;

    fn inject_with(
        &mut self,
        injector: &Injector,
        data: &Map<String, Value>,
    ) -> Result<(), Self::Error> {
        inject_value(injector, self, data);
        Ok(())
    }
}

fn inject_value(injector: &Injector, value: &mut Value, data: &Map<String, Value>) {
    match value {
        Value::Array(elements) => {
            for element in elements {
                inject_record(injector, element, data);
            }
        }
        record => inject_record(injector, record, data),
    }
}

fn inject_record(injector: &Injector, record: &mut Value, data: &Map<String, Value>) {
    let members: Box<dyn Iterator<Item = &mut Value> + '_> = match record {
        Value::Object(fields) => Box::new(fields.values_mut()),
        Value::Array(elements) => Box::new(elements.iter_mut()),
        _ => return,
    };
    for member in members {
        match member {
            Value::String(text) => {
                if let Some(replaced) = injector.replacement(text, data) {
                    *text = replaced;
                }
            }
            Value::Object(_) | Value::Array(_) if injector.recursive => {
                inject_value(injector, member, data);
            }
            _ => {}
        }
    }
}

impl Injectable for ConstrainedObject {
    type Error = ValidationError;

    /// Substituted strings are written back through [`ConstrainedObject::set`].
    fn inject_with(
        &mut self,
        injector: &Injector,
        data: &Map<String, Value>,
    ) -> Result<(), Self::Error> {
        let keys: Vec<String> = self.keys().map(str::to_owned).collect();
        for key in keys {
            let replacement = match self.get_mut(&key)? {
                Some(Member::Scalar(Value::String(text))) => injector.replacement(text, data),
                Some(member) if injector.recursive => {
                    inject_member(injector, member, data)?;
                    None
                }
                _ => None,
            };
            if let Some(replaced) = replacement {
                tracing::trace!(key = %key, "placeholder substituted");
                self.set(&key, Value::String(replaced))?;
            }
        }
        Ok(())
    }
}

impl Injectable for ConstrainedArray {
    type Error = ValidationError;

    fn inject_with(
        &mut self,
        injector: &Injector,
        data: &Map<String, Value>,
    ) -> Result<(), Self::Error> {
        for index in 0..self.len() {
            match self.get_mut(index) {
                Some(Member::Array(record)) => inject_array_record(injector, record, data)?,
                Some(Member::Scalar(value)) => inject_record(injector, value, data),
                Some(member) => inject_member(injector, member, data)?,
                None => {}
            }
        }
        Ok(())
    }
}

/// Walk an array nested directly in a sequence as a record: its string
/// elements are re-set through [`ConstrainedArray::set`].
fn inject_array_record(
    injector: &Injector,
    record: &mut ConstrainedArray,
    data: &Map<String, Value>,
) -> Result<(), ValidationError> {
    for index in 0..record.len() {
        let replacement = match record.get_mut(index) {
            Some(Member::Scalar(Value::String(text))) => injector.replacement(text, data),
            Some(member) if injector.recursive => {
                inject_member(injector, member, data)?;
                None
            }
            _ => None,
        };
        if let Some(replaced) = replacement {
            tracing::trace!(index, "placeholder substituted");
            record.set(index, Value::String(replaced))?;
        }
    }
    Ok(())
}

/// Walk a structured member. Scalar strings are not touched here.
fn inject_member(
    injector: &Injector,
    member: &mut Member,
    data: &Map<String, Value>,
) -> Result<(), ValidationError> {
    match member {
        Member::Object(object) => object.inject_with(injector, data),
        Member::Array(array) => array.inject_with(injector, data),
        Member::Scalar(value) => {
            inject_value(injector, value, data);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use swr_core::{PropertyPath, Schema};

    fn data(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test data must be an object"),
        }
    }

    fn handlebar() -> Injector {
        Injector::with_pattern(InjectorPattern::Handlebar)
    }

    #[test]
    fn test_object_members_substituted() {
        let mut root = json!({"message": "Hello, {name}", "count": 3});
        handlebar()
            .inject(&mut root, &data(json!({"name": "Bob"})))
            .unwrap();
        assert_eq!(root, json!({"message": "Hello, Bob", "count": 3}));
    }

    #[test]
    fn test_recursive_by_default() {
        let mut root = json!({"outer": {"inner": "{x}"}, "list": [{"v": "{x}"}]});
        handlebar().inject(&mut root, &data(json!({"x": "1"}))).unwrap();
        assert_eq!(root, json!({"outer": {"inner": "1"}, "list": [{"v": "1"}]}));
    }

    #[test]
    fn test_shallow_skips_nested_records() {
        let mut root = json!({"top": "{x}", "outer": {"inner": "{x}"}});
        handlebar()
            .recursive(false)
            .inject(&mut root, &data(json!({"x": "1"})))
            .unwrap();
        assert_eq!(root, json!({"top": "1", "outer": {"inner": "{x}"}}));
    }

    #[test]
    fn test_root_sequence_walks_each_record() {
        let mut root = json!([{"a": "{x}"}, {"b": "{x}"}, "{x}"]);
        handlebar()
            .recursive(false)
            .inject(&mut root, &data(json!({"x": "y"})))
            .unwrap();
        assert_eq!(root, json!([{"a": "y"}, {"b": "y"}, "{x}"]));
    }

    #[test]
    fn test_strings_inside_sequences_untouched() {
        let mut root = json!({"tags": ["{x}", "plain"]});
        handlebar().inject(&mut root, &data(json!({"x": "y"}))).unwrap();
        assert_eq!(root, json!({"tags": ["{x}", "plain"]}));
    }

    #[test]
    fn test_arrays_inside_sequences_walked_as_records() {
        let mut root = json!({"a": [["{x}", 1, ["{x}"]], "{x}"]});
        handlebar().inject(&mut root, &data(json!({"x": "Z"}))).unwrap();
        assert_eq!(root, json!({"a": [["Z", 1, ["{x}"]], "{x}"]}));

        let mut root = json!([["{x}"], [{"b": "{x}"}]]);
        handlebar().inject(&mut root, &data(json!({"x": "Z"}))).unwrap();
        assert_eq!(root, json!([["Z"], [{"b": "Z"}]]));
    }

    #[test]
    fn test_constrained_nested_sequence_records() {
        let mut object = constrained(json!({
            "type": "object",
            "properties": {
                "grid": {
                    "type": "array",
                    "items": {"type": "array", "items": {"type": "string", "maxLength": 3}}
                }
            }
        }));
        let grid = object.array_mut("grid").unwrap().unwrap();
        grid.push(json!(["{x}", "b"])).unwrap();
        handlebar()
            .inject(&mut object, &data(json!({"x": "Z"})))
            .unwrap();
        assert_eq!(object.to_value(), json!({"grid": [["Z", "b"]]}));

        object
            .array_mut("grid")
            .unwrap()
            .unwrap()
            .push(json!(["{x}"]))
            .unwrap();
        let err = handlebar()
            .inject(&mut object, &data(json!({"x": "long"})))
            .unwrap_err();
        assert_eq!(err.path(), "grid[1][0]");
    }

    #[test]
    fn test_scalar_root_untouched() {
        let mut root = json!("{x}");
        handlebar().inject(&mut root, &data(json!({"x": "y"}))).unwrap();
        assert_eq!(root, json!("{x}"));
    }

    #[test]
    fn test_colon_pattern_injector() {
        let mut root = json!({"path": "/pets/:petId"});
        Injector::with_pattern(InjectorPattern::Colon)
            .inject(&mut root, &data(json!({"petId": 12})))
            .unwrap();
        assert_eq!(root, json!({"path": "/pets/12"}));
    }

    fn constrained(schema: Value) -> ConstrainedObject {
        let schema = Schema::from_value(&schema).unwrap();
        ConstrainedObject::build(Arc::new(schema), PropertyPath::root()).unwrap()
    }

    #[test]
    fn test_constrained_object_substitution() {
        let mut object = constrained(json!({
            "type": "object",
            "properties": {
                "greeting": {"type": "string", "default": "Hi {name}"},
                "owner": {
                    "type": "object",
                    "properties": {"label": {"type": "string", "default": "{name}'s"}}
                },
                "pets": {
                    "type": "array",
                    "items": {"type": "object", "properties": {"name": {"type": "string"}}}
                }
            }
        }));
        object.array_mut("pets").unwrap().unwrap().push(json!({"name": "{name} Jr"})).unwrap();
        handlebar()
            .inject(&mut object, &data(json!({"name": "Ann"})))
            .unwrap();
        assert_eq!(
            object.to_value(),
            json!({
                "greeting": "Hi Ann",
                "owner": {"label": "Ann's"},
                "pets": [{"name": "Ann Jr"}]
            })
        );
    }

    #[test]
    fn test_constrained_substitution_is_validated() {
        let mut object = constrained(json!({
            "type": "object",
            "properties": {"code": {"type": "string", "maxLength": 4, "default": "{c}"}}
        }));
        let err = handlebar()
            .inject(&mut object, &data(json!({"c": "too long"})))
            .unwrap_err();
        assert_eq!(err.path(), "code");
        assert_eq!(object.to_value(), json!({"code": "{c}"}));
    }

    #[test]
    fn test_constrained_shallow() {
        let mut object = constrained(json!({
            "type": "object",
            "properties": {
                "top": {"type": "string", "default": "{x}"},
                "nested": {
                    "type": "object",
                    "properties": {"inner": {"type": "string", "default": "{x}"}}
                }
            }
        }));
        handlebar()
            .recursive(false)
            .inject(&mut object, &data(json!({"x": "1"})))
            .unwrap();
        assert_eq!(object.to_value(), json!({"top": "1", "nested": {"inner": "{x}"}}));
    }
}
