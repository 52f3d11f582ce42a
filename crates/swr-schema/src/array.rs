//! # Constrained Arrays
//!
//! A [`ConstrainedArray`] is a growable, index-addressable sequence over a
//! single item schema. Every way of putting an element into it runs the
//! item validator first:
//!
//! | Operation  | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `set`      | write slot `i`, extending the sequence if `i >= len`      |
//! | `push`     | append after the last slot                                |
//! | `unshift`  | insert at the front, shifting existing slots up           |
//! | `fill`     | write one value into every slot of a range                |
//! | `splice`   | remove a run of slots and insert new elements in its place|
//!
//! ## Absent Slots
//!
//! Writing past the end leaves the slots in between *absent*: `get`
//! returns `None` for them and they serialize as `null`. They are never
//! compacted away.
//!
//! No slot index may reach [`MAX_LENGTH`]. Writes that would need one fail
//! with [`ValidationError::IndexOutOfRange`], as does a growth the allocator
//! refuses.
//!
//! ## Element Materialization
//!
//! Object items whose schema declares properties become fresh
//! [`ConstrainedObject`]s (defaults applied, then the written value merged
//! in). Array items become nested [`ConstrainedArray`]s. Everything else is
//! stored as a scalar.

use std::ops::{Bound, RangeBounds};
use std::sync::Arc;

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use serde_json::Value;
use swr_core::{PropertyPath, Schema, SchemaType};

use crate::error::{render_path, ValidationError};
use crate::member::Member;
use crate::object::ConstrainedObject;
use crate::validator::Validator;

/// One past the highest writable slot index.
pub const MAX_LENGTH: usize = u32::MAX as usize;

/// Validated sequence over an array schema's `items`.
#[derive(Debug, Clone)]
pub struct ConstrainedArray {
    path: PropertyPath,
    validator: Validator,
    store: Vec<Option<Member>>,
}

impl ConstrainedArray {
    /// Build an empty array for the array schema `schema`, rooted at `path`.
    ///
    /// A schema without `items` gets an empty item schema, which resolves
    /// to `undefined` and so rejects every element.
    ///
    /// # Errors
    ///
    /// Fails if the item schema declares an invalid `pattern`.
    pub fn build(schema: Arc<Schema>, path: PropertyPath) -> Result<Self, ValidationError> {
        let items = schema
            .items
            .clone()
            .unwrap_or_else(|| Arc::new(Schema::default()));
        let validator = Validator::new(items, path.clone())?;
        Ok(Self {
            path,
            validator,
            store: Vec::new(),
        })
    }

    /// The item schema every element is validated against.
    pub fn item_schema(&self) -> &Arc<Schema> {
        self.validator.schema()
    }

    /// The array's location in its schema tree.
    pub fn path(&self) -> &PropertyPath {
        &self.path
    }

    /// Number of slots, absent ones included.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether the array has no slots.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// The element at `index`; `None` when absent or out of range.
    pub fn get(&self, index: usize) -> Option<&Member> {
        self.store.get(index).and_then(Option::as_ref)
    }

    /// Mutable access to the element at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Member> {
        self.store.get_mut(index).and_then(Option::as_mut)
    }

    /// Slots in order; absent slots yield `None`.
    pub fn iter(&self) -> impl Iterator<Item = Option<&Member>> {
        self.store.iter().map(Option::as_ref)
    }

    /// Validate and write `value` at `index`, extending the array when
    /// `index >= len`. Intervening slots stay absent.
    pub fn set(&mut self, index: usize, value: Value) -> Result<(), ValidationError> {
        let end = self.slot_end(index)?;
        let member = self.prepare(index, value)?;
        self.grow_to(end, index)?;
        self.place(index, member);
        Ok(())
    }

    /// Append one element.
    pub fn push(&mut self, value: Value) -> Result<(), ValidationError> {
        self.set(self.len(), value)
    }

    /// Append elements in order. All-or-nothing.
    pub fn push_all<I>(&mut self, values: I) -> Result<(), ValidationError>
    where
        I: IntoIterator<Item = Value>,
    {
        let start = self.len();
        let members = self.prepare_run(start, values)?;
        self.check_run(start, members.len())?;
        self.store.extend(members.into_iter().map(Some));
        Ok(())
    }

    /// Insert one element at the front.
    pub fn unshift(&mut self, value: Value) -> Result<(), ValidationError> {
        self.unshift_all([value])
    }

    /// Insert elements at the front, keeping their order. All-or-nothing.
    pub fn unshift_all<I>(&mut self, values: I) -> Result<(), ValidationError>
    where
        I: IntoIterator<Item = Value>,
    {
        let members = self.prepare_run(0, values)?;
        self.check_run(self.len(), members.len())?;
        self.store.splice(0..0, members.into_iter().map(Some));
        Ok(())
    }

    /// Write `value` into every slot of `range`. An unbounded end means
    /// `len`; an end past `len` extends the array. All-or-nothing.
    ///
    /// The value is validated once, for the first slot of the range, before
    /// anything is written.
    pub fn fill<R>(&mut self, value: Value, range: R) -> Result<(), ValidationError>
    where
        R: RangeBounds<usize>,
    {
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => self.slot_end(s)?,
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => self.slot_end(e)?,
            Bound::Excluded(&e) if e > MAX_LENGTH => return Err(self.out_of_range(e)),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => self.len(),
        };
        if start >= end {
            return Ok(());
        }

        let first = self.prepare(start, value.clone())?;
        self.grow_to(end, end - 1)?;
        self.place(start, first);
        for index in start + 1..end {
            let member = self.prepare(index, value.clone())?;
            self.place(index, member);
        }
        Ok(())
    }

    /// Remove `delete_count` slots starting at `start`, then insert
    /// `values` in their place. Returns the removed slots.
    ///
    /// `start` is clamped to `len` and `delete_count` to the slots that
    /// remain after `start`. All-or-nothing: if any inserted value fails
    /// validation nothing is removed.
    pub fn splice<I>(
        &mut self,
        start: usize,
        delete_count: usize,
        values: I,
    ) -> Result<Vec<Option<Member>>, ValidationError>
    where
        I: IntoIterator<Item = Value>,
    {
        let start = start.min(self.len());
        let end = start + delete_count.min(self.len() - start);
        let members = self.prepare_run(start, values)?;
        self.check_run(self.len() - (end - start), members.len())?;
        let removed = self
            .store
            .splice(start..end, members.into_iter().map(Some))
            .collect();
        Ok(removed)
    }

    /// Plain JSON snapshot; absent slots become `null`.
    pub fn to_value(&self) -> Value {
        Value::Array(
            self.iter()
                .map(|slot| slot.map_or(Value::Null, Member::to_value))
                .collect(),
        )
    }

    /// Validate and materialize a run of values destined for consecutive
    /// slots beginning at `start`.
    fn prepare_run<I>(&self, start: usize, values: I) -> Result<Vec<Member>, ValidationError>
    where
        I: IntoIterator<Item = Value>,
    {
        values
            .into_iter()
            .enumerate()
            .map(|(offset, value)| self.prepare(start + offset, value))
            .collect()
    }

    /// Validate `value` for slot `index` and turn it into a member.
    /// Touches nothing in the store.
    fn prepare(&self, index: usize, value: Value) -> Result<Member, ValidationError> {
        self.validator.validate_at(&value, index)?;

        let items = self.validator.schema();
        let member = match (self.validator.schema_type(), value) {
            (SchemaType::Object, Value::Object(incoming)) if items.has_properties() => {
                let mut object = ConstrainedObject::build(Arc::clone(items), self.path.index(index))?;
                object.merge_in_place(incoming)?;
                Member::Object(object)
            }
            (SchemaType::Array, Value::Array(elements)) => {
                let mut nested = ConstrainedArray::build(Arc::clone(items), self.path.index(index))?;
                nested.push_all(elements)?;
                Member::Array(nested)
            }
            (_, value) => Member::Scalar(value),
        };
        Ok(member)
    }

    /// Slot count needed to hold `index`.
    fn slot_end(&self, index: usize) -> Result<usize, ValidationError> {
        index
            .checked_add(1)
            .filter(|&end| end <= MAX_LENGTH)
            .ok_or_else(|| self.out_of_range(index))
    }

    /// Reject appending `count` slots after `len` when that passes
    /// [`MAX_LENGTH`].
    fn check_run(&self, len: usize, count: usize) -> Result<(), ValidationError> {
        match len.checked_add(count) {
            Some(end) if end <= MAX_LENGTH => Ok(()),
            _ => Err(self.out_of_range(len.saturating_add(count))),
        }
    }

    /// Extend the store with absent slots up to `end`.
    fn grow_to(&mut self, end: usize, index: usize) -> Result<(), ValidationError> {
        let len = self.store.len();
        if end > len {
            self.store
                .try_reserve(end - len)
                .map_err(|_| self.out_of_range(index))?;
            self.store.resize_with(end, || None);
        }
        Ok(())
    }

    fn out_of_range(&self, index: usize) -> ValidationError {
        ValidationError::IndexOutOfRange {
            path: render_path(&self.path, None),
            index,
        }
    }

    /// Write a prepared member into a slot `grow_to` has already made room for.
    fn place(&mut self, index: usize, member: Member) {
        tracing::trace!(path = %self.path, index, "array slot written");
        self.store[index] = Some(member);
    }
}

impl Serialize for ConstrainedArray {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for slot in self.iter() {
            seq.serialize_element(&slot)?;
        }
        seq.end()
    }
}
