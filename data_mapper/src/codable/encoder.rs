//! Encoding containers.

use super::error::EncodingError;
use super::ser::ValueSerializer;
use super::{CodingKey, child_path, format_path};
use crate::value::GenericValue;
use std::collections::HashMap;

fn unsigned(value: u64) -> GenericValue {
    match i64::try_from(value) {
        Ok(value) => GenericValue::Int(value),
        Err(_) => GenericValue::Double(value as f64),
    }
}

fn encode_nested<T: serde::Serialize + ?Sized>(
    value: &T,
    coding_path: Vec<CodingKey>,
) -> Result<GenericValue, EncodingError> {
    value.serialize(ValueSerializer::with_path(coding_path))
}

/// Root of an encoding. Hands out containers over its storage.
#[derive(Debug, Default)]
pub struct Encoder {
    storage: GenericValue,
    coding_path: Vec<CodingKey>,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(coding_path: Vec<CodingKey>) -> Self {
        Self {
            storage: GenericValue::Null,
            coding_path,
        }
    }

    pub fn coding_path(&self) -> &[CodingKey] {
        &self.coding_path
    }

    /// A keyed container over the storage, reusing an existing map.
    ///
    /// # Panics
    ///
    /// Panics if the storage already holds something other than a map.
    pub fn container(&mut self) -> KeyedEncodingContainer<'_> {
        assert!(
            matches!(self.storage, GenericValue::Null | GenericValue::Map(_)),
            "Cannot encode a keyed container at '{}': a {} was already encoded there",
            format_path(&self.coding_path),
            self.storage.raw_type()
        );
        KeyedEncodingContainer::new(&mut self.storage, self.coding_path.clone())
    }

    /// An unkeyed container over the storage, reusing an existing array.
    ///
    /// # Panics
    ///
    /// Panics if the storage already holds something other than an array.
    pub fn unkeyed_container(&mut self) -> UnkeyedEncodingContainer<'_> {
        assert!(
            matches!(self.storage, GenericValue::Null | GenericValue::Array(_)),
            "Cannot encode an unkeyed container at '{}': a {} was already encoded there",
            format_path(&self.coding_path),
            self.storage.raw_type()
        );
        UnkeyedEncodingContainer::new(&mut self.storage, self.coding_path.clone())
    }

    pub fn single_value_container(&mut self) -> SingleValueEncodingContainer<'_> {
        SingleValueEncodingContainer::new(&mut self.storage, self.coding_path.clone())
    }

    pub fn into_value(self) -> GenericValue {
        self.storage
    }
}

/// Writes entries into a map node.
#[derive(Debug)]
pub struct KeyedEncodingContainer<'a> {
    map: &'a mut HashMap<String, GenericValue>,
    coding_path: Vec<CodingKey>,
}

impl<'a> KeyedEncodingContainer<'a> {
    pub(crate) fn new(node: &'a mut GenericValue, coding_path: Vec<CodingKey>) -> Self {
        Self {
            map: node.promote_to_map(),
            coding_path,
        }
    }

    pub fn coding_path(&self) -> &[CodingKey] {
        &self.coding_path
    }

    pub fn encode_nil(&mut self, key: &str) {
        self.encode_value(key, GenericValue::Null);
    }

    pub fn encode_bool(&mut self, key: &str, value: bool) {
        self.encode_value(key, GenericValue::Bool(value));
    }

    pub fn encode_i64(&mut self, key: &str, value: i64) {
        self.encode_value(key, GenericValue::Int(value));
    }

    /// Values above `i64::MAX` are stored as doubles.
    pub fn encode_u64(&mut self, key: &str, value: u64) {
        self.encode_value(key, unsigned(value));
    }

    pub fn encode_f64(&mut self, key: &str, value: f64) {
        self.encode_value(key, GenericValue::Double(value));
    }

    pub fn encode_str(&mut self, key: &str, value: &str) {
        self.encode_value(key, GenericValue::from(value));
    }

    /// Stores an already built value, replacing any previous entry.
    pub fn encode_value(&mut self, key: &str, value: GenericValue) {
        self.map.insert(key.to_string(), value);
    }

    /// Encodes a nested serde value through a fresh sub-encoder.
    pub fn encode<T: serde::Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<(), EncodingError> {
        let path = child_path(&self.coding_path, CodingKey::Key(key.to_string()));
        let value = encode_nested(value, path)?;
        self.encode_value(key, value);
        Ok(())
    }

    /// A keyed container stored under `key`, reusing an existing map.
    ///
    /// # Panics
    ///
    /// Panics if `key` already holds something other than a map.
    pub fn nested_container(&mut self, key: &str) -> KeyedEncodingContainer<'_> {
        let path = child_path(&self.coding_path, CodingKey::Key(key.to_string()));
        let node = self
            .map
            .entry(key.to_string())
            .or_insert_with(GenericValue::empty_map);
        assert!(
            matches!(node, GenericValue::Map(_)),
            "Cannot encode a keyed container at '{}': a {} was already encoded there",
            format_path(&path),
            node.raw_type()
        );
        KeyedEncodingContainer::new(node, path)
    }

    /// An unkeyed container stored under `key`, reusing an existing array.
    ///
    /// # Panics
    ///
    /// Panics if `key` already holds something other than an array.
    pub fn nested_unkeyed_container(&mut self, key: &str) -> UnkeyedEncodingContainer<'_> {
        let path = child_path(&self.coding_path, CodingKey::Key(key.to_string()));
        let node = self
            .map
            .entry(key.to_string())
            .or_insert_with(|| GenericValue::Array(Vec::new()));
        assert!(
            matches!(node, GenericValue::Array(_)),
            "Cannot encode an unkeyed container at '{}': a {} was already encoded there",
            format_path(&path),
            node.raw_type()
        );
        UnkeyedEncodingContainer::new(node, path)
    }
}

/// Appends elements to an array node.
#[derive(Debug)]
pub struct UnkeyedEncodingContainer<'a> {
    array: &'a mut Vec<GenericValue>,
    coding_path: Vec<CodingKey>,
}

impl<'a> UnkeyedEncodingContainer<'a> {
    pub(crate) fn new(node: &'a mut GenericValue, coding_path: Vec<CodingKey>) -> Self {
        Self {
            array: node.promote_to_array(),
            coding_path,
        }
    }

    pub fn coding_path(&self) -> &[CodingKey] {
        &self.coding_path
    }

    /// Number of elements encoded so far, including those written by earlier containers.
    pub fn count(&self) -> usize {
        self.array.len()
    }

    pub fn encode_nil(&mut self) {
        self.encode_value(GenericValue::Null);
    }

    pub fn encode_bool(&mut self, value: bool) {
        self.encode_value(GenericValue::Bool(value));
    }

    pub fn encode_i64(&mut self, value: i64) {
        self.encode_value(GenericValue::Int(value));
    }

    pub fn encode_u64(&mut self, value: u64) {
        self.encode_value(unsigned(value));
    }

    pub fn encode_f64(&mut self, value: f64) {
        self.encode_value(GenericValue::Double(value));
    }

    pub fn encode_str(&mut self, value: &str) {
        self.encode_value(GenericValue::from(value));
    }

    pub fn encode_value(&mut self, value: GenericValue) {
        self.array.push(value);
    }

    pub fn encode<T: serde::Serialize + ?Sized>(&mut self, value: &T) -> Result<(), EncodingError> {
        let path = child_path(&self.coding_path, CodingKey::Index(self.count()));
        let value = encode_nested(value, path)?;
        self.encode_value(value);
        Ok(())
    }

    /// Appends an empty map and returns a keyed container over it.
    pub fn nested_container(&mut self) -> KeyedEncodingContainer<'_> {
        let (node, path) = self.push_node(GenericValue::empty_map());
        KeyedEncodingContainer::new(node, path)
    }

    /// Appends an empty array and returns an unkeyed container over it.
    pub fn nested_unkeyed_container(&mut self) -> UnkeyedEncodingContainer<'_> {
        let (node, path) = self.push_node(GenericValue::Array(Vec::new()));
        UnkeyedEncodingContainer::new(node, path)
    }

    fn push_node(&mut self, node: GenericValue) -> (&mut GenericValue, Vec<CodingKey>) {
        let index = self.count();
        let path = child_path(&self.coding_path, CodingKey::Index(index));
        self.array.push(node);
        (&mut self.array[index], path)
    }
}

/// Holds exactly one value.
#[derive(Debug)]
pub struct SingleValueEncodingContainer<'a> {
    node: &'a mut GenericValue,
    coding_path: Vec<CodingKey>,
    written: bool,
}

impl<'a> SingleValueEncodingContainer<'a> {
    pub(crate) fn new(node: &'a mut GenericValue, coding_path: Vec<CodingKey>) -> Self {
        Self {
            node,
            coding_path,
            written: false,
        }
    }

    pub fn coding_path(&self) -> &[CodingKey] {
        &self.coding_path
    }

    pub fn encode_nil(&mut self) {
        self.encode_value(GenericValue::Null);
    }

    pub fn encode_bool(&mut self, value: bool) {
        self.encode_value(GenericValue::Bool(value));
    }

    pub fn encode_i64(&mut self, value: i64) {
        self.encode_value(GenericValue::Int(value));
    }

    pub fn encode_u64(&mut self, value: u64) {
        self.encode_value(unsigned(value));
    }

    pub fn encode_f64(&mut self, value: f64) {
        self.encode_value(GenericValue::Double(value));
    }

    pub fn encode_str(&mut self, value: &str) {
        self.encode_value(GenericValue::from(value));
    }

    /// # Panics
    ///
    /// Panics if this container already holds a value.
    pub fn encode_value(&mut self, value: GenericValue) {
        assert!(
            !self.written,
            "Attempt to encode a second value at '{}' in a single value container",
            format_path(&self.coding_path)
        );
        self.written = true;
        *self.node = value;
    }

    pub fn encode<T: serde::Serialize + ?Sized>(&mut self, value: &T) -> Result<(), EncodingError> {
        let value = encode_nested(value, self.coding_path.clone())?;
        self.encode_value(value);
        Ok(())
    }
}
