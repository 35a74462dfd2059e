//! Decoding containers.

use super::de::ValueDeserializer;
use super::error::DecodingError;
use super::{CodingKey, child_path, format_path};
use crate::value::{GenericValue, RawType};
use serde::de::{DeserializeOwned, DeserializeSeed};
use std::any::type_name;
use std::collections::HashMap;

type Result<T> = std::result::Result<T, DecodingError>;

fn not_found(path: &[CodingKey], expected: &str) -> DecodingError {
    DecodingError::ValueNotFound {
        path: format_path(path),
        expected: expected.to_string(),
    }
}

/// A present null is reported as a missing value, anything else as a mismatch.
pub(super) fn mismatch(path: &[CodingKey], expected: &str, actual: &GenericValue) -> DecodingError {
    if actual.is_null() {
        return not_found(path, expected);
    }
    DecodingError::TypeMismatch {
        path: format_path(path),
        expected: expected.to_string(),
        actual: actual.raw_type(),
    }
}

fn read_bool(value: &GenericValue, path: &[CodingKey]) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| mismatch(path, RawType::Bool.as_str(), value))
}

fn read_i64(value: &GenericValue, path: &[CodingKey]) -> Result<i64> {
    value
        .as_int()
        .ok_or_else(|| mismatch(path, RawType::Int.as_str(), value))
}

/// Only doubles and ambiguous numbers read as `f64`. A plain int does not widen.
fn read_f64(value: &GenericValue, path: &[CodingKey]) -> Result<f64> {
    value
        .as_double()
        .ok_or_else(|| mismatch(path, RawType::Double.as_str(), value))
}

fn read_str<'a>(value: &'a GenericValue, path: &[CodingKey]) -> Result<&'a str> {
    value
        .as_string()
        .ok_or_else(|| mismatch(path, RawType::String.as_str(), value))
}

fn read_nested<T: DeserializeOwned>(value: &GenericValue, path: Vec<CodingKey>) -> Result<T> {
    T::deserialize(ValueDeserializer::with_path(value, path))
}

/// Root of a decoding. Hands out containers over a borrowed value.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    storage: &'a GenericValue,
    coding_path: Vec<CodingKey>,
}

impl<'a> Decoder<'a> {
    pub fn new(storage: &'a GenericValue) -> Self {
        Self::with_path(storage, Vec::new())
    }

    pub fn with_path(storage: &'a GenericValue, coding_path: Vec<CodingKey>) -> Self {
        Self {
            storage,
            coding_path,
        }
    }

    pub fn coding_path(&self) -> &[CodingKey] {
        &self.coding_path
    }

    pub fn value(&self) -> &'a GenericValue {
        self.storage
    }

    /// # Errors
    ///
    /// [`DecodingError::TypeMismatch`] if the value is not a map.
    pub fn container(&self) -> Result<KeyedDecodingContainer<'a>> {
        KeyedDecodingContainer::new(self.storage, self.coding_path.clone())
    }

    /// # Errors
    ///
    /// [`DecodingError::TypeMismatch`] if the value is not an array.
    pub fn unkeyed_container(&self) -> Result<UnkeyedDecodingContainer<'a>> {
        UnkeyedDecodingContainer::new(self.storage, self.coding_path.clone())
    }

    pub fn single_value_container(&self) -> SingleValueDecodingContainer<'a> {
        SingleValueDecodingContainer::new(self.storage, self.coding_path.clone())
    }
}

/// Reads entries of a map node by key.
#[derive(Debug, Clone)]
pub struct KeyedDecodingContainer<'a> {
    map: &'a HashMap<String, GenericValue>,
    coding_path: Vec<CodingKey>,
}

impl<'a> KeyedDecodingContainer<'a> {
    pub(crate) fn new(node: &'a GenericValue, coding_path: Vec<CodingKey>) -> Result<Self> {
        match node.as_map() {
            Some(map) => Ok(Self { map, coding_path }),
            None => Err(mismatch(&coding_path, RawType::Map.as_str(), node)),
        }
    }

    pub fn coding_path(&self) -> &[CodingKey] {
        &self.coding_path
    }

    /// Keys in no particular order.
    pub fn all_keys(&self) -> Vec<&'a str> {
        self.map.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Returns true if `key` holds an explicit null.
    ///
    /// # Errors
    ///
    /// [`DecodingError::ValueNotFound`] if `key` is missing.
    pub fn decode_nil(&self, key: &str) -> Result<bool> {
        let (value, _) = self.entry(key, RawType::Null.as_str())?;
        Ok(value.is_null())
    }

    pub fn decode_bool(&self, key: &str) -> Result<bool> {
        let (value, path) = self.entry(key, RawType::Bool.as_str())?;
        read_bool(value, &path)
    }

    pub fn decode_i64(&self, key: &str) -> Result<i64> {
        let (value, path) = self.entry(key, RawType::Int.as_str())?;
        read_i64(value, &path)
    }

    pub fn decode_f64(&self, key: &str) -> Result<f64> {
        let (value, path) = self.entry(key, RawType::Double.as_str())?;
        read_f64(value, &path)
    }

    pub fn decode_str(&self, key: &str) -> Result<&'a str> {
        let (value, path) = self.entry(key, RawType::String.as_str())?;
        read_str(value, &path)
    }

    pub fn decode_string(&self, key: &str) -> Result<String> {
        self.decode_str(key).map(str::to_string)
    }

    /// Decodes a nested serde value through a fresh sub-decoder.
    pub fn decode<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let (value, path) = self.entry(key, type_name::<T>())?;
        read_nested(value, path)
    }

    pub(crate) fn decode_seed<'de, S: DeserializeSeed<'de>>(
        &self,
        key: &str,
        seed: S,
    ) -> Result<S::Value> {
        let (value, path) = self.entry(key, "value")?;
        seed.deserialize(ValueDeserializer::with_path(value, path))
    }

    pub fn nested_container(&self, key: &str) -> Result<KeyedDecodingContainer<'a>> {
        let (value, path) = self.entry(key, RawType::Map.as_str())?;
        KeyedDecodingContainer::new(value, path)
    }

    pub fn nested_unkeyed_container(&self, key: &str) -> Result<UnkeyedDecodingContainer<'a>> {
        let (value, path) = self.entry(key, RawType::Array.as_str())?;
        UnkeyedDecodingContainer::new(value, path)
    }

    fn entry(&self, key: &str, expected: &str) -> Result<(&'a GenericValue, Vec<CodingKey>)> {
        let path = child_path(&self.coding_path, CodingKey::Key(key.to_string()));
        match self.map.get(key) {
            Some(value) => Ok((value, path)),
            None => Err(not_found(&path, expected)),
        }
    }
}

/// Reads the elements of an array node in order.
///
/// The cursor only moves past an element once it has been decoded successfully.
#[derive(Debug, Clone)]
pub struct UnkeyedDecodingContainer<'a> {
    array: &'a [GenericValue],
    current_index: usize,
    coding_path: Vec<CodingKey>,
}

impl<'a> UnkeyedDecodingContainer<'a> {
    pub(crate) fn new(node: &'a GenericValue, coding_path: Vec<CodingKey>) -> Result<Self> {
        match node.as_array() {
            Some(array) => Ok(Self {
                array,
                current_index: 0,
                coding_path,
            }),
            None => Err(mismatch(&coding_path, RawType::Array.as_str(), node)),
        }
    }

    pub fn coding_path(&self) -> &[CodingKey] {
        &self.coding_path
    }

    pub fn count(&self) -> usize {
        self.array.len()
    }

    pub fn is_at_end(&self) -> bool {
        self.current_index >= self.array.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Skips the current element and returns true if it is null.
    pub fn decode_nil(&mut self) -> Result<bool> {
        let (value, _) = self.peek(RawType::Null.as_str())?;
        if value.is_null() {
            self.current_index += 1;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn decode_bool(&mut self) -> Result<bool> {
        self.advance(RawType::Bool.as_str(), read_bool)
    }

    pub fn decode_i64(&mut self) -> Result<i64> {
        self.advance(RawType::Int.as_str(), read_i64)
    }

    pub fn decode_f64(&mut self) -> Result<f64> {
        self.advance(RawType::Double.as_str(), read_f64)
    }

    pub fn decode_str(&mut self) -> Result<&'a str> {
        self.advance(RawType::String.as_str(), read_str)
    }

    pub fn decode_string(&mut self) -> Result<String> {
        self.decode_str().map(str::to_string)
    }

    pub fn decode<T: DeserializeOwned>(&mut self) -> Result<T> {
        let (value, path) = self.peek(type_name::<T>())?;
        let decoded = read_nested(value, path)?;
        self.current_index += 1;
        Ok(decoded)
    }

    pub(crate) fn decode_seed<'de, S: DeserializeSeed<'de>>(&mut self, seed: S) -> Result<S::Value> {
        let (value, path) = self.peek("value")?;
        let decoded = seed.deserialize(ValueDeserializer::with_path(value, path))?;
        self.current_index += 1;
        Ok(decoded)
    }

    pub fn nested_container(&mut self) -> Result<KeyedDecodingContainer<'a>> {
        let (value, path) = self.peek(RawType::Map.as_str())?;
        let container = KeyedDecodingContainer::new(value, path)?;
        self.current_index += 1;
        Ok(container)
    }

    pub fn nested_unkeyed_container(&mut self) -> Result<UnkeyedDecodingContainer<'a>> {
        let (value, path) = self.peek(RawType::Array.as_str())?;
        let container = UnkeyedDecodingContainer::new(value, path)?;
        self.current_index += 1;
        Ok(container)
    }

    fn peek(&self, expected: &str) -> Result<(&'a GenericValue, Vec<CodingKey>)> {
        let path = child_path(&self.coding_path, CodingKey::Index(self.current_index));
        match self.array.get(self.current_index) {
            Some(value) => Ok((value, path)),
            None => Err(not_found(&path, expected)),
        }
    }

    fn advance<T, F>(&mut self, expected: &str, read: F) -> Result<T>
    where
        F: FnOnce(&'a GenericValue, &[CodingKey]) -> Result<T>,
    {
        let (value, path) = self.peek(expected)?;
        let decoded = read(value, &path)?;
        self.current_index += 1;
        Ok(decoded)
    }
}

/// Reads exactly one value.
#[derive(Debug, Clone)]
pub struct SingleValueDecodingContainer<'a> {
    value: &'a GenericValue,
    coding_path: Vec<CodingKey>,
    consumed: bool,
}

impl<'a> SingleValueDecodingContainer<'a> {
    pub(crate) fn new(value: &'a GenericValue, coding_path: Vec<CodingKey>) -> Self {
        Self {
            value,
            coding_path,
            consumed: false,
        }
    }

    pub fn coding_path(&self) -> &[CodingKey] {
        &self.coding_path
    }

    /// Returns true if the value is null. Does not consume the container.
    pub fn decode_nil(&self) -> bool {
        self.value.is_null()
    }

    pub fn decode_bool(&mut self) -> Result<bool> {
        read_bool(self.take(), &self.coding_path)
    }

    pub fn decode_i64(&mut self) -> Result<i64> {
        read_i64(self.take(), &self.coding_path)
    }

    pub fn decode_f64(&mut self) -> Result<f64> {
        read_f64(self.take(), &self.coding_path)
    }

    pub fn decode_str(&mut self) -> Result<&'a str> {
        read_str(self.take(), &self.coding_path)
    }

    pub fn decode_string(&mut self) -> Result<String> {
        self.decode_str().map(str::to_string)
    }

    pub fn decode<T: DeserializeOwned>(&mut self) -> Result<T> {
        let value = self.take();
        read_nested(value, self.coding_path.clone())
    }

    /// # Panics
    ///
    /// Panics if a value was already decoded from this container.
    fn take(&mut self) -> &'a GenericValue {
        assert!(
            !self.consumed,
            "Attempt to decode a second value at '{}' from a single value container",
            format_path(&self.coding_path)
        );
        self.consumed = true;
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::number::SupportedNumber;

    fn sample() -> GenericValue {
        let mut value = GenericValue::empty_map();
        value.set("name", GenericValue::from("Alice"));
        value.set("age", GenericValue::Number(SupportedNumber::from_int(30)));
        value.set("nickname", GenericValue::Null);
        value.set(
            "tags",
            GenericValue::Array(vec![
                GenericValue::from("a"),
                GenericValue::Null,
                GenericValue::Int(3),
            ]),
        );
        value.set_path("address.city", GenericValue::from("Paris"));
        value
    }

    #[test]
    fn test_keyed_container_reads_entries() {
        let value = sample();
        let container = Decoder::new(&value).container().unwrap();

        assert!(container.contains("name"));
        assert!(!container.contains("email"));
        assert_eq!(container.decode_str("name").unwrap(), "Alice");
        assert_eq!(container.decode_i64("age").unwrap(), 30);
        assert_eq!(container.decode_f64("age").unwrap(), 30.0);
        assert!(container.decode_nil("nickname").unwrap());
        assert!(!container.decode_nil("name").unwrap());
        assert_eq!(container.all_keys().len(), 5);
    }

    #[test]
    fn test_plain_int_does_not_read_as_double() {
        let mut value = GenericValue::empty_map();
        value.set("count", GenericValue::Int(2));
        let container = Decoder::new(&value).container().unwrap();

        assert_eq!(container.decode_i64("count").unwrap(), 2);
        assert_eq!(
            container.decode_f64("count").unwrap_err(),
            DecodingError::TypeMismatch {
                path: "count".to_string(),
                expected: "double".to_string(),
                actual: RawType::Int
            }
        );
    }

    #[test]
    fn test_keyed_container_errors() {
        let value = sample();
        let container = Decoder::new(&value).container().unwrap();

        let err = container.decode_i64("email").unwrap_err();
        assert_eq!(
            err,
            DecodingError::ValueNotFound {
                path: "email".to_string(),
                expected: "int".to_string()
            }
        );

        let err = container.decode_bool("name").unwrap_err();
        assert_eq!(
            err,
            DecodingError::TypeMismatch {
                path: "name".to_string(),
                expected: "bool".to_string(),
                actual: RawType::String
            }
        );

        assert!(matches!(
            container.decode_nil("email"),
            Err(DecodingError::ValueNotFound { .. })
        ));
        assert!(matches!(
            container.decode_string("nickname"),
            Err(DecodingError::ValueNotFound { .. })
        ));
    }

    #[test]
    fn test_container_on_wrong_shape_fails_fast() {
        let value = GenericValue::Int(1);
        let decoder = Decoder::new(&value);
        assert!(matches!(
            decoder.container(),
            Err(DecodingError::TypeMismatch { actual: RawType::Int, .. })
        ));
        assert!(decoder.unkeyed_container().is_err());
    }

    #[test]
    fn test_nested_containers_carry_their_path() {
        let value = sample();
        let container = Decoder::new(&value).container().unwrap();
        let address = container.nested_container("address").unwrap();
        assert_eq!(address.decode_str("city").unwrap(), "Paris");

        let err = address.decode_str("zip").unwrap_err();
        assert!(err.to_string().contains("'address.zip'"));
    }

    #[test]
    fn test_unkeyed_cursor_advances_on_success_only() {
        let value = sample();
        let container = Decoder::new(&value).container().unwrap();
        let mut tags = container.nested_unkeyed_container("tags").unwrap();

        assert_eq!(tags.count(), 3);
        assert!(!tags.decode_nil().unwrap());
        assert_eq!(tags.decode_string().unwrap(), "a");
        assert_eq!(tags.current_index(), 1);

        let err = tags.decode_i64().unwrap_err();
        assert!(err.to_string().contains("tags[1]"));
        assert_eq!(tags.current_index(), 1);
        assert!(tags.decode_nil().unwrap());

        let err = tags.decode_str().unwrap_err();
        assert_eq!(
            err,
            DecodingError::TypeMismatch {
                path: "tags[2]".to_string(),
                expected: "string".to_string(),
                actual: RawType::Int
            }
        );
        assert_eq!(tags.decode::<u8>().unwrap(), 3);
        assert!(tags.is_at_end());
        assert!(matches!(
            tags.decode_bool(),
            Err(DecodingError::ValueNotFound { .. })
        ));
    }

    #[test]
    fn test_single_value_container() {
        let value = GenericValue::Bool(true);
        let mut container = Decoder::new(&value).single_value_container();
        assert!(!container.decode_nil());
        assert!(container.decode_bool().unwrap());
    }

    #[test]
    #[should_panic(expected = "second value")]
    fn test_single_value_container_second_read_panics() {
        let value = GenericValue::Int(1);
        let mut container = Decoder::new(&value).single_value_container();
        let _ = container.decode_i64();
        let _ = container.decode_i64();
    }
}
