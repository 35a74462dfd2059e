//! Format-agnostic value representation and manipulation.

use crate::number::SupportedNumber;
use std::collections::HashMap;
use std::fmt;

/// The kind of a [`GenericValue`], used to describe shape mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawType {
    Null,
    Bool,
    Int,
    Double,
    String,
    Array,
    Map,
    Number,
}

impl RawType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RawType::Null => "null",
            RawType::Bool => "bool",
            RawType::Int => "int",
            RawType::Double => "double",
            RawType::String => "string",
            RawType::Array => "array",
            RawType::Map => "map",
            RawType::Number => "number",
        }
    }
}

impl fmt::Display for RawType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dynamically shaped value that every wire format maps into.
#[derive(Debug, Clone, Default)]
pub enum GenericValue {
    /// Explicit null. A missing key is not the same thing, see [`GenericValue::get`].
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    Array(Vec<GenericValue>),
    /// Key order is irrelevant.
    Map(HashMap<String, GenericValue>),
    /// A number whose int/double/bool kind is decided by the reader.
    Number(SupportedNumber),
}

impl GenericValue {
    /// An empty map, the usual starting point for a serialized struct.
    pub fn empty_map() -> Self {
        GenericValue::Map(HashMap::new())
    }

    pub fn raw_type(&self) -> RawType {
        match self {
            GenericValue::Null => RawType::Null,
            GenericValue::Bool(_) => RawType::Bool,
            GenericValue::Int(_) => RawType::Int,
            GenericValue::Double(_) => RawType::Double,
            GenericValue::String(_) => RawType::String,
            GenericValue::Array(_) => RawType::Array,
            GenericValue::Map(_) => RawType::Map,
            GenericValue::Number(_) => RawType::Number,
        }
    }

    /// Returns true if this is an explicit null.
    pub fn is_null(&self) -> bool {
        matches!(self, GenericValue::Null)
    }

    /// Returns the boolean if this is a bool or a number with a boolean projection.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            GenericValue::Bool(value) => Some(*value),
            GenericValue::Number(number) => number.as_bool(),
            _ => None,
        }
    }

    /// Returns the integer if this is an int or a number with an int projection.
    ///
    /// A `Double` never truncates into an int.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            GenericValue::Int(value) => Some(*value),
            GenericValue::Number(number) => number.as_int(),
            _ => None,
        }
    }

    /// Returns the double if this is a double or a number with a double projection.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            GenericValue::Double(value) => Some(*value),
            GenericValue::Number(number) => number.as_double(),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        if let GenericValue::String(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    pub fn as_array(&self) -> Option<&Vec<GenericValue>> {
        if let GenericValue::Array(array) = self {
            Some(array)
        } else {
            None
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<GenericValue>> {
        if let GenericValue::Array(array) = self {
            Some(array)
        } else {
            None
        }
    }

    pub fn as_map(&self) -> Option<&HashMap<String, GenericValue>> {
        if let GenericValue::Map(map) = self {
            Some(map)
        } else {
            None
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut HashMap<String, GenericValue>> {
        if let GenericValue::Map(map) = self {
            Some(map)
        } else {
            None
        }
    }

    pub fn as_number(&self) -> Option<&SupportedNumber> {
        if let GenericValue::Number(number) = self {
            Some(number)
        } else {
            None
        }
    }

    /// Looks up `key` in a map. Returns `None` for a missing key or a non-map value.
    pub fn get(&self, key: &str) -> Option<&GenericValue> {
        self.as_map()?.get(key)
    }

    /// Gets a nested value by key path (dot notation).
    ///
    /// # Examples
    ///
    /// ```
    /// use data_mapper::GenericValue;
    ///
    /// let mut value = GenericValue::empty_map();
    /// value.set_path("user.name", GenericValue::from("Alice"));
    ///
    /// assert_eq!(value.get_path("user.name").and_then(|v| v.as_string()), Some("Alice"));
    /// assert!(value.get_path("user.age").is_none());
    /// ```
    pub fn get_path(&self, path: &str) -> Option<&GenericValue> {
        path.split('.').try_fold(self, |current, key| current.get(key))
    }

    /// Gets a mutable reference to a nested value by key path.
    pub fn get_path_mut(&mut self, path: &str) -> Option<&mut GenericValue> {
        path.split('.')
            .try_fold(self, |current, key| current.as_map_mut()?.get_mut(key))
    }

    /// Sets a nested value by key path, creating intermediate maps as needed.
    pub fn set_path(&mut self, path: &str, value: GenericValue) {
        let keys: Vec<&str> = path.split('.').collect();
        self.set_in(&keys, value);
    }

    /// Sets a nested value under a sequence of keys.
    ///
    /// Every value along the way is promoted to a map, discarding non-map content. An empty
    /// key sequence replaces the receiver.
    pub fn set_in(&mut self, keys: &[&str], value: GenericValue) {
        match keys.split_first() {
            None => *self = value,
            Some((key, rest)) => self
                .promote_to_map()
                .entry((*key).to_string())
                .or_default()
                .set_in(rest, value),
        }
    }

    /// Inserts `value` under `key`, turning the receiver into a map first if needed.
    pub fn set(&mut self, key: impl Into<String>, value: GenericValue) {
        self.promote_to_map().insert(key.into(), value);
    }

    /// Appends `value`, turning the receiver into an array first if needed.
    pub fn append(&mut self, value: GenericValue) {
        self.promote_to_array().push(value);
    }

    /// Returns the map held by this value, replacing any non-map content with an empty map.
    pub fn promote_to_map(&mut self) -> &mut HashMap<String, GenericValue> {
        if !matches!(self, GenericValue::Map(_)) {
            *self = GenericValue::empty_map();
        }
        match self {
            GenericValue::Map(map) => map,
            _ => unreachable!("value was promoted to a map"),
        }
    }

    /// Returns the array held by this value, replacing any non-array content with an empty array.
    pub fn promote_to_array(&mut self) -> &mut Vec<GenericValue> {
        if !matches!(self, GenericValue::Array(_)) {
            *self = GenericValue::Array(Vec::new());
        }
        match self {
            GenericValue::Array(array) => array,
            _ => unreachable!("value was promoted to an array"),
        }
    }

    fn write_description(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenericValue::Null => f.write_str("null"),
            GenericValue::Bool(value) => write!(f, "{}", value),
            GenericValue::Int(value) => write!(f, "{}", value),
            GenericValue::Double(value) => write!(f, "{:?}", value),
            GenericValue::String(value) => write!(f, "{:?}", value),
            GenericValue::Number(number) => write!(f, "{}", number),
            GenericValue::Array(array) => {
                f.write_str("[")?;
                for (index, item) in array.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    item.write_description(f)?;
                }
                f.write_str("]")
            }
            GenericValue::Map(map) => {
                f.write_str("{")?;
                for (index, (key, item)) in map.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?}: ", key)?;
                    item.write_description(f)?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Scalars compare equal to an ambiguous number that projects to them.
impl PartialEq for GenericValue {
    fn eq(&self, other: &Self) -> bool {
        use GenericValue::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Double(a), Double(b)) => a == b,
            (String(a), String(b)) => a == b,
            (Array(a), Array(b)) => a == b,
            (Map(a), Map(b)) => a == b,
            (Number(a), Number(b)) => a == b,
            (Number(number), scalar) | (scalar, Number(number)) => match scalar {
                Bool(value) => number.as_bool() == Some(*value),
                Int(value) => number.as_int() == Some(*value),
                Double(value) => number.as_double() == Some(*value),
                _ => false,
            },
            _ => false,
        }
    }
}

impl fmt::Display for GenericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_description(f)
    }
}

impl From<bool> for GenericValue {
    fn from(value: bool) -> Self {
        GenericValue::Bool(value)
    }
}

impl From<i64> for GenericValue {
    fn from(value: i64) -> Self {
        GenericValue::Int(value)
    }
}

impl From<f64> for GenericValue {
    fn from(value: f64) -> Self {
        GenericValue::Double(value)
    }
}

impl From<String> for GenericValue {
    fn from(value: String) -> Self {
        GenericValue::String(value)
    }
}

impl From<&str> for GenericValue {
    fn from(value: &str) -> Self {
        GenericValue::String(value.to_string())
    }
}

impl From<SupportedNumber> for GenericValue {
    fn from(value: SupportedNumber) -> Self {
        GenericValue::Number(value)
    }
}

impl From<Vec<GenericValue>> for GenericValue {
    fn from(value: Vec<GenericValue>) -> Self {
        GenericValue::Array(value)
    }
}

impl From<HashMap<String, GenericValue>> for GenericValue {
    fn from(value: HashMap<String, GenericValue>) -> Self {
        GenericValue::Map(value)
    }
}

impl<T: Into<GenericValue>> From<Option<T>> for GenericValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(GenericValue::Null, Into::into)
    }
}
