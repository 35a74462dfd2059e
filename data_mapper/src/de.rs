//! Deserialization from generic values into typed objects.

use crate::error::{DeserializationError, Result};
use crate::mapper::ObjectMapper;
use crate::transformation::{DeserializableTransformation, deserialize_convertible};
use crate::value::{GenericValue, RawType};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use url::Url;

static NULL: GenericValue = GenericValue::Null;

/// Types that can build themselves from a [`DeserializableData`] accessor.
pub trait Deserializable: Sized + 'static {
    fn deserialize(data: &DeserializableData<'_>) -> Result<Self>;
}

/// Read-only navigation over a generic value.
///
/// Missing keys resolve to null, so chained lookups never fail. Typed reads come in three
/// flavours: strict (`get`), defaulted (`get_or`) and transformation based (`get_with`).
#[derive(Clone, Copy)]
pub struct DeserializableData<'a> {
    raw: &'a GenericValue,
    mapper: &'a ObjectMapper,
}

impl<'a> DeserializableData<'a> {
    pub fn new(raw: &'a GenericValue, mapper: &'a ObjectMapper) -> Self {
        Self { raw, mapper }
    }

    pub fn raw(&self) -> &'a GenericValue {
        self.raw
    }

    pub fn mapper(&self) -> &'a ObjectMapper {
        self.mapper
    }

    /// Returns true if the value is a map holding `key`, even with a null value.
    pub fn contains(&self, key: &str) -> bool {
        self.raw.get(key).is_some()
    }

    /// The value under `key`, or null if it is missing.
    pub fn at(&self, key: &str) -> DeserializableData<'a> {
        Self::new(self.raw.get(key).unwrap_or(&NULL), self.mapper)
    }

    /// The value under a key path, or null if any segment is missing.
    pub fn at_path(&self, path: &[&str]) -> DeserializableData<'a> {
        path.iter().fold(*self, |data, key| data.at(key))
    }

    /// Strict read. Fails with the mapper's error.
    pub fn get<T: Deserializable>(&self) -> Result<T> {
        self.mapper.deserialize(self.raw)
    }

    /// Reads `T`, or returns `default` if the value cannot be read.
    pub fn get_or<T: Deserializable>(&self, default: T) -> T {
        match self.get() {
            Ok(value) => value,
            Err(err) => {
                self.mapper.logger().warn(&format!(
                    "Falling back to default for {}: {}",
                    std::any::type_name::<T>(),
                    err
                ));
                default
            }
        }
    }

    /// Reads through `transformation`. Null and unreadable values give `None`.
    pub fn get_with<R>(&self, transformation: &R) -> Option<R::Object>
    where
        R: DeserializableTransformation + ?Sized,
    {
        self.mapper.deserialize_with(self.raw, transformation)
    }

    pub fn get_with_or<R>(&self, transformation: &R, default: R::Object) -> R::Object
    where
        R: DeserializableTransformation + ?Sized,
    {
        self.get_with(transformation).unwrap_or(default)
    }

    /// Reads through `transformation`, failing if it gives `None`.
    pub fn try_get_with<R>(&self, transformation: &R) -> Result<R::Object>
    where
        R: DeserializableTransformation + ?Sized,
    {
        self.value_or_error(self.get_with(transformation))
    }

    /// All-or-nothing: one unreadable element makes the whole array `None`.
    pub fn get_array_with<R>(&self, transformation: &R) -> Option<Vec<R::Object>>
    where
        R: DeserializableTransformation + ?Sized,
    {
        self.mapper.deserialize_array_with(self.raw, transformation)
    }

    /// Unreadable elements become `None` in place.
    pub fn get_optional_array_with<R>(&self, transformation: &R) -> Option<Vec<Option<R::Object>>>
    where
        R: DeserializableTransformation + ?Sized,
    {
        self.mapper
            .deserialize_optional_array_with(self.raw, transformation)
    }

    pub fn get_map_with<R>(&self, transformation: &R) -> Option<HashMap<String, R::Object>>
    where
        R: DeserializableTransformation + ?Sized,
    {
        self.mapper.deserialize_map_with(self.raw, transformation)
    }

    pub fn get_optional_map_with<R>(
        &self,
        transformation: &R,
    ) -> Option<HashMap<String, Option<R::Object>>>
    where
        R: DeserializableTransformation + ?Sized,
    {
        self.mapper
            .deserialize_optional_map_with(self.raw, transformation)
    }

    /// Turns an absent result into an error describing the value that could not be read.
    pub fn value_or_error<T>(&self, value: Option<T>) -> Result<T> {
        value.ok_or_else(|| {
            DeserializationError::custom(format!(
                "Transformation to {} rejected {} value {}",
                std::any::type_name::<T>(),
                self.raw.raw_type(),
                self.raw
            ))
        })
    }
}

impl Deserializable for GenericValue {
    fn deserialize(data: &DeserializableData<'_>) -> Result<Self> {
        Ok(data.raw().clone())
    }
}

macro_rules! impl_deserializable_convertible {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Deserializable for $ty {
                fn deserialize(data: &DeserializableData<'_>) -> Result<Self> {
                    deserialize_convertible(data.raw())
                }
            }
        )*
    };
}

impl_deserializable_convertible!(bool, i64, f64, String, Url, DateTime<Utc>);

/// Narrower integers read as `i64` and must fit.
macro_rules! impl_deserializable_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Deserializable for $ty {
                fn deserialize(data: &DeserializableData<'_>) -> Result<Self> {
                    let value: i64 = deserialize_convertible(data.raw())?;
                    <$ty>::try_from(value)
                        .map_err(|_| DeserializationError::wrong_type(data.raw(), RawType::Int))
                }
            }
        )*
    };
}

impl_deserializable_int!(i8, i16, i32, isize, u8, u16, u32, u64, usize);

impl Deserializable for f32 {
    fn deserialize(data: &DeserializableData<'_>) -> Result<Self> {
        let value: f64 = deserialize_convertible(data.raw())?;
        Ok(value as f32)
    }
}

impl Deserializable for char {
    fn deserialize(data: &DeserializableData<'_>) -> Result<Self> {
        let value: String = deserialize_convertible(data.raw())?;
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(DeserializationError::wrong_type(data.raw(), RawType::String)),
        }
    }
}

impl<T: Deserializable> Deserializable for Vec<T> {
    fn deserialize(data: &DeserializableData<'_>) -> Result<Self> {
        data.mapper().deserialize_array(data.raw())
    }
}

impl<T: Deserializable> Deserializable for Option<T> {
    fn deserialize(data: &DeserializableData<'_>) -> Result<Self> {
        data.mapper().deserialize_optional(data.raw())
    }
}

impl<T: Deserializable> Deserializable for HashMap<String, T> {
    fn deserialize(data: &DeserializableData<'_>) -> Result<Self> {
        data.mapper().deserialize_map(data.raw())
    }
}

impl<T: Deserializable> Deserializable for Box<T> {
    fn deserialize(data: &DeserializableData<'_>) -> Result<Self> {
        data.mapper().deserialize(data.raw()).map(Box::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::number::SupportedNumber;
    use crate::transformation::{IntTransformation, StringTransformation};
    use logging::{LogLevel, Logger};

    fn sample() -> GenericValue {
        let mut value = GenericValue::empty_map();
        value.set_path("user.name", GenericValue::from("Alice"));
        value.set_path("user.age", GenericValue::Number(SupportedNumber::from_int(30)));
        value.set("tags", GenericValue::Array(vec![GenericValue::from("a"), GenericValue::Int(1)]));
        value.set("nothing", GenericValue::Null);
        value
    }

    #[test]
    fn test_missing_keys_resolve_to_null() {
        let mapper = ObjectMapper::new();
        let value = sample();
        let data = DeserializableData::new(&value, &mapper);

        assert!(data.at("missing").raw().is_null());
        assert!(data.at_path(&["user", "missing", "deeper"]).raw().is_null());
        assert!(data.contains("nothing"));
        assert!(!data.contains("missing"));
    }

    #[test]
    fn test_strict_get() {
        let mapper = ObjectMapper::new();
        let value = sample();
        let data = DeserializableData::new(&value, &mapper);

        assert_eq!(data.at_path(&["user", "name"]).get::<String>().unwrap(), "Alice");
        assert_eq!(data.at_path(&["user", "age"]).get::<u8>().unwrap(), 30);
        assert_eq!(data.at_path(&["user", "age"]).get::<f64>().unwrap(), 30.0);
        assert!(data.at("tags").get::<Vec<String>>().is_err());
        assert_eq!(data.at("nothing").get::<Option<i64>>().unwrap(), None);
    }

    #[test]
    fn test_get_or_logs_fallback() {
        let (logger, log) = Logger::memory(LogLevel::Debug);
        let mapper = ObjectMapper::new().with_logger(logger);
        let value = sample();
        let data = DeserializableData::new(&value, &mapper);

        assert_eq!(data.at("tags").get_or(vec!["x".to_string()]), vec!["x".to_string()]);
        assert!(log.contains("Falling back to default"));
    }

    #[test]
    fn test_transformation_getters() {
        let mapper = ObjectMapper::new();
        let value = sample();
        let data = DeserializableData::new(&value, &mapper);

        assert_eq!(data.at("nothing").get_with(&IntTransformation), None);
        assert_eq!(data.at("nothing").get_with_or(&IntTransformation, 5), 5);
        assert_eq!(data.at("tags").get_array_with(&StringTransformation), None);
        assert_eq!(
            data.at("tags").get_optional_array_with(&StringTransformation),
            Some(vec![Some("a".to_string()), None])
        );
        assert_eq!(
            data.at("user").get_optional_map_with(&StringTransformation).map(|m| m.len()),
            Some(2)
        );
        assert_eq!(data.at("user").get_map_with(&StringTransformation), None);
    }

    #[test]
    fn test_try_get_with_fails_on_unreadable_value() {
        let mapper = ObjectMapper::new();
        let value = sample();
        let data = DeserializableData::new(&value, &mapper);

        assert_eq!(data.at_path(&["user", "age"]).try_get_with(&IntTransformation).unwrap(), 30);
        let err = data.at("tags").try_get_with(&IntTransformation).unwrap_err();
        assert!(err.to_string().contains("rejected array value"));
    }

    #[test]
    fn test_narrow_int_overflow_is_wrong_type() {
        let mapper = ObjectMapper::new();
        let err = mapper.deserialize::<u8>(&GenericValue::Int(300)).unwrap_err();
        assert!(matches!(
            err,
            DeserializationError::WrongType {
                expected: RawType::Int,
                ..
            }
        ));
        assert!(mapper.deserialize::<u32>(&GenericValue::Int(-1)).is_err());
    }

    #[test]
    fn test_char() {
        let mapper = ObjectMapper::new();
        assert_eq!(mapper.deserialize::<char>(&GenericValue::from("x")).unwrap(), 'x');
        assert!(mapper.deserialize::<char>(&GenericValue::from("xy")).is_err());
    }
}
