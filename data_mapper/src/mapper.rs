//! The mapping engine between typed objects and generic values.

use crate::codable::{DecodingError, EncodingError, ValueDeserializer, ValueSerializer};
use crate::de::{Deserializable, DeserializableData};
use crate::error::{DeserializationError, Result};
use crate::polymorph::Polymorph;
use crate::ser::{Serializable, SerializableData};
use crate::transformation::{DeserializableTransformation, SerializableTransformation};
use crate::value::{GenericValue, RawType};
use logging::Logger;
use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Converts typed objects to generic values and back.
///
/// A mapper is immutable once built and can be shared between threads. Every
/// [`serialize`](ObjectMapper::serialize) and [`deserialize`](ObjectMapper::deserialize) call
/// consults the configured [`Polymorph`], including the nested calls made by collections and
/// by [`SerializableData::set`].
///
/// # Examples
///
/// ```
/// use data_mapper::{GenericValue, ObjectMapper};
///
/// let mapper = ObjectMapper::new();
/// let value = mapper.serialize(&vec![1i64, 2, 3]);
/// let numbers: Vec<i64> = mapper.deserialize(&value).unwrap();
/// assert_eq!(numbers, vec![1, 2, 3]);
/// ```
#[derive(Clone, Default)]
pub struct ObjectMapper {
    polymorph: Option<Arc<dyn Polymorph>>,
    logger: Logger,
}

impl ObjectMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_polymorph<P: Polymorph + 'static>(polymorph: P) -> Self {
        Self {
            polymorph: Some(Arc::new(polymorph)),
            logger: Logger::disabled(),
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn polymorph(&self) -> Option<&dyn Polymorph> {
        self.polymorph.as_deref()
    }

    /// Serializes `value`, then stamps polymorphic type information for its concrete type.
    pub fn serialize<T: Serializable + ?Sized>(&self, value: &T) -> GenericValue {
        let mut data = SerializableData::new(self);
        value.serialize(&mut data);
        let mut raw = data.into_raw();

        if let Some(polymorph) = &self.polymorph {
            if polymorph.write_type_info(&mut raw, value.concrete_type_id()) {
                self.logger
                    .debug(&format!("Wrote type information for {}", type_name::<T>()));
            }
        }
        raw
    }

    pub fn serialize_array<T: Serializable>(&self, array: &[T]) -> GenericValue {
        GenericValue::Array(array.iter().map(|item| self.serialize(item)).collect())
    }

    /// `None` serializes to null.
    pub fn serialize_optional<T: Serializable>(&self, value: Option<&T>) -> GenericValue {
        value.map_or(GenericValue::Null, |value| self.serialize(value))
    }

    pub fn serialize_map<T: Serializable>(&self, map: &HashMap<String, T>) -> GenericValue {
        GenericValue::Map(
            map.iter()
                .map(|(key, value)| (key.clone(), self.serialize(value)))
                .collect(),
        )
    }

    pub fn serialize_with<R>(&self, value: Option<&R::Object>, transformation: &R) -> GenericValue
    where
        R: SerializableTransformation + ?Sized,
    {
        transformation.to_generic(value)
    }

    /// `None` serializes to null, elements go through `transformation`.
    pub fn serialize_array_with<R>(
        &self,
        array: Option<&[R::Object]>,
        transformation: &R,
    ) -> GenericValue
    where
        R: SerializableTransformation + ?Sized,
    {
        match array {
            Some(array) => GenericValue::Array(
                array
                    .iter()
                    .map(|item| transformation.to_generic(Some(item)))
                    .collect(),
            ),
            None => GenericValue::Null,
        }
    }

    pub fn serialize_optional_array_with<R>(
        &self,
        array: Option<&[Option<R::Object>]>,
        transformation: &R,
    ) -> GenericValue
    where
        R: SerializableTransformation + ?Sized,
    {
        match array {
            Some(array) => GenericValue::Array(
                array
                    .iter()
                    .map(|item| transformation.to_generic(item.as_ref()))
                    .collect(),
            ),
            None => GenericValue::Null,
        }
    }

    pub fn serialize_map_with<R>(
        &self,
        map: Option<&HashMap<String, R::Object>>,
        transformation: &R,
    ) -> GenericValue
    where
        R: SerializableTransformation + ?Sized,
    {
        match map {
            Some(map) => GenericValue::Map(
                map.iter()
                    .map(|(key, value)| (key.clone(), transformation.to_generic(Some(value))))
                    .collect(),
            ),
            None => GenericValue::Null,
        }
    }

    /// Deserializes `T`, or the subtype the polymorph selects for `value`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by `T` (or the selected subtype), or a custom error if
    /// the selected subtype does not produce a `T`.
    pub fn deserialize<T: Deserializable>(&self, value: &GenericValue) -> Result<T> {
        let data = DeserializableData::new(value, self);

        if let Some(polymorph) = &self.polymorph {
            if let Some(subtype) = polymorph.polymorph_type(TypeId::of::<T>(), value) {
                self.logger.debug(&format!(
                    "Resolved {} to polymorphic type '{}'",
                    type_name::<T>(),
                    subtype.name()
                ));
                let instance = subtype.construct(&data)?;
                return instance.downcast::<T>().map(|instance| *instance).map_err(|_| {
                    let message = format!(
                        "Polymorphic type '{}' is not assignable to {}",
                        subtype.name(),
                        type_name::<T>()
                    );
                    self.logger.error(&message);
                    DeserializationError::custom(message)
                });
            }
        }

        T::deserialize(&data)
    }

    /// Fails as a whole if `value` is not an array or any element fails.
    pub fn deserialize_array<T: Deserializable>(&self, value: &GenericValue) -> Result<Vec<T>> {
        let array = value
            .as_array()
            .ok_or_else(|| DeserializationError::wrong_type(value, RawType::Array))?;
        array.iter().map(|item| self.deserialize(item)).collect()
    }

    /// Null maps to `None`. Anything else must deserialize as `T`.
    pub fn deserialize_optional<T: Deserializable>(&self, value: &GenericValue) -> Result<Option<T>> {
        if value.is_null() {
            Ok(None)
        } else {
            self.deserialize(value).map(Some)
        }
    }

    pub fn deserialize_map<T: Deserializable>(
        &self,
        value: &GenericValue,
    ) -> Result<HashMap<String, T>> {
        let map = value
            .as_map()
            .ok_or_else(|| DeserializationError::wrong_type(value, RawType::Map))?;
        map.iter()
            .map(|(key, item)| Ok((key.clone(), self.deserialize(item)?)))
            .collect()
    }

    pub fn deserialize_with<R>(&self, value: &GenericValue, transformation: &R) -> Option<R::Object>
    where
        R: DeserializableTransformation + ?Sized,
    {
        transformation.from_generic(value)
    }

    /// `None` if `value` is not an array or any element is unreadable.
    pub fn deserialize_array_with<R>(
        &self,
        value: &GenericValue,
        transformation: &R,
    ) -> Option<Vec<R::Object>>
    where
        R: DeserializableTransformation + ?Sized,
    {
        value
            .as_array()?
            .iter()
            .map(|item| transformation.from_generic(item))
            .collect()
    }

    /// `None` if `value` is not an array. Unreadable elements become `None`.
    pub fn deserialize_optional_array_with<R>(
        &self,
        value: &GenericValue,
        transformation: &R,
    ) -> Option<Vec<Option<R::Object>>>
    where
        R: DeserializableTransformation + ?Sized,
    {
        Some(
            value
                .as_array()?
                .iter()
                .map(|item| transformation.from_generic(item))
                .collect(),
        )
    }

    pub fn deserialize_map_with<R>(
        &self,
        value: &GenericValue,
        transformation: &R,
    ) -> Option<HashMap<String, R::Object>>
    where
        R: DeserializableTransformation + ?Sized,
    {
        value
            .as_map()?
            .iter()
            .map(|(key, item)| Some((key.clone(), transformation.from_generic(item)?)))
            .collect()
    }

    pub fn deserialize_optional_map_with<R>(
        &self,
        value: &GenericValue,
        transformation: &R,
    ) -> Option<HashMap<String, Option<R::Object>>>
    where
        R: DeserializableTransformation + ?Sized,
    {
        Some(
            value
                .as_map()?
                .iter()
                .map(|(key, item)| (key.clone(), transformation.from_generic(item)))
                .collect(),
        )
    }

    /// Encodes any `serde::Serialize` value through the keyed, unkeyed and single-value
    /// containers.
    pub fn encode<T: serde::Serialize + ?Sized>(
        &self,
        value: &T,
    ) -> std::result::Result<GenericValue, EncodingError> {
        serde::Serialize::serialize(value, ValueSerializer::new())
    }

    /// Decodes any `serde::Deserialize` type from a generic value.
    pub fn decode<T: serde::de::DeserializeOwned>(
        &self,
        value: &GenericValue,
    ) -> std::result::Result<T, DecodingError> {
        <T as serde::Deserialize>::deserialize(ValueDeserializer::new(value))
    }
}

impl fmt::Debug for ObjectMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectMapper")
            .field("polymorph", &self.polymorph.is_some())
            .field("logger", &self.logger)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::number::SupportedNumber;
    use crate::transformation::IntTransformation;

    #[test]
    fn test_vec_fails_atomically() {
        let mapper = ObjectMapper::new();
        let value = GenericValue::Array(vec![
            GenericValue::Int(1),
            GenericValue::Int(2),
            GenericValue::from("x"),
        ]);

        let err = mapper.deserialize::<Vec<i64>>(&value).unwrap_err();
        assert!(matches!(
            err,
            DeserializationError::WrongType {
                expected: RawType::Int,
                ..
            }
        ));
        assert_eq!(mapper.deserialize_array_with(&value, &IntTransformation), None);
    }

    #[test]
    fn test_non_array_into_vec_is_wrong_type() {
        let mapper = ObjectMapper::new();
        let err = mapper.deserialize::<Vec<i64>>(&GenericValue::Int(1)).unwrap_err();
        assert!(matches!(
            err,
            DeserializationError::WrongType {
                expected: RawType::Array,
                ..
            }
        ));
    }

    #[test]
    fn test_null_into_option_is_none() {
        let mapper = ObjectMapper::new();
        assert_eq!(mapper.deserialize::<Option<String>>(&GenericValue::Null).unwrap(), None);
        assert!(mapper.deserialize::<Option<String>>(&GenericValue::Int(1)).is_err());
    }

    #[test]
    fn test_ambiguous_number_reads_both_ways() {
        let mapper = ObjectMapper::new();
        let value = GenericValue::Number(SupportedNumber::from_int(2));
        assert_eq!(mapper.deserialize::<f64>(&value).unwrap(), 2.0);
        assert_eq!(mapper.deserialize::<i64>(&value).unwrap(), 2);
    }

    #[test]
    fn test_map_round_trip() {
        let mapper = ObjectMapper::new();
        let mut map = HashMap::new();
        map.insert("a".to_string(), vec![1i64]);
        map.insert("b".to_string(), vec![]);

        let value = mapper.serialize(&map);
        let back: HashMap<String, Vec<i64>> = mapper.deserialize(&value).unwrap();
        assert_eq!(back, map);
        assert!(mapper.deserialize::<HashMap<String, i64>>(&GenericValue::Null).is_err());
    }

    #[test]
    fn test_transformation_helpers_map_null_to_none() {
        let mapper = ObjectMapper::new();
        assert_eq!(mapper.deserialize_array_with(&GenericValue::Null, &IntTransformation), None);
        assert_eq!(
            mapper.deserialize_optional_array_with(&GenericValue::Null, &IntTransformation),
            None
        );
        assert_eq!(mapper.deserialize_map_with(&GenericValue::Null, &IntTransformation), None);
        assert_eq!(
            mapper.deserialize_optional_map_with(&GenericValue::Null, &IntTransformation),
            None
        );
        assert_eq!(
            mapper.serialize_optional_array_with(Some(&[Some(1), None][..]), &IntTransformation),
            GenericValue::Array(vec![GenericValue::Int(1), GenericValue::Null])
        );
        assert_eq!(
            mapper.serialize_array_with::<IntTransformation>(None, &IntTransformation),
            GenericValue::Null
        );
    }
}
