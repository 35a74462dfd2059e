//! serde `Deserializer` reading generic values through the decoding containers.

use super::decoder::{
    Decoder, KeyedDecodingContainer, SingleValueDecodingContainer, UnkeyedDecodingContainer,
    mismatch,
};
use super::error::DecodingError;
use super::{CodingKey, child_path, format_path};
use crate::value::GenericValue;
use serde::de::value::StrDeserializer;
use serde::de::{self, DeserializeSeed, IntoDeserializer, Visitor};

type Result<T> = std::result::Result<T, DecodingError>;

/// Deserializes any `serde::Deserialize` type from a borrowed [`GenericValue`].
///
/// Accepts the shapes [`ValueSerializer`](super::ValueSerializer) produces. Ambiguous numbers
/// are read as whatever the target asks for.
#[derive(Debug, Clone)]
pub struct ValueDeserializer<'a> {
    value: &'a GenericValue,
    coding_path: Vec<CodingKey>,
}

impl<'a> ValueDeserializer<'a> {
    pub fn new(value: &'a GenericValue) -> Self {
        Self::with_path(value, Vec::new())
    }

    pub(crate) fn with_path(value: &'a GenericValue, coding_path: Vec<CodingKey>) -> Self {
        Self { value, coding_path }
    }

    fn single(self) -> SingleValueDecodingContainer<'a> {
        SingleValueDecodingContainer::new(self.value, self.coding_path)
    }

    fn decoder(self) -> Decoder<'a> {
        Decoder::with_path(self.value, self.coding_path)
    }
}

macro_rules! deserialize_integer {
    ($($method:ident)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
                visitor.visit_i64(self.single().decode_i64()?)
            }
        )*
    };
}

impl<'de, 'a> de::Deserializer<'de> for ValueDeserializer<'a> {
    type Error = DecodingError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            GenericValue::Null => visitor.visit_unit(),
            GenericValue::Bool(value) => visitor.visit_bool(*value),
            GenericValue::Int(value) => visitor.visit_i64(*value),
            GenericValue::Double(value) => visitor.visit_f64(*value),
            GenericValue::String(value) => visitor.visit_str(value),
            GenericValue::Array(_) => self.deserialize_seq(visitor),
            GenericValue::Map(_) => self.deserialize_map(visitor),
            GenericValue::Number(number) => {
                if let Some(int) = number.as_int() {
                    visitor.visit_i64(int)
                } else if let Some(double) = number.as_double() {
                    visitor.visit_f64(double)
                } else if let Some(value) = number.as_bool() {
                    visitor.visit_bool(value)
                } else {
                    visitor.visit_unit()
                }
            }
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_bool(self.single().decode_bool()?)
    }

    deserialize_integer!(
        deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64
        deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64
    );

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_f64(visitor)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f64(self.single().decode_f64()?)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_str(self.single().decode_str()?)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        if self.value.is_null() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        if self.value.is_null() {
            visitor.visit_unit()
        } else {
            Err(mismatch(&self.coding_path, "null", self.value))
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let mut access = SeqAccessor {
            container: self.decoder().unkeyed_container()?,
        };
        let value = visitor.visit_seq(&mut access)?;
        if access.container.is_at_end() {
            Ok(value)
        } else {
            Err(DecodingError::Custom(format!(
                "Array at '{}' has {} elements, only {} were read",
                format_path(access.container.coding_path()),
                access.container.count(),
                access.container.current_index()
            )))
        }
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let container = self.decoder().container()?;
        let keys = container.all_keys().into_iter();
        visitor.visit_map(MapAccessor {
            container,
            keys,
            pending: None,
        })
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        match self.value {
            GenericValue::String(variant) => {
                let variant: StrDeserializer<'_, DecodingError> = variant.as_str().into_deserializer();
                visitor.visit_enum(variant)
            }
            GenericValue::Map(map) if map.len() == 1 => match map.iter().next() {
                Some((variant, content)) => visitor.visit_enum(EnumAccessor {
                    variant,
                    content,
                    coding_path: self.coding_path,
                }),
                None => Err(mismatch(&self.coding_path, "enum", self.value)),
            },
            _ => Err(mismatch(&self.coding_path, "enum", self.value)),
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }
}

struct SeqAccessor<'a> {
    container: UnkeyedDecodingContainer<'a>,
}

impl<'de, 'a> de::SeqAccess<'de> for SeqAccessor<'a> {
    type Error = DecodingError;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>> {
        if self.container.is_at_end() {
            return Ok(None);
        }
        self.container.decode_seed(seed).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.container.count() - self.container.current_index())
    }
}

struct MapAccessor<'a> {
    container: KeyedDecodingContainer<'a>,
    keys: std::vec::IntoIter<&'a str>,
    pending: Option<&'a str>,
}

impl<'de, 'a> de::MapAccess<'de> for MapAccessor<'a> {
    type Error = DecodingError;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        let Some(key) = self.keys.next() else {
            return Ok(None);
        };
        self.pending = Some(key);
        let key: StrDeserializer<'_, DecodingError> = key.into_deserializer();
        seed.deserialize(key).map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        let key = self
            .pending
            .take()
            .ok_or_else(|| DecodingError::Custom("Map value requested before its key".to_string()))?;
        self.container.decode_seed(key, seed)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.keys.len())
    }
}

/// `{"Variant": content}`.
struct EnumAccessor<'a> {
    variant: &'a str,
    content: &'a GenericValue,
    coding_path: Vec<CodingKey>,
}

impl<'de, 'a> de::EnumAccess<'de> for EnumAccessor<'a> {
    type Error = DecodingError;
    type Variant = ValueDeserializer<'a>;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self::Variant)> {
        let name: StrDeserializer<'_, DecodingError> = self.variant.into_deserializer();
        let variant = seed.deserialize(name)?;
        let path = child_path(&self.coding_path, CodingKey::Key(self.variant.to_string()));
        Ok((variant, ValueDeserializer::with_path(self.content, path)))
    }
}

impl<'de, 'a> de::VariantAccess<'de> for ValueDeserializer<'a> {
    type Error = DecodingError;

    fn unit_variant(self) -> Result<()> {
        de::Deserializer::deserialize_unit(self, de::IgnoredAny).map(|_| ())
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value> {
        seed.deserialize(self)
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
        de::Deserializer::deserialize_seq(self, visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        de::Deserializer::deserialize_map(self, visitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::number::SupportedNumber;
    use serde::Deserialize;
    use std::collections::HashMap;

    fn decode<T: de::DeserializeOwned>(value: &GenericValue) -> Result<T> {
        T::deserialize(ValueDeserializer::new(value))
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct User {
        name: String,
        age: u8,
        email: Option<String>,
        #[serde(default)]
        tags: Vec<String>,
    }

    #[derive(Debug, PartialEq, Deserialize)]
    enum Event {
        Started,
        Moved(i32, i32),
        Renamed { from: String, to: String },
        Tagged(String),
    }

    #[test]
    fn test_struct_with_missing_optional_fields() {
        let mut value = GenericValue::empty_map();
        value.set("name", GenericValue::from("Alice"));
        value.set("age", GenericValue::Number(SupportedNumber::from_int(30)));

        let user: User = decode(&value).unwrap();
        assert_eq!(
            user,
            User {
                name: "Alice".to_string(),
                age: 30,
                email: None,
                tags: Vec::new(),
            }
        );
    }

    #[test]
    fn test_missing_required_field_fails() {
        let mut value = GenericValue::empty_map();
        value.set("name", GenericValue::from("Alice"));
        let err = decode::<User>(&value).unwrap_err();
        assert!(err.to_string().contains("age"));
    }

    #[test]
    fn test_error_path_points_at_element() {
        let mut value = GenericValue::empty_map();
        value.set("name", GenericValue::from("Alice"));
        value.set("age", GenericValue::Int(30));
        value.set(
            "tags",
            GenericValue::Array(vec![GenericValue::from("a"), GenericValue::Int(2)]),
        );

        let err = decode::<User>(&value).unwrap_err();
        assert_eq!(
            err,
            DecodingError::TypeMismatch {
                path: "tags[1]".to_string(),
                expected: "string".to_string(),
                actual: crate::value::RawType::Int,
            }
        );
    }

    #[test]
    fn test_externally_tagged_enums() {
        assert_eq!(
            decode::<Event>(&GenericValue::from("Started")).unwrap(),
            Event::Started
        );

        let mut moved = GenericValue::empty_map();
        moved.set(
            "Moved",
            GenericValue::Array(vec![GenericValue::Int(1), GenericValue::Int(-2)]),
        );
        assert_eq!(decode::<Event>(&moved).unwrap(), Event::Moved(1, -2));

        let mut renamed = GenericValue::empty_map();
        renamed.set_path("Renamed.from", GenericValue::from("a"));
        renamed.set_path("Renamed.to", GenericValue::from("b"));
        assert_eq!(
            decode::<Event>(&renamed).unwrap(),
            Event::Renamed {
                from: "a".to_string(),
                to: "b".to_string()
            }
        );

        let mut tagged = GenericValue::empty_map();
        tagged.set("Tagged", GenericValue::from("x"));
        assert_eq!(
            decode::<Event>(&tagged).unwrap(),
            Event::Tagged("x".to_string())
        );

        assert!(decode::<Event>(&GenericValue::Int(1)).is_err());
    }

    #[test]
    fn test_ambiguous_number_follows_the_target() {
        let value = GenericValue::Number(SupportedNumber::from_int(2));
        assert_eq!(decode::<i64>(&value).unwrap(), 2);
        assert_eq!(decode::<f64>(&value).unwrap(), 2.0);
    }

    #[test]
    fn test_integer_out_of_range() {
        assert!(decode::<u8>(&GenericValue::Int(300)).is_err());
        assert!(decode::<u32>(&GenericValue::Int(-1)).is_err());
    }

    #[test]
    fn test_tuple_length_must_match() {
        let value = GenericValue::Array(vec![
            GenericValue::Int(1),
            GenericValue::Int(2),
            GenericValue::Int(3),
        ]);
        assert!(decode::<(i32, i32)>(&value).is_err());
        assert_eq!(decode::<(i32, i32, i32)>(&value).unwrap(), (1, 2, 3));
    }

    #[test]
    fn test_maps_and_options() {
        let mut value = GenericValue::empty_map();
        value.set("a", GenericValue::Int(1));
        value.set("b", GenericValue::Null);

        let map: HashMap<String, Option<i64>> = decode(&value).unwrap();
        assert_eq!(map.get("a"), Some(&Some(1)));
        assert_eq!(map.get("b"), Some(&None));
    }

    #[test]
    fn test_any_dispatch() {
        #[derive(Debug, Deserialize)]
        #[serde(untagged)]
        enum Loose {
            Int(i64),
            Text(String),
        }

        let value = GenericValue::Number(SupportedNumber::from_int(4));
        assert!(matches!(decode::<Loose>(&value).unwrap(), Loose::Int(4)));
        assert!(matches!(
            decode::<Loose>(&GenericValue::from("x")).unwrap(),
            Loose::Text(_)
        ));
    }
}
