//! serde `Serializer` producing generic values through the encoding containers.

use super::encoder::{Encoder, SingleValueEncodingContainer};
use super::error::EncodingError;
use super::{CodingKey, format_path};
use crate::value::GenericValue;
use serde::Serialize;
use serde::ser::{self, Impossible};

type Result<T> = std::result::Result<T, EncodingError>;

/// Serializes any `serde::Serialize` value into a [`GenericValue`].
///
/// Structs and maps become maps, sequences and tuples become arrays, and enums are externally
/// tagged: a unit variant is its name, other variants are `{"Variant": content}`.
#[derive(Debug, Clone, Default)]
pub struct ValueSerializer {
    coding_path: Vec<CodingKey>,
}

impl ValueSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_path(coding_path: Vec<CodingKey>) -> Self {
        Self { coding_path }
    }

    fn single<F>(self, write: F) -> Result<GenericValue>
    where
        F: FnOnce(&mut SingleValueEncodingContainer<'_>),
    {
        let mut encoder = Encoder::with_path(self.coding_path);
        write(&mut encoder.single_value_container());
        Ok(encoder.into_value())
    }
}

impl ser::Serializer for ValueSerializer {
    type Ok = GenericValue;
    type Error = EncodingError;
    type SerializeSeq = SeqEncoder;
    type SerializeTuple = SeqEncoder;
    type SerializeTupleStruct = SeqEncoder;
    type SerializeTupleVariant = VariantEncoder;
    type SerializeMap = MapEncoder;
    type SerializeStruct = StructEncoder;
    type SerializeStructVariant = VariantEncoder;

    fn serialize_bool(self, v: bool) -> Result<GenericValue> {
        self.single(|container| container.encode_bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<GenericValue> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<GenericValue> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<GenericValue> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<GenericValue> {
        self.single(|container| container.encode_i64(v))
    }

    fn serialize_u8(self, v: u8) -> Result<GenericValue> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<GenericValue> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<GenericValue> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<GenericValue> {
        self.single(|container| container.encode_u64(v))
    }

    fn serialize_f32(self, v: f32) -> Result<GenericValue> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<GenericValue> {
        self.single(|container| container.encode_f64(v))
    }

    fn serialize_char(self, v: char) -> Result<GenericValue> {
        let mut buf = [0u8; 4];
        let s = v.encode_utf8(&mut buf);
        self.serialize_str(s)
    }

    fn serialize_str(self, v: &str) -> Result<GenericValue> {
        self.single(|container| container.encode_str(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<GenericValue> {
        let mut encoder = Encoder::with_path(self.coding_path);
        let mut container = encoder.unkeyed_container();
        for byte in v {
            container.encode_u64(u64::from(*byte));
        }
        Ok(encoder.into_value())
    }

    fn serialize_none(self) -> Result<GenericValue> {
        self.single(|container| container.encode_nil())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<GenericValue> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<GenericValue> {
        self.serialize_none()
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<GenericValue> {
        self.serialize_none()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<GenericValue> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<GenericValue> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<GenericValue> {
        let mut encoder = Encoder::with_path(self.coding_path);
        encoder.container().encode(variant, value)?;
        Ok(encoder.into_value())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<SeqEncoder> {
        Ok(SeqEncoder::new(self.coding_path))
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqEncoder> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SeqEncoder> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<VariantEncoder> {
        let mut encoder = Encoder::with_path(self.coding_path);
        encoder.container().nested_unkeyed_container(variant);
        Ok(VariantEncoder { encoder, variant })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<MapEncoder> {
        let mut encoder = Encoder::with_path(self.coding_path);
        encoder.container();
        Ok(MapEncoder {
            encoder,
            pending_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<StructEncoder> {
        let mut encoder = Encoder::with_path(self.coding_path);
        encoder.container();
        Ok(StructEncoder { encoder })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<VariantEncoder> {
        let mut encoder = Encoder::with_path(self.coding_path);
        encoder.container().nested_container(variant);
        Ok(VariantEncoder { encoder, variant })
    }
}

/// Sequences, tuples and tuple structs.
pub struct SeqEncoder {
    encoder: Encoder,
}

impl SeqEncoder {
    fn new(coding_path: Vec<CodingKey>) -> Self {
        let mut encoder = Encoder::with_path(coding_path);
        encoder.unkeyed_container();
        Self { encoder }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.encoder.unkeyed_container().encode(value)
    }
}

impl ser::SerializeSeq for SeqEncoder {
    type Ok = GenericValue;
    type Error = EncodingError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<GenericValue> {
        Ok(self.encoder.into_value())
    }
}

impl ser::SerializeTuple for SeqEncoder {
    type Ok = GenericValue;
    type Error = EncodingError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<GenericValue> {
        Ok(self.encoder.into_value())
    }
}

impl ser::SerializeTupleStruct for SeqEncoder {
    type Ok = GenericValue;
    type Error = EncodingError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<GenericValue> {
        Ok(self.encoder.into_value())
    }
}

/// Tuple and struct variants, written under the variant name.
pub struct VariantEncoder {
    encoder: Encoder,
    variant: &'static str,
}

impl ser::SerializeTupleVariant for VariantEncoder {
    type Ok = GenericValue;
    type Error = EncodingError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.encoder
            .container()
            .nested_unkeyed_container(self.variant)
            .encode(value)
    }

    fn end(self) -> Result<GenericValue> {
        Ok(self.encoder.into_value())
    }
}

impl ser::SerializeStructVariant for VariantEncoder {
    type Ok = GenericValue;
    type Error = EncodingError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        self.encoder
            .container()
            .nested_container(self.variant)
            .encode(key, value)
    }

    fn end(self) -> Result<GenericValue> {
        Ok(self.encoder.into_value())
    }
}

pub struct MapEncoder {
    encoder: Encoder,
    pending_key: Option<String>,
}

impl ser::SerializeMap for MapEncoder {
    type Ok = GenericValue;
    type Error = EncodingError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        let path = self.encoder.coding_path().to_vec();
        self.pending_key = Some(key.serialize(MapKeySerializer { coding_path: path })?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| EncodingError::Custom("Map value serialized before its key".to_string()))?;
        self.encoder.container().encode(&key, value)
    }

    fn end(self) -> Result<GenericValue> {
        Ok(self.encoder.into_value())
    }
}

pub struct StructEncoder {
    encoder: Encoder,
}

impl ser::SerializeStruct for StructEncoder {
    type Ok = GenericValue;
    type Error = EncodingError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        self.encoder.container().encode(key, value)
    }

    fn end(self) -> Result<GenericValue> {
        Ok(self.encoder.into_value())
    }
}

/// Map keys must be strings. Integers, chars, bools and unit variants are written as text.
struct MapKeySerializer {
    coding_path: Vec<CodingKey>,
}

impl MapKeySerializer {
    fn reject(self, kind: &str) -> EncodingError {
        EncodingError::InvalidValue {
            path: format_path(&self.coding_path),
            message: format!("map keys must be strings, found {}", kind),
        }
    }
}

impl ser::Serializer for MapKeySerializer {
    type Ok = String;
    type Error = EncodingError;
    type SerializeSeq = Impossible<String, EncodingError>;
    type SerializeTuple = Impossible<String, EncodingError>;
    type SerializeTupleStruct = Impossible<String, EncodingError>;
    type SerializeTupleVariant = Impossible<String, EncodingError>;
    type SerializeMap = Impossible<String, EncodingError>;
    type SerializeStruct = Impossible<String, EncodingError>;
    type SerializeStructVariant = Impossible<String, EncodingError>;

    fn serialize_str(self, v: &str) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_bool(self, v: bool) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i8(self, v: i8) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i16(self, v: i16) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i32(self, v: i32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i64(self, v: i64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u8(self, v: u8) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u16(self, v: u16) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u32(self, v: u32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u64(self, v: u64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_char(self, v: char) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        Ok(variant.to_string())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<String> {
        value.serialize(self)
    }

    fn serialize_f32(self, _v: f32) -> Result<String> {
        Err(self.reject("a float"))
    }

    fn serialize_f64(self, _v: f64) -> Result<String> {
        Err(self.reject("a float"))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String> {
        Err(self.reject("bytes"))
    }

    fn serialize_none(self) -> Result<String> {
        Err(self.reject("none"))
    }

    fn serialize_some<T: ?Sized + Serialize>(self, _value: &T) -> Result<String> {
        Err(self.reject("an option"))
    }

    fn serialize_unit(self) -> Result<String> {
        Err(self.reject("unit"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
        Err(self.reject("a unit struct"))
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String> {
        Err(self.reject("an enum variant with data"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(self.reject("a sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(self.reject("a tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(self.reject("a tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(self.reject("an enum variant with data"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(self.reject("a map"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(self.reject("a struct"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(self.reject("an enum variant with data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};

    fn encode<T: Serialize>(value: &T) -> Result<GenericValue> {
        value.serialize(ValueSerializer::new())
    }

    #[derive(Serialize)]
    enum Event {
        Started,
        Moved(i32, i32),
        Renamed { from: String, to: String },
        Tagged(String),
    }

    #[test]
    fn test_externally_tagged_enums() {
        assert_eq!(encode(&Event::Started).unwrap(), GenericValue::from("Started"));

        let moved = encode(&Event::Moved(1, -2)).unwrap();
        assert_eq!(
            moved.get("Moved"),
            Some(&GenericValue::Array(vec![GenericValue::Int(1), GenericValue::Int(-2)]))
        );

        let renamed = encode(&Event::Renamed {
            from: "a".to_string(),
            to: "b".to_string(),
        })
        .unwrap();
        assert_eq!(renamed.get_path("Renamed.to"), Some(&GenericValue::from("b")));

        let tagged = encode(&Event::Tagged("x".to_string())).unwrap();
        assert_eq!(tagged.get("Tagged"), Some(&GenericValue::from("x")));
    }

    #[test]
    fn test_map_keys_are_stringified() {
        let mut map = BTreeMap::new();
        map.insert(1u8, true);
        let value = encode(&map).unwrap();
        assert_eq!(value.get("1"), Some(&GenericValue::Bool(true)));
    }

    #[test]
    fn test_float_map_keys_are_rejected() {
        #[derive(Serialize)]
        struct Key(f64);

        let err = key_error(Key(1.5));
        assert!(matches!(err, EncodingError::InvalidValue { .. }));
    }

    fn key_error<K: Serialize>(key: K) -> EncodingError {
        key.serialize(MapKeySerializer {
            coding_path: Vec::new(),
        })
        .unwrap_err()
    }

    #[test]
    fn test_empty_collections() {
        assert_eq!(encode(&Vec::<i32>::new()).unwrap(), GenericValue::Array(Vec::new()));
        assert_eq!(
            encode(&HashMap::<String, i32>::new()).unwrap(),
            GenericValue::empty_map()
        );
        assert_eq!(encode(&()).unwrap(), GenericValue::Null);
        assert_eq!(encode(&Option::<i32>::None).unwrap(), GenericValue::Null);
    }

    #[test]
    fn test_bytes_are_integer_arrays() {
        let value = ser::Serializer::serialize_bytes(ValueSerializer::new(), &[1, 255]).unwrap();
        assert_eq!(
            value,
            GenericValue::Array(vec![GenericValue::Int(1), GenericValue::Int(255)])
        );
    }
}
