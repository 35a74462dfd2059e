//! Serialization from typed objects into generic values.

use crate::mapper::ObjectMapper;
use crate::transformation::{SerializableTransformation, serialize_convertible};
use crate::value::GenericValue;
use chrono::{DateTime, Utc};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use url::Url;

/// Types that can write themselves into a [`SerializableData`] builder.
pub trait Serializable: Any {
    fn serialize(&self, data: &mut SerializableData<'_>);

    /// The type a polymorph uses to stamp discriminator metadata.
    ///
    /// Wrappers such as `Box<T>` report the type they wrap.
    fn concrete_type_id(&self) -> TypeId {
        Any::type_id(self)
    }
}

/// Builder for the generic value of one object.
///
/// Nested values go back through the [`ObjectMapper`], so they get their own polymorphic
/// type information.
pub struct SerializableData<'a> {
    raw: GenericValue,
    mapper: &'a ObjectMapper,
}

impl<'a> SerializableData<'a> {
    pub fn new(mapper: &'a ObjectMapper) -> Self {
        Self {
            raw: GenericValue::Null,
            mapper,
        }
    }

    pub fn mapper(&self) -> &'a ObjectMapper {
        self.mapper
    }

    pub fn raw(&self) -> &GenericValue {
        &self.raw
    }

    pub fn into_raw(self) -> GenericValue {
        self.raw
    }

    /// Replaces everything written so far.
    pub fn set_value(&mut self, value: GenericValue) {
        self.raw = value;
    }

    /// Serializes `value` under `key`. The builder becomes a map if it is not one.
    pub fn set<T: Serializable + ?Sized>(&mut self, key: &str, value: &T) {
        let value = self.mapper.serialize(value);
        self.raw.set(key, value);
    }

    /// Serializes `value` under a key path, creating intermediate maps.
    pub fn set_path<T: Serializable + ?Sized>(&mut self, path: &[&str], value: &T) {
        let value = self.mapper.serialize(value);
        self.raw.set_in(path, value);
    }

    /// Serializes `value` and appends it. The builder becomes an array if it is not one.
    pub fn append<T: Serializable + ?Sized>(&mut self, value: &T) {
        let value = self.mapper.serialize(value);
        self.raw.append(value);
    }

    /// Writes `value` under `key` with an explicit transformation. `None` writes null.
    pub fn set_with<R>(&mut self, key: &str, value: Option<&R::Object>, transformation: &R)
    where
        R: SerializableTransformation + ?Sized,
    {
        let value = self.mapper.serialize_with(value, transformation);
        self.raw.set(key, value);
    }

    /// Writes each element of `values` with `transformation`.
    pub fn set_array_with<R>(&mut self, key: &str, values: Option<&[R::Object]>, transformation: &R)
    where
        R: SerializableTransformation + ?Sized,
    {
        let value = self.mapper.serialize_array_with(values, transformation);
        self.raw.set(key, value);
    }

    /// Writes each value of `values` with `transformation`.
    pub fn set_map_with<R>(
        &mut self,
        key: &str,
        values: Option<&HashMap<String, R::Object>>,
        transformation: &R,
    ) where
        R: SerializableTransformation + ?Sized,
    {
        let value = self.mapper.serialize_map_with(values, transformation);
        self.raw.set(key, value);
    }
}

impl Serializable for GenericValue {
    fn serialize(&self, data: &mut SerializableData<'_>) {
        data.set_value(self.clone());
    }
}

macro_rules! impl_serializable_convertible {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Serializable for $ty {
                fn serialize(&self, data: &mut SerializableData<'_>) {
                    data.set_value(serialize_convertible(self));
                }
            }
        )*
    };
}

impl_serializable_convertible!(bool, i64, f64, String, Url, DateTime<Utc>);

/// Integers wider than `i64` fall back to a double.
macro_rules! impl_serializable_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Serializable for $ty {
                fn serialize(&self, data: &mut SerializableData<'_>) {
                    let value = match i64::try_from(*self) {
                        Ok(value) => serialize_convertible(&value),
                        Err(_) => serialize_convertible(&(*self as f64)),
                    };
                    data.set_value(value);
                }
            }
        )*
    };
}

impl_serializable_int!(i8, i16, i32, isize, u8, u16, u32, u64, usize);

impl Serializable for f32 {
    fn serialize(&self, data: &mut SerializableData<'_>) {
        data.set_value(serialize_convertible(&f64::from(*self)));
    }
}

impl Serializable for char {
    fn serialize(&self, data: &mut SerializableData<'_>) {
        data.set_value(serialize_convertible(&self.to_string()));
    }
}

impl Serializable for str {
    fn serialize(&self, data: &mut SerializableData<'_>) {
        data.set_value(serialize_convertible(&self.to_string()));
    }
}

impl<T: Serializable> Serializable for Vec<T> {
    fn serialize(&self, data: &mut SerializableData<'_>) {
        let value = data.mapper().serialize_array(self);
        data.set_value(value);
    }
}

impl<T: Serializable> Serializable for [T] {
    fn serialize(&self, data: &mut SerializableData<'_>) {
        let value = data.mapper().serialize_array(self);
        data.set_value(value);
    }
}

impl<T: Serializable> Serializable for Option<T> {
    fn serialize(&self, data: &mut SerializableData<'_>) {
        let value = data.mapper().serialize_optional(self.as_ref());
        data.set_value(value);
    }
}

impl<T: Serializable> Serializable for HashMap<String, T> {
    fn serialize(&self, data: &mut SerializableData<'_>) {
        let value = data.mapper().serialize_map(self);
        data.set_value(value);
    }
}

impl<T: Serializable + ?Sized> Serializable for Box<T> {
    fn serialize(&self, data: &mut SerializableData<'_>) {
        (**self).serialize(data);
    }

    fn concrete_type_id(&self) -> TypeId {
        (**self).concrete_type_id()
    }
}
