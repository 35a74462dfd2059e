//! Reusable conversions between a [`GenericValue`] and an external type.
//!
//! A transformation is a pair of pure functions. Serializing an absent object yields
//! [`GenericValue::Null`], and a value the transformation cannot read yields `None`.

mod any;
mod builtin;
mod composed;
mod registry;

pub use any::AnyTransformation;
pub use builtin::{
    BoolTransformation, DoubleTransformation, IntTransformation, Rfc3339DateTransformation,
    StringTransformation, TimestampDateTransformation, UrlTransformation,
};
pub use composed::{ComposedTransformation, EnumTransformation, RawRepresentable};
pub use registry::{
    SupportedTypeConvertible, TransformationRegistry, default_registry, default_transformation,
};

pub(crate) use registry::{deserialize_convertible, serialize_convertible};

use crate::value::GenericValue;

/// Writes an external type as a generic value.
pub trait SerializableTransformation {
    type Object;

    fn to_generic(&self, object: Option<&Self::Object>) -> GenericValue;
}

/// Reads an external type from a generic value.
pub trait DeserializableTransformation {
    type Object;

    fn from_generic(&self, value: &GenericValue) -> Option<Self::Object>;
}

/// A transformation usable in both directions.
pub trait Transformation:
    SerializableTransformation
    + DeserializableTransformation<Object = <Self as SerializableTransformation>::Object>
{
}

impl<R> Transformation for R where
    R: SerializableTransformation
        + DeserializableTransformation<Object = <R as SerializableTransformation>::Object>
{
}
