//! Default transformations per primitive type, looked up by `TypeId`.

use super::builtin::{
    BoolTransformation, DoubleTransformation, IntTransformation, Rfc3339DateTransformation,
    StringTransformation, UrlTransformation,
};
use super::{AnyTransformation, DeserializableTransformation, SerializableTransformation};
use crate::error::{DeserializationError, Result};
use crate::value::{GenericValue, RawType};
use chrono::{DateTime, Utc};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::OnceLock;
use url::Url;

static DEFAULT_REGISTRY: OnceLock<TransformationRegistry> = OnceLock::new();

/// A set of transformations, at most one per object type.
#[derive(Default)]
pub struct TransformationRegistry {
    entries: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl TransformationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry behind [`default_registry`]: bool, i64, f64, String, Url and
    /// `DateTime<Utc>` (as RFC 3339).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(AnyTransformation::new(BoolTransformation));
        registry.register(AnyTransformation::new(IntTransformation));
        registry.register(AnyTransformation::new(DoubleTransformation));
        registry.register(AnyTransformation::new(StringTransformation));
        registry.register(AnyTransformation::new(UrlTransformation));
        registry.register(AnyTransformation::new(Rfc3339DateTransformation));
        registry
    }

    /// Registers `transformation` for `T`, replacing any previous one.
    pub fn register<T: 'static>(&mut self, transformation: AnyTransformation<T>) {
        self.entries
            .insert(TypeId::of::<T>(), Box::new(transformation));
    }

    pub fn get<T: 'static>(&self) -> Option<&AnyTransformation<T>> {
        self.entries.get(&TypeId::of::<T>())?.downcast_ref()
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The process-wide registry of default transformations. Built on first use, then immutable.
pub fn default_registry() -> &'static TransformationRegistry {
    DEFAULT_REGISTRY.get_or_init(TransformationRegistry::with_defaults)
}

/// The default transformation for `T`, if one is registered.
pub fn default_transformation<T: 'static>() -> Option<&'static AnyTransformation<T>> {
    default_registry().get::<T>()
}

/// A type that maps to a generic value through its default transformation.
pub trait SupportedTypeConvertible: Sized + 'static {
    /// The kind reported when a value cannot be read as `Self`.
    const RAW_TYPE: RawType;

    fn default_transformation() -> Option<&'static AnyTransformation<Self>> {
        default_transformation::<Self>()
    }
}

impl SupportedTypeConvertible for bool {
    const RAW_TYPE: RawType = RawType::Bool;
}

impl SupportedTypeConvertible for i64 {
    const RAW_TYPE: RawType = RawType::Int;
}

impl SupportedTypeConvertible for f64 {
    const RAW_TYPE: RawType = RawType::Double;
}

impl SupportedTypeConvertible for String {
    const RAW_TYPE: RawType = RawType::String;
}

impl SupportedTypeConvertible for Url {
    const RAW_TYPE: RawType = RawType::String;
}

impl SupportedTypeConvertible for DateTime<Utc> {
    const RAW_TYPE: RawType = RawType::String;
}

pub(crate) fn serialize_convertible<T: SupportedTypeConvertible>(value: &T) -> GenericValue {
    T::default_transformation()
        .map(|transformation| transformation.to_generic(Some(value)))
        .unwrap_or_default()
}

pub(crate) fn deserialize_convertible<T: SupportedTypeConvertible>(
    value: &GenericValue,
) -> Result<T> {
    T::default_transformation()
        .and_then(|transformation| transformation.from_generic(value))
        .ok_or_else(|| DeserializationError::wrong_type(value, T::RAW_TYPE))
}
