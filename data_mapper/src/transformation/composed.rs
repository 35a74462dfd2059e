//! Transformations built on top of other transformations.

use super::{
    DeserializableTransformation, SerializableTransformation, SupportedTypeConvertible,
    default_transformation,
};
use crate::value::GenericValue;
use std::marker::PhantomData;

/// Adapts a transformation of `Base::Object` to another type through a pair of conversions.
///
/// # Examples
///
/// ```
/// use data_mapper::{ComposedTransformation, DoubleTransformation, GenericValue};
/// use data_mapper::{DeserializableTransformation, SerializableTransformation};
/// use std::time::Duration;
///
/// let seconds = ComposedTransformation::new(
///     DoubleTransformation,
///     |duration: &Duration| duration.as_secs_f64(),
///     |seconds| (seconds >= 0.0).then(|| Duration::from_secs_f64(seconds)),
/// );
///
/// assert_eq!(seconds.to_generic(Some(&Duration::from_millis(1500))), GenericValue::Double(1.5));
/// assert_eq!(seconds.from_generic(&GenericValue::Double(-1.0)), None);
/// ```
pub struct ComposedTransformation<Base, T, ToBase, FromBase> {
    base: Base,
    into_base: ToBase,
    from_base: FromBase,
    _object: PhantomData<fn() -> T>,
}

impl<Base, T, ToBase, FromBase> ComposedTransformation<Base, T, ToBase, FromBase>
where
    Base: SerializableTransformation + DeserializableTransformation,
    ToBase: Fn(&T) -> <Base as SerializableTransformation>::Object,
    FromBase: Fn(<Base as DeserializableTransformation>::Object) -> Option<T>,
{
    pub fn new(base: Base, into_base: ToBase, from_base: FromBase) -> Self {
        Self {
            base,
            into_base,
            from_base,
            _object: PhantomData,
        }
    }
}

impl<Base, T, ToBase, FromBase> SerializableTransformation for ComposedTransformation<Base, T, ToBase, FromBase>
where
    Base: SerializableTransformation,
    ToBase: Fn(&T) -> Base::Object,
{
    type Object = T;

    fn to_generic(&self, object: Option<&T>) -> GenericValue {
        match object {
            Some(object) => self.base.to_generic(Some(&(self.into_base)(object))),
            None => self.base.to_generic(None),
        }
    }
}

impl<Base, T, ToBase, FromBase> DeserializableTransformation
    for ComposedTransformation<Base, T, ToBase, FromBase>
where
    Base: DeserializableTransformation,
    FromBase: Fn(Base::Object) -> Option<T>,
{
    type Object = T;

    fn from_generic(&self, value: &GenericValue) -> Option<T> {
        self.base.from_generic(value).and_then(&self.from_base)
    }
}

/// A type backed by a primitive raw value, usually a fieldless enum.
pub trait RawRepresentable: Sized {
    type Raw: SupportedTypeConvertible;

    fn raw_value(&self) -> Self::Raw;

    fn from_raw_value(raw: Self::Raw) -> Option<Self>;
}

/// Maps a [`RawRepresentable`] through the default transformation of its raw type.
pub struct EnumTransformation<E> {
    _enum: PhantomData<fn() -> E>,
}

impl<E> EnumTransformation<E> {
    pub fn new() -> Self {
        Self {
            _enum: PhantomData,
        }
    }
}

impl<E> Default for EnumTransformation<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: RawRepresentable> SerializableTransformation for EnumTransformation<E> {
    type Object = E;

    fn to_generic(&self, object: Option<&E>) -> GenericValue {
        let raw = object.map(RawRepresentable::raw_value);
        default_transformation::<E::Raw>()
            .map(|transformation| transformation.to_generic(raw.as_ref()))
            .unwrap_or_default()
    }
}

impl<E: RawRepresentable> DeserializableTransformation for EnumTransformation<E> {
    type Object = E;

    fn from_generic(&self, value: &GenericValue) -> Option<E> {
        default_transformation::<E::Raw>()?
            .from_generic(value)
            .and_then(E::from_raw_value)
    }
}
