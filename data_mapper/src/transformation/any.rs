//! Type-erased transformations.

use super::{DeserializableTransformation, SerializableTransformation};
use crate::value::GenericValue;
use std::fmt;
use std::sync::Arc;

type ToGeneric<T> = dyn Fn(Option<&T>) -> GenericValue + Send + Sync;
type FromGeneric<T> = dyn Fn(&GenericValue) -> Option<T> + Send + Sync;

/// A transformation stored as a closure pair.
///
/// Cloning is cheap, both closures are shared.
pub struct AnyTransformation<T> {
    to_generic: Arc<ToGeneric<T>>,
    from_generic: Arc<FromGeneric<T>>,
}

impl<T: 'static> AnyTransformation<T> {
    /// Erases a concrete transformation.
    pub fn new<R>(transformation: R) -> Self
    where
        R: SerializableTransformation<Object = T>
            + DeserializableTransformation<Object = T>
            + Send
            + Sync
            + 'static,
    {
        let transformation = Arc::new(transformation);
        let reader = Arc::clone(&transformation);
        Self {
            to_generic: Arc::new(move |object| transformation.to_generic(object)),
            from_generic: Arc::new(move |value| reader.from_generic(value)),
        }
    }

    /// Builds a transformation out of two closures.
    ///
    /// # Examples
    ///
    /// ```
    /// use data_mapper::{AnyTransformation, GenericValue, DeserializableTransformation};
    ///
    /// let upper = AnyTransformation::custom(
    ///     |s: Option<&String>| s.map_or(GenericValue::Null, |s| GenericValue::from(s.to_uppercase())),
    ///     |value| value.as_string().map(str::to_lowercase),
    /// );
    ///
    /// assert_eq!(upper.from_generic(&GenericValue::from("ABC")), Some("abc".to_string()));
    /// ```
    pub fn custom<S, D>(to_generic: S, from_generic: D) -> Self
    where
        S: Fn(Option<&T>) -> GenericValue + Send + Sync + 'static,
        D: Fn(&GenericValue) -> Option<T> + Send + Sync + 'static,
    {
        Self {
            to_generic: Arc::new(to_generic),
            from_generic: Arc::new(from_generic),
        }
    }
}

impl<T> Clone for AnyTransformation<T> {
    fn clone(&self) -> Self {
        Self {
            to_generic: Arc::clone(&self.to_generic),
            from_generic: Arc::clone(&self.from_generic),
        }
    }
}

impl<T> fmt::Debug for AnyTransformation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnyTransformation<{}>", std::any::type_name::<T>())
    }
}

impl<T> SerializableTransformation for AnyTransformation<T> {
    type Object = T;

    fn to_generic(&self, object: Option<&T>) -> GenericValue {
        (self.to_generic)(object)
    }
}

impl<T> DeserializableTransformation for AnyTransformation<T> {
    type Object = T;

    fn from_generic(&self, value: &GenericValue) -> Option<T> {
        (self.from_generic)(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformation::IntTransformation;

    #[test]
    fn test_erased_transformation_delegates() {
        let erased = AnyTransformation::new(IntTransformation);
        assert_eq!(erased.to_generic(Some(&3)), GenericValue::Int(3));
        assert_eq!(erased.to_generic(None), GenericValue::Null);
        assert_eq!(erased.from_generic(&GenericValue::Int(3)), Some(3));
        assert_eq!(erased.from_generic(&GenericValue::from("3")), None);
    }

    #[test]
    fn test_custom_transformation() {
        let doubled = AnyTransformation::custom(
            |value: Option<&i64>| value.map_or(GenericValue::Null, |v| GenericValue::Int(v * 2)),
            |value| value.as_int().map(|v| v / 2),
        );
        let copy = doubled.clone();

        assert_eq!(copy.to_generic(Some(&4)), GenericValue::Int(8));
        assert_eq!(doubled.from_generic(&GenericValue::Int(8)), Some(4));
    }
}
