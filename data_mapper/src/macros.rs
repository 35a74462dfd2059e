//! Macros for mapping plain structs and enums.

/// Implements both [`Serializable`](crate::Serializable) and
/// [`Deserializable`](crate::Deserializable) for a struct.
///
/// Fields are written under their own names. When reading, the struct starts from its
/// `Default` and only the keys present in the map are overwritten.
///
/// # Examples
///
/// ```
/// use data_mapper::{impl_mappable, GenericValue, ObjectMapper};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Server {
///     host: String,
///     port: i64,
/// }
///
/// impl Default for Server {
///     fn default() -> Self {
///         Self {
///             host: "127.0.0.1".to_string(),
///             port: 8080,
///         }
///     }
/// }
///
/// impl_mappable! {
///     Server {
///         host: String,
///         port: i64,
///     }
/// }
///
/// let mapper = ObjectMapper::new();
/// let mut value = GenericValue::empty_map();
/// value.set("port", GenericValue::Int(3000));
///
/// let server: Server = mapper.deserialize(&value).unwrap();
/// assert_eq!(server.host, "127.0.0.1");
/// assert_eq!(server.port, 3000);
/// ```
#[macro_export]
macro_rules! impl_mappable {
    ($struct_name:ident { $($field:ident: $field_ty:ty),* $(,)? }) => {
        impl $crate::Serializable for $struct_name {
            fn serialize(&self, data: &mut $crate::SerializableData<'_>) {
                data.set_value($crate::GenericValue::empty_map());
                $(
                    data.set(stringify!($field), &self.$field);
                )*
            }
        }

        impl $crate::Deserializable for $struct_name {
            #[allow(unused_mut)]
            fn deserialize(data: &$crate::DeserializableData<'_>) -> $crate::Result<Self> {
                if data.raw().as_map().is_none() {
                    return Err($crate::DeserializationError::wrong_type(
                        data.raw(),
                        $crate::RawType::Map,
                    ));
                }

                let mut result = Self::default();
                $(
                    if data.contains(stringify!($field)) {
                        result.$field = data.at(stringify!($field)).get::<$field_ty>()?;
                    }
                )*
                Ok(result)
            }
        }
    };
}

/// Implements both [`Serializable`](crate::Serializable) and
/// [`Deserializable`](crate::Deserializable) for an enum with unit variants, mapped to strings.
///
/// # Examples
///
/// ```
/// use data_mapper::{impl_mappable_enum, GenericValue, ObjectMapper};
///
/// #[derive(Debug, PartialEq)]
/// enum Role {
///     Owner,
///     Guest,
/// }
///
/// impl_mappable_enum! {
///     Role {
///         Owner,
///         Guest,
///     }
/// }
///
/// let mapper = ObjectMapper::new();
/// assert_eq!(mapper.serialize(&Role::Guest), GenericValue::from("Guest"));
/// assert_eq!(mapper.deserialize::<Role>(&GenericValue::from("Owner")).unwrap(), Role::Owner);
/// ```
#[macro_export]
macro_rules! impl_mappable_enum {
    ($enum_name:ident { $($variant:ident),* $(,)? }) => {
        impl $crate::Serializable for $enum_name {
            fn serialize(&self, data: &mut $crate::SerializableData<'_>) {
                let name = match self {
                    $(
                        $enum_name::$variant => stringify!($variant),
                    )*
                };
                data.set_value($crate::GenericValue::from(name));
            }
        }

        impl $crate::Deserializable for $enum_name {
            fn deserialize(data: &$crate::DeserializableData<'_>) -> $crate::Result<Self> {
                let name = data.raw().as_string().ok_or_else(|| {
                    $crate::DeserializationError::wrong_type(data.raw(), $crate::RawType::String)
                })?;

                match name {
                    $(
                        stringify!($variant) => Ok($enum_name::$variant),
                    )*
                    _ => Err($crate::DeserializationError::custom(format!(
                        "Unknown variant '{}' for enum {}",
                        name,
                        stringify!($enum_name)
                    ))),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{DeserializationError, GenericValue, ObjectMapper, RawType};

    #[derive(Debug, Clone, PartialEq, Default)]
    enum Level {
        #[default]
        Low,
        High,
    }

    impl_mappable_enum!(Level { Low, High });

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Settings {
        name: String,
        retries: i64,
        level: Level,
        labels: Vec<String>,
        owner: Option<String>,
    }

    impl_mappable!(Settings {
        name: String,
        retries: i64,
        level: Level,
        labels: Vec<String>,
        owner: Option<String>,
    });

    #[test]
    fn test_struct_round_trip() {
        let mapper = ObjectMapper::new();
        let settings = Settings {
            name: "primary".to_string(),
            retries: 3,
            level: Level::High,
            labels: vec!["a".to_string()],
            owner: None,
        };

        let value = mapper.serialize(&settings);
        assert_eq!(value.get("level"), Some(&GenericValue::from("High")));
        assert_eq!(value.get("owner"), Some(&GenericValue::Null));

        let back: Settings = mapper.deserialize(&value).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let mapper = ObjectMapper::new();
        let mut value = GenericValue::empty_map();
        value.set("retries", GenericValue::Int(5));

        let settings: Settings = mapper.deserialize(&value).unwrap();
        assert_eq!(settings.retries, 5);
        assert_eq!(settings.name, "");
        assert_eq!(settings.level, Level::Low);
    }

    #[test]
    fn test_present_field_with_wrong_type_fails() {
        let mapper = ObjectMapper::new();
        let mut value = GenericValue::empty_map();
        value.set("retries", GenericValue::from("many"));

        let err = mapper.deserialize::<Settings>(&value).unwrap_err();
        assert!(matches!(
            err,
            DeserializationError::WrongType { expected: RawType::Int, .. }
        ));
    }

    #[test]
    fn test_non_map_is_rejected() {
        let mapper = ObjectMapper::new();
        let err = mapper
            .deserialize::<Settings>(&GenericValue::Array(Vec::new()))
            .unwrap_err();
        assert!(matches!(
            err,
            DeserializationError::WrongType { expected: RawType::Map, .. }
        ));
    }

    #[test]
    fn test_unknown_enum_variant() {
        let mapper = ObjectMapper::new();
        let err = mapper
            .deserialize::<Level>(&GenericValue::from("Medium"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown variant 'Medium' for enum Level");
    }
}
