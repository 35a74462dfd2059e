//! Default transformations for primitive and common library types.

use super::{DeserializableTransformation, SerializableTransformation};
use crate::value::GenericValue;
use chrono::{DateTime, SecondsFormat, Utc};
use url::Url;

/// Declares a stateless transformation that reads through a `GenericValue` accessor.
macro_rules! primitive_transformation {
    ($(#[$doc:meta])* $name:ident, $ty:ty, $variant:ident, $read:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl SerializableTransformation for $name {
            type Object = $ty;

            fn to_generic(&self, object: Option<&$ty>) -> GenericValue {
                object.map_or(GenericValue::Null, |value| GenericValue::$variant(value.clone()))
            }
        }

        impl DeserializableTransformation for $name {
            type Object = $ty;

            fn from_generic(&self, value: &GenericValue) -> Option<$ty> {
                let read: fn(&GenericValue) -> Option<$ty> = $read;
                read(value)
            }
        }
    };
}

primitive_transformation!(
    /// `bool` through [`GenericValue::as_bool`].
    BoolTransformation,
    bool,
    Bool,
    |value| value.as_bool()
);

primitive_transformation!(
    /// `i64` through [`GenericValue::as_int`]. Doubles are not truncated.
    IntTransformation,
    i64,
    Int,
    |value| value.as_int()
);

primitive_transformation!(
    /// `f64` through [`GenericValue::as_double`]. Ambiguous integers widen.
    DoubleTransformation,
    f64,
    Double,
    |value| value.as_double()
);

primitive_transformation!(
    StringTransformation,
    String,
    String,
    |value| value.as_string().map(str::to_string)
);

/// URLs as their string form. Unparsable strings read as `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlTransformation;

impl SerializableTransformation for UrlTransformation {
    type Object = Url;

    fn to_generic(&self, object: Option<&Url>) -> GenericValue {
        object.map_or(GenericValue::Null, |url| GenericValue::from(url.as_str()))
    }
}

impl DeserializableTransformation for UrlTransformation {
    type Object = Url;

    fn from_generic(&self, value: &GenericValue) -> Option<Url> {
        Url::parse(value.as_string()?).ok()
    }
}

/// UTC dates as RFC 3339 strings, e.g. `2024-05-01T12:30:00Z`.
///
/// Any offset is accepted when reading and normalized to UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rfc3339DateTransformation;

impl SerializableTransformation for Rfc3339DateTransformation {
    type Object = DateTime<Utc>;

    fn to_generic(&self, object: Option<&DateTime<Utc>>) -> GenericValue {
        object.map_or(GenericValue::Null, |date| {
            GenericValue::String(date.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        })
    }
}

impl DeserializableTransformation for Rfc3339DateTransformation {
    type Object = DateTime<Utc>;

    fn from_generic(&self, value: &GenericValue) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value.as_string()?)
            .ok()
            .map(|date| date.with_timezone(&Utc))
    }
}

/// UTC dates as unix seconds, with millisecond precision in the fraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampDateTransformation;

impl SerializableTransformation for TimestampDateTransformation {
    type Object = DateTime<Utc>;

    fn to_generic(&self, object: Option<&DateTime<Utc>>) -> GenericValue {
        object.map_or(GenericValue::Null, |date| {
            GenericValue::Double(date.timestamp_millis() as f64 / 1000.0)
        })
    }
}

impl DeserializableTransformation for TimestampDateTransformation {
    type Object = DateTime<Utc>;

    fn from_generic(&self, value: &GenericValue) -> Option<DateTime<Utc>> {
        let seconds = value.as_double()?;
        if !seconds.is_finite() {
            return None;
        }
        DateTime::from_timestamp_millis((seconds * 1000.0).round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::number::SupportedNumber;
    use chrono::TimeZone;

    #[test]
    fn test_primitive_transformations_read_exact_kind() {
        assert_eq!(BoolTransformation.from_generic(&GenericValue::Bool(true)), Some(true));
        assert_eq!(BoolTransformation.from_generic(&GenericValue::Int(1)), None);
        assert_eq!(IntTransformation.from_generic(&GenericValue::Double(1.5)), None);
        assert_eq!(
            StringTransformation.from_generic(&GenericValue::from("x")),
            Some("x".to_string())
        );
    }

    #[test]
    fn test_double_transformation_widens_ambiguous_int() {
        let value = GenericValue::Number(SupportedNumber::from_int(2));
        assert_eq!(DoubleTransformation.from_generic(&value), Some(2.0));
        assert_eq!(IntTransformation.from_generic(&value), Some(2));
    }

    #[test]
    fn test_absent_object_is_null() {
        assert_eq!(StringTransformation.to_generic(None), GenericValue::Null);
        assert_eq!(UrlTransformation.to_generic(None), GenericValue::Null);
    }

    #[test]
    fn test_url_transformation() {
        let url = Url::parse("https://example.com/a?b=c").unwrap();
        let generic = UrlTransformation.to_generic(Some(&url));
        assert_eq!(generic, GenericValue::from("https://example.com/a?b=c"));
        assert_eq!(UrlTransformation.from_generic(&generic), Some(url));
        assert_eq!(
            UrlTransformation.from_generic(&GenericValue::from("not a url")),
            None
        );
    }

    #[test]
    fn test_rfc3339_transformation_normalizes_to_utc() {
        let date = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        assert_eq!(
            Rfc3339DateTransformation.to_generic(Some(&date)),
            GenericValue::from("2024-05-01T12:30:00Z")
        );
        assert_eq!(
            Rfc3339DateTransformation.from_generic(&GenericValue::from("2024-05-01T14:30:00+02:00")),
            Some(date)
        );
    }

    #[test]
    fn test_timestamp_transformation() {
        let date = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        let generic = TimestampDateTransformation.to_generic(Some(&date));
        assert_eq!(generic, GenericValue::Double(1_609_459_200.0));
        assert_eq!(
            TimestampDateTransformation.from_generic(&GenericValue::Number(
                SupportedNumber::from_int(1_609_459_200)
            )),
            Some(date)
        );
        assert_eq!(
            TimestampDateTransformation.from_generic(&GenericValue::Double(f64::NAN)),
            None
        );
    }
}
