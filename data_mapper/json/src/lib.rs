//! JSON for the object mapper.
//!
//! [`JsonSerializer`] plugs JSON text into the [`data_mapper::Serializer`] contract. The
//! helpers below go straight between JSON text and mappable types.
//!
//! # Example
//!
//! ```
//! use data_mapper::impl_mappable;
//! use json_serializer::{from_str, to_string_pretty};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct User {
//!     name: String,
//!     age: i64,
//! }
//!
//! impl_mappable! {
//!     User {
//!         name: String,
//!         age: i64,
//!     }
//! }
//!
//! let user: User = from_str(r#"{"name":"Alice","age":30}"#).unwrap();
//! assert_eq!(user.age, 30);
//!
//! let output = to_string_pretty(&user);
//! assert!(output.starts_with("{\n  \""));
//! ```

mod config;
pub mod error;
mod parser;
mod serializer;
mod writer;

pub use config::JsonConfig;
pub use error::{Error, JsonError, ParseMessage, Result};
pub use parser::JsonParser;
pub use serializer::JsonSerializer;
pub use writer::JsonWriter;

use data_mapper::{Deserializable, GenericValue, ObjectMapper, Serializable};

/// Serializes `value` to compact JSON.
pub fn to_string<T: Serializable + ?Sized>(value: &T) -> String {
    JsonWriter::new().write(&ObjectMapper::new().serialize(value))
}

/// Serializes `value` to JSON with two-space indentation.
pub fn to_string_pretty<T: Serializable + ?Sized>(value: &T) -> String {
    JsonWriter::pretty(2).write(&ObjectMapper::new().serialize(value))
}

/// Parses JSON text and maps it into `T`.
pub fn from_str<T: Deserializable>(text: &str) -> std::result::Result<T, Error> {
    let value = JsonParser::new().parse_str(text)?;
    Ok(ObjectMapper::new().deserialize(&value)?)
}

/// Parses JSON text into a generic value.
pub fn parse(text: &str) -> Result<GenericValue> {
    JsonParser::new().parse_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers_on_builtin_types() {
        assert_eq!(to_string(&vec![1i64, 2, 3]), "[1,2,3]");
        assert_eq!(to_string_pretty(&vec!["a".to_string()]), "[\n  \"a\"\n]");

        let numbers: Vec<i64> = from_str("[4, 5]").unwrap();
        assert_eq!(numbers, vec![4, 5]);
    }

    #[test]
    fn test_from_str_error_kinds() {
        assert!(matches!(from_str::<Vec<i64>>("[4,"), Err(Error::Json(_))));
        assert!(matches!(
            from_str::<Vec<i64>>(r#"["x"]"#),
            Err(Error::Deserialization(_))
        ));
    }

    #[test]
    fn test_parse_helper() {
        let value = parse(r#"{"a": [true]}"#).unwrap();
        assert_eq!(value.get_path("a"), Some(&GenericValue::Array(vec![GenericValue::Bool(true)])));
    }
}
