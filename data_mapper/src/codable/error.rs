//! Errors raised by the serde bridge.

use crate::value::RawType;
use std::fmt::Display;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodingError {
    #[error("Invalid value at '{path}': {message}")]
    InvalidValue { path: String, message: String },
    #[error("{0}")]
    Custom(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodingError {
    /// A key or element the caller asked for is absent.
    #[error("No value found for {expected} at '{path}'")]
    ValueNotFound { path: String, expected: String },
    #[error("Type mismatch at '{path}': expected {expected}, found {actual}")]
    TypeMismatch {
        path: String,
        expected: String,
        actual: RawType,
    },
    /// The bytes could not be read by the wire format.
    #[error("Data corrupted: {0}")]
    DataCorrupted(String),
    #[error("{0}")]
    Custom(String),
}

impl serde::ser::Error for EncodingError {
    fn custom<T: Display>(msg: T) -> Self {
        EncodingError::Custom(msg.to_string())
    }
}

impl serde::de::Error for DecodingError {
    fn custom<T: Display>(msg: T) -> Self {
        DecodingError::Custom(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoding_error_display() {
        let err = DecodingError::TypeMismatch {
            path: "user.age".to_string(),
            expected: "int".to_string(),
            actual: RawType::String,
        };
        assert_eq!(
            err.to_string(),
            "Type mismatch at 'user.age': expected int, found string"
        );

        let err = DecodingError::ValueNotFound {
            path: "tags[2]".to_string(),
            expected: "string".to_string(),
        };
        assert_eq!(err.to_string(), "No value found for string at 'tags[2]'");
    }

    #[test]
    fn test_serde_custom_errors() {
        let err = <EncodingError as serde::ser::Error>::custom("bad key");
        assert_eq!(err, EncodingError::Custom("bad key".to_string()));

        let err = <DecodingError as serde::de::Error>::custom("bad input");
        assert_eq!(err.to_string(), "bad input");
    }
}
