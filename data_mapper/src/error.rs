//! Error types for mapping generic values into typed objects.

use crate::value::{GenericValue, RawType};
use thiserror::Error;

/// Result type for deserialization.
pub type Result<T> = std::result::Result<T, DeserializationError>;

/// Failure to build a typed object out of a [`GenericValue`].
#[derive(Debug, Error)]
pub enum DeserializationError {
    /// The value does not have the shape the target type needs.
    #[error("Wrong type: expected {expected}, found {} ({actual})", .actual.raw_type())]
    WrongType {
        actual: GenericValue,
        expected: RawType,
    },
    /// A failure reported by a user implementation.
    #[error("{0}")]
    Custom(Box<dyn std::error::Error + Send + Sync>),
    #[error("Unknown deserialization error")]
    Unknown,
}

impl DeserializationError {
    pub fn wrong_type(actual: &GenericValue, expected: RawType) -> Self {
        DeserializationError::WrongType {
            actual: actual.clone(),
            expected,
        }
    }

    /// Wraps any error or message.
    pub fn custom<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        DeserializationError::Custom(error.into())
    }
}
