//! Bridge between serde and generic values.
//!
//! Encoding and decoding go through explicit containers: keyed (maps), unkeyed (arrays) and
//! single-value. The serde `Serializer` and `Deserializer` implementations are thin drivers
//! over these containers, so derived types and hand-written container code produce the same
//! trees. Misusing a container, such as writing a single-value container twice or asking
//! for a nested keyed container where an array was already written, panics.

mod de;
mod decoder;
mod encoder;
mod error;
mod ser;

pub use de::ValueDeserializer;
pub use decoder::{
    Decoder, KeyedDecodingContainer, SingleValueDecodingContainer, UnkeyedDecodingContainer,
};
pub use encoder::{
    Encoder, KeyedEncodingContainer, SingleValueEncodingContainer, UnkeyedEncodingContainer,
};
pub use error::{DecodingError, EncodingError};
pub use ser::ValueSerializer;

use crate::mapper::ObjectMapper;
use crate::serializer::Serializer;
use std::fmt;

/// One step in the path from the root to the value being coded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CodingKey {
    Key(String),
    Index(usize),
}

impl fmt::Display for CodingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodingKey::Key(key) => f.write_str(key),
            CodingKey::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// Renders a coding path as `user.tags[0]`. The root is an empty string.
pub fn format_path(path: &[CodingKey]) -> String {
    let mut out = String::new();
    for key in path {
        if matches!(key, CodingKey::Key(_)) && !out.is_empty() {
            out.push('.');
        }
        out.push_str(&key.to_string());
    }
    out
}

pub(crate) fn child_path(path: &[CodingKey], key: CodingKey) -> Vec<CodingKey> {
    let mut child = Vec::with_capacity(path.len() + 1);
    child.extend_from_slice(path);
    child.push(key);
    child
}

/// Encodes serde values straight to bytes of a wire format.
///
/// # Examples
///
/// ```
/// use data_mapper::codable::ObjectEncoder;
/// use data_mapper::{GenericValue, ObjectMapper, Serializer};
///
/// struct Debugging;
///
/// impl Serializer for Debugging {
///     type Error = std::fmt::Error;
///
///     fn serialize(&self, value: &GenericValue) -> Vec<u8> {
///         value.to_string().into_bytes()
///     }
///
///     fn deserialize(&self, _: &[u8]) -> Result<GenericValue, Self::Error> {
///         Err(std::fmt::Error)
///     }
/// }
///
/// let encoder = ObjectEncoder::new(ObjectMapper::new(), Debugging);
/// assert_eq!(encoder.encode(&vec![1, 2]).unwrap(), b"[1, 2]");
/// ```
#[derive(Debug, Clone)]
pub struct ObjectEncoder<S> {
    mapper: ObjectMapper,
    serializer: S,
}

impl<S: Serializer> ObjectEncoder<S> {
    pub fn new(mapper: ObjectMapper, serializer: S) -> Self {
        Self { mapper, serializer }
    }

    pub fn encode<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, EncodingError> {
        let generic = self.mapper.encode(value)?;
        Ok(self.serializer.serialize(&generic))
    }
}

/// Decodes serde values straight from bytes of a wire format.
#[derive(Debug, Clone)]
pub struct ObjectDecoder<S> {
    mapper: ObjectMapper,
    serializer: S,
}

impl<S: Serializer> ObjectDecoder<S> {
    pub fn new(mapper: ObjectMapper, serializer: S) -> Self {
        Self { mapper, serializer }
    }

    /// # Errors
    ///
    /// Wire format failures are reported as [`DecodingError::DataCorrupted`].
    pub fn decode<T: serde::de::DeserializeOwned>(&self, data: &[u8]) -> Result<T, DecodingError> {
        let generic = self
            .serializer
            .deserialize(data)
            .map_err(|err| DecodingError::DataCorrupted(err.to_string()))?;
        self.mapper.decode(&generic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_path() {
        let path = vec![
            CodingKey::Key("user".to_string()),
            CodingKey::Key("tags".to_string()),
            CodingKey::Index(0),
        ];
        assert_eq!(format_path(&path), "user.tags[0]");
        assert_eq!(format_path(&[CodingKey::Index(3)]), "[3]");
        assert_eq!(format_path(&[]), "");
    }
}
