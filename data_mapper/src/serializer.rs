//! The contract between generic values and a wire format.

use crate::value::GenericValue;

/// A wire format for [`GenericValue`] trees.
///
/// Writing never fails. Reading fails with the format's own error type.
pub trait Serializer {
    type Error: std::error::Error + Send + Sync + 'static;

    fn serialize(&self, value: &GenericValue) -> Vec<u8>;

    fn deserialize(&self, data: &[u8]) -> Result<GenericValue, Self::Error>;

    /// Writes `value` as text. Invalid UTF-8 in the output is replaced.
    fn serialize_to_string(&self, value: &GenericValue) -> String {
        match String::from_utf8(self.serialize(value)) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        }
    }

    fn deserialize_from_str(&self, text: &str) -> Result<GenericValue, Self::Error> {
        self.deserialize(text.as_bytes())
    }
}
