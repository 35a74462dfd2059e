//! JSON as a [`Serializer`] wire format.

use crate::config::JsonConfig;
use crate::error::JsonError;
use crate::parser::JsonParser;
use crate::writer::JsonWriter;
use data_mapper::{GenericValue, Serializer};
use logging::Logger;

/// The JSON [`Serializer`].
///
/// # Examples
///
/// ```
/// use data_mapper::{GenericValue, Serializer};
/// use json_serializer::JsonSerializer;
///
/// let json = JsonSerializer::new();
/// let value = json.deserialize(br#"{"id": 7}"#).unwrap();
/// assert_eq!(value.get("id").and_then(|v| v.as_int()), Some(7));
/// assert_eq!(json.serialize_to_string(&value), r#"{"id":7}"#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonSerializer {
    config: JsonConfig,
    logger: Logger,
}

impl JsonSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: JsonConfig) -> Self {
        Self {
            config,
            logger: Logger::disabled(),
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger.for_component("JsonSerializer");
        self
    }

    pub fn config(&self) -> &JsonConfig {
        &self.config
    }

    fn writer(&self) -> JsonWriter {
        if self.config.pretty {
            JsonWriter::pretty(self.config.indent)
        } else {
            JsonWriter::new()
        }
    }

    fn parser(&self) -> JsonParser {
        JsonParser::new().with_numeric_booleans(self.config.numeric_booleans)
    }
}

impl Serializer for JsonSerializer {
    type Error = JsonError;

    /// A top-level null produces no bytes.
    fn serialize(&self, value: &GenericValue) -> Vec<u8> {
        if value.is_null() {
            self.logger.debug("Top-level null serialized as empty output");
            return Vec::new();
        }
        self.writer().write(value).into_bytes()
    }

    fn deserialize(&self, data: &[u8]) -> Result<GenericValue, JsonError> {
        self.parser().parse(data).inspect_err(|err| {
            self.logger.warn(&format!("Failed to parse JSON: {}", err));
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logging::LogLevel;

    #[test]
    fn test_null_writes_empty_output() {
        let (logger, log) = Logger::memory(LogLevel::Debug);
        let json = JsonSerializer::new().with_logger(logger);

        assert!(json.serialize(&GenericValue::Null).is_empty());
        assert!(log.contains("[component: JsonSerializer]: Top-level null"));
        assert!(json.deserialize(b"").unwrap().is_null());
    }

    #[test]
    fn test_parse_failure_is_logged() {
        let (logger, log) = Logger::memory(LogLevel::Warn);
        let json = JsonSerializer::new().with_logger(logger);

        let err = json.deserialize(b"[1,").unwrap_err();
        assert!(matches!(err, JsonError::Parse { .. }));
        assert!(log.contains("Failed to parse JSON: Couldn't parse JSON. Unexpected end of input"));
    }

    #[test]
    fn test_config_drives_output_and_parsing() {
        let json = JsonSerializer::from_config(JsonConfig {
            pretty: true,
            indent: 4,
            numeric_booleans: true,
        });

        let value = GenericValue::Array(vec![GenericValue::Int(1)]);
        assert_eq!(json.serialize_to_string(&value), "[\n    1\n]");
        assert_eq!(json.deserialize_from_str("1").unwrap().as_bool(), Some(true));
        assert_eq!(json.config().indent, 4);
    }
}
