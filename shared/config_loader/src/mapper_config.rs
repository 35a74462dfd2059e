use crate::logging_config::LoggingConfig;
use data_mapper::impl_mappable;
use json_serializer::{JsonConfig, JsonSerializer};

/// Configuration for the mapping stack: logging plus JSON options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapperConfig {
    pub logging: LoggingConfig,
    pub json: JsonConfig,
}

impl_mappable! {
    MapperConfig {
        logging: LoggingConfig,
        json: JsonConfig,
    }
}

impl MapperConfig {
    /// A JSON serializer with these options, logging through `logging`.
    pub fn json_serializer(&self) -> crate::Result<JsonSerializer> {
        let logger = self.logging.build_logger("JsonSerializer")?;
        Ok(JsonSerializer::from_config(self.json.clone()).with_logger(logger))
    }
}
