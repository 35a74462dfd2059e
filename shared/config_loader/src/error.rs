use data_mapper::DeserializationError;
use json_serializer::JsonError;
use logging::LoggingError;
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read configuration file: {0}")]
    ReadError(String),

    #[error("Invalid configuration file: {0}")]
    Parse(#[from] JsonError),

    /// The file is valid JSON but does not fit the requested type.
    #[error("Invalid configuration: {0}")]
    Mapping(#[from] DeserializationError),

    #[error("Invalid logging configuration: {0}")]
    Logging(#[from] LoggingError),
}
