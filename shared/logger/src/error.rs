//! Error types for logging operations.

use std::io;
use thiserror::Error;

/// Result type for logging operations.
pub type Result<T> = std::result::Result<T, LoggingError>;

/// Errors that can occur while setting up a logger.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// I/O error from file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// A level name that is not debug, info, warn or error.
    #[error("Invalid log level: '{0}'")]
    InvalidLevel(String),
    /// General logging error.
    #[error("Logging error: {0}")]
    Logging(String),
}
