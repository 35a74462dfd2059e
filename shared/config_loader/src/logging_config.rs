use crate::error::Result;
use data_mapper::impl_mappable;
use logging::{LogLevel, LogTarget, Logger};
use std::path::PathBuf;

/// Logging configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub log_level: String,
    /// Without a path, lines go to stderr if `enable_console` is set, or nowhere.
    pub log_file_path: Option<String>,
    pub enable_console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: "info".to_string(),
            log_file_path: None,
            enable_console: false,
        }
    }
}

impl_mappable! {
    LoggingConfig {
        log_level: String,
        log_file_path: Option<String>,
        enable_console: bool,
    }
}

impl LoggingConfig {
    /// Builds a logger tagged with `component`.
    ///
    /// # Errors
    ///
    /// Fails on an unknown level name or a log file that cannot be opened.
    pub fn build_logger(&self, component: &str) -> Result<Logger> {
        let level: LogLevel = self.log_level.parse()?;

        let logger = match &self.log_file_path {
            Some(path) => Logger::with_component(
                LogTarget::File(PathBuf::from(path)),
                level,
                component,
                self.enable_console,
            )?,
            None if self.enable_console => {
                Logger::with_component(LogTarget::Stderr, level, component, false)?
            }
            None => Logger::disabled().for_component(component),
        };
        Ok(logger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigError;

    #[test]
    fn test_file_logger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapper.log");
        let config = LoggingConfig {
            log_level: "WARN".to_string(),
            log_file_path: Some(path.display().to_string()),
            enable_console: false,
        };

        let logger = config.build_logger("ConfigTest").unwrap();
        assert_eq!(logger.level(), LogLevel::Warn);
        assert_eq!(logger.component(), Some("ConfigTest"));
        assert!(path.exists());
    }

    #[test]
    fn test_disabled_without_destination() {
        let logger = LoggingConfig::default().build_logger("Quiet").unwrap();
        assert!(!logger.is_enabled(LogLevel::Error));
        assert_eq!(logger.component(), Some("Quiet"));
    }

    #[test]
    fn test_invalid_level() {
        let config = LoggingConfig {
            log_level: "verbose".to_string(),
            ..LoggingConfig::default()
        };
        let err = config.build_logger("Main").unwrap_err();
        assert!(matches!(err, ConfigError::Logging(_)));
    }
}
