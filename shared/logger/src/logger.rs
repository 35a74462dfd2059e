//! Thread-safe logger handle.

use crate::error::Result;
use crate::log_level::LogLevel;
use crate::log_message::LogMessage;
use crate::log_target::{LogTarget, MemoryLog};
use crate::log_writer::{LogWriter, spawn_writer_thread};
use std::sync::mpsc::{Sender, channel};

#[derive(Debug, Clone)]
enum Dispatch {
    /// File and stderr targets, written by a dedicated thread.
    Channel(Sender<LogMessage>),
    Memory(MemoryLog),
    Disabled,
}

/// Thread-safe, non-blocking logger.
///
/// Clones, and loggers derived with [`Logger::for_component`], share one destination.
///
/// # Examples
///
/// ```
/// use logging::{LogLevel, LogTarget, Logger};
///
/// let dir = tempfile::tempdir().unwrap();
/// let logger = Logger::new(LogTarget::File(dir.path().join("app.log")), LogLevel::Info).unwrap();
/// logger.info("Mapper ready");
///
/// let parser_logger = logger.for_component("JsonParser");
/// parser_logger.warn("Unexpected character");
/// ```
#[derive(Debug, Clone)]
pub struct Logger {
    dispatch: Dispatch,
    level: LogLevel,
    component: Option<String>,
    console_output: bool,
}

impl Logger {
    /// Creates a logger for `target`.
    ///
    /// # Errors
    ///
    /// Returns error if a file target cannot be created or opened.
    pub fn new(target: LogTarget, level: LogLevel) -> Result<Self> {
        let dispatch = match target {
            LogTarget::File(path) => {
                let (sender, receiver) = channel();
                spawn_writer_thread(LogWriter::to_file(&path)?, receiver);
                Dispatch::Channel(sender)
            }
            LogTarget::Stderr => {
                let (sender, receiver) = channel();
                spawn_writer_thread(LogWriter::to_stderr(), receiver);
                Dispatch::Channel(sender)
            }
            LogTarget::Memory(log) => Dispatch::Memory(log),
        };
        Ok(Logger {
            dispatch,
            level,
            component: None,
            console_output: false,
        })
    }

    /// Creates a logger tagged with a component name (e.g. "ObjectMapper", "JsonParser").
    ///
    /// With `console_output`, every recorded line is mirrored to stderr as well.
    pub fn with_component(
        target: LogTarget,
        level: LogLevel,
        component: &str,
        console_output: bool,
    ) -> Result<Self> {
        let mut logger = Self::new(target, level)?;
        logger.component = Some(component.to_string());
        logger.console_output = console_output;
        Ok(logger)
    }

    /// A logger writing into a fresh [`MemoryLog`], returned alongside it.
    pub fn memory(level: LogLevel) -> (Self, MemoryLog) {
        let log = MemoryLog::new();
        let logger = Logger {
            dispatch: Dispatch::Memory(log.clone()),
            level,
            component: None,
            console_output: false,
        };
        (logger, log)
    }

    /// A logger that records nothing.
    pub fn disabled() -> Self {
        Logger {
            dispatch: Dispatch::Disabled,
            level: LogLevel::Error,
            component: None,
            console_output: false,
        }
    }

    /// Same destination and level, different component.
    pub fn for_component(&self, component: &str) -> Self {
        Logger {
            component: Some(component.to_string()),
            ..self.clone()
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn component(&self) -> Option<&str> {
        self.component.as_deref()
    }

    /// Returns true if a message at `level` would be recorded.
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        !matches!(self.dispatch, Dispatch::Disabled) && level >= self.level
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn log(&self, level: LogLevel, message: &str) {
        if !self.is_enabled(level) {
            return;
        }

        let msg = LogMessage::new(level, self.component.as_deref(), message);
        if self.console_output {
            eprint!("{}", msg.format());
        }

        match &self.dispatch {
            // The writer thread only stops when every sender is gone.
            Dispatch::Channel(sender) => {
                let _ = sender.send(msg);
            }
            Dispatch::Memory(log) => log.push(msg.format()),
            Dispatch::Disabled => {}
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::disabled()
    }
}
