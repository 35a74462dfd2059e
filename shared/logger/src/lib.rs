//! Thread-safe, non-blocking logging shared by the mapping crates.
//!
//! Messages go to a file or to stderr through a dedicated writer thread, or into an
//! in-memory buffer that tests can inspect. A disabled logger drops everything, which is
//! what library types use until a caller hands them a real one.

pub mod error;
mod log_level;
mod log_message;
mod log_target;
mod log_writer;
mod logger;

pub use error::{LoggingError, Result};
pub use log_level::LogLevel;
pub use log_target::{LogTarget, MemoryLog};
pub use logger::Logger;
