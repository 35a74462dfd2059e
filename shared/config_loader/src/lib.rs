//! # Config Loader
//!
//! Locates configuration files on disk and maps their JSON content into typed config.
//!
//! ```no_run
//! use config_loader::{find_and_load_typed, load_config_file, MapperConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Raw text from an explicit path
//!     let content = load_config_file("./config/mapper.json")?;
//!     println!("{}", content);
//!
//!     // Searched for and mapped into a typed config
//!     let config: MapperConfig = find_and_load_typed("mapper.json")?;
//!     let logger = config.logging.build_logger("Main")?;
//!     logger.info("Configuration loaded");
//!
//!     Ok(())
//! }
//! ```

pub mod error;
mod logging_config;
mod mapper_config;

pub use error::{ConfigError, Result};
pub use logging_config::LoggingConfig;
pub use mapper_config::MapperConfig;

use data_mapper::{Deserializable, ObjectMapper, Serializer};
use json_serializer::JsonSerializer;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads a configuration file.
///
/// Returns the content as text without parsing it.
///
/// # Examples
///
/// ```no_run
/// use config_loader::load_config_file;
///
/// let content = load_config_file("./config/config.json")?;
/// println!("Config content: {}", content);
/// # Ok::<(), config_loader::ConfigError>(())
/// ```
pub fn load_config_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    fs::read_to_string(path).map_err(|e| ConfigError::ReadError(e.to_string()))
}

/// Searches common locations for a configuration file.
///
/// Search order:
/// 1. The `CONFIG_PATH` environment variable (if set)
/// 2. `./config/{filename}`
/// 3. `./{filename}`
pub fn find_config_file(filename: &str) -> Result<PathBuf> {
    if let Ok(path) = env::var("CONFIG_PATH") {
        let path_buf = PathBuf::from(&path);
        if path_buf.exists() {
            return Ok(path_buf);
        }
    }

    let config_dir = PathBuf::from("./config").join(filename);
    if config_dir.exists() {
        return Ok(config_dir);
    }

    let current_dir = PathBuf::from("./").join(filename);
    if current_dir.exists() {
        return Ok(current_dir);
    }

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found. Searched: CONFIG_PATH env var, ./config/{}, ./{}",
        filename, filename, filename
    )))
}

/// Combines [`find_config_file`] and [`load_config_file`].
pub fn find_and_load(filename: &str) -> Result<String> {
    let path = find_config_file(filename)?;
    load_config_file(path)
}

/// Reads a JSON configuration file and maps it into `T`.
///
/// # Examples
///
/// ```no_run
/// use config_loader::{load_typed, MapperConfig};
///
/// let config: MapperConfig = load_typed("./config/mapper.json")?;
/// println!("Pretty output: {}", config.json.pretty);
/// # Ok::<(), config_loader::ConfigError>(())
/// ```
pub fn load_typed<T: Deserializable, P: AsRef<Path>>(path: P) -> Result<T> {
    let content = load_config_file(path)?;
    let value = JsonSerializer::new().deserialize_from_str(&content)?;
    Ok(ObjectMapper::new().deserialize(&value)?)
}

/// Combines [`find_config_file`] and [`load_typed`].
pub fn find_and_load_typed<T: Deserializable>(filename: &str) -> Result<T> {
    let path = find_config_file(filename)?;
    load_typed(path)
}
