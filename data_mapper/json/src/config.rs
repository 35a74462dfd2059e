//! Output and parsing options for [`JsonSerializer`](crate::JsonSerializer).

use data_mapper::impl_mappable;

/// JSON options, usually read from the `json` section of a config file.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonConfig {
    /// Multi-line output.
    pub pretty: bool,
    /// Spaces per nesting level when `pretty` is set.
    pub indent: usize,
    /// Adds a boolean projection to the literals `0` and `1`.
    pub numeric_booleans: bool,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: 2,
            numeric_booleans: false,
        }
    }
}

impl_mappable! {
    JsonConfig {
        pretty: bool,
        indent: usize,
        numeric_booleans: bool,
    }
}
