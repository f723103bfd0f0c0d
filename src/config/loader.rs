//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::LoggerConfig;
use crate::error::ConfigError;

/// Load a configuration from a TOML file.
///
/// Keys absent from the file keep their defaults. The result is not
/// validated; that happens when the config is applied.
pub fn load_config(path: &Path) -> Result<LoggerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
