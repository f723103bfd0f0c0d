//! Configuration schema definitions.
//!
//! [`LoggerConfig`] is a plain value built by the caller, optionally loaded
//! from a TOML file. Missing keys fall back to the defaults below.

use serde::{Deserialize, Serialize};

/// Channel name reported when none is configured.
pub const DEFAULT_LOG_CHANNEL: &str = "LagoonLogs";

/// Default remote UDP port.
pub const DEFAULT_LOG_PORT: u16 = 5140;

/// Message version carried by a freshly constructed config.
pub const DEFAULT_MESSAGE_VERSION: u32 = 1;

/// Logger configuration supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Include the source location (`file`, `line`, `module`) in every record.
    pub add_source: bool,

    /// Reported as `application` on every record.
    pub application_name: String,

    /// Reported as `channel` on every record.
    pub log_channel: String,

    /// Remote log collector host. Empty means localhost.
    pub log_host: String,

    /// Remote log collector UDP port.
    pub log_port: u16,

    /// Reported as `type`; selects the downstream index. Required.
    pub log_type: String,

    /// Accepted for completeness; initialization replaces it with the
    /// crate's fixed message version.
    pub message_version: u32,
}

impl LoggerConfig {
    /// A config populated with defaults. Same as [`LoggerConfig::default`].
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            add_source: true,
            application_name: String::new(),
            log_channel: DEFAULT_LOG_CHANNEL.to_string(),
            log_host: String::new(),
            log_port: DEFAULT_LOG_PORT,
            log_type: String::new(),
            message_version: DEFAULT_MESSAGE_VERSION,
        }
    }
}
