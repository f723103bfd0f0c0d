//! Settings resolved from a [`LoggerConfig`] at initialization.

use crate::config::schema::LoggerConfig;

/// The committed settings consumed by the logger.
///
/// Mirrors [`LoggerConfig`] plus the machine hostname. A new value replaces
/// the previous one wholesale each time a config is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub add_source: bool,
    pub application_name: String,
    pub log_channel: String,
    pub log_host: String,
    pub log_port: u16,
    pub log_type: String,
    pub message_version: u32,
    pub hostname: String,
}

impl ResolvedSettings {
    /// Copy every field of `config`, keeping `hostname`.
    pub fn from_config(config: LoggerConfig, hostname: String) -> Self {
        Self {
            add_source: config.add_source,
            application_name: config.application_name,
            log_channel: config.log_channel,
            log_host: config.log_host,
            log_port: config.log_port,
            log_type: config.log_type,
            message_version: config.message_version,
            hostname,
        }
    }
}

impl Default for ResolvedSettings {
    fn default() -> Self {
        Self::from_config(LoggerConfig::default(), String::new())
    }
}
