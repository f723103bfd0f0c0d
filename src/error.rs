//! Error types for configuration, initialization and transport setup.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a logger configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `log_type` was left empty.
    #[error("logType is required")]
    MissingLogType,

    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`LoggerConfig`](crate::LoggerConfig).
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors returned by [`LoggerContext::initialize`](crate::LoggerContext::initialize).
#[derive(Debug, Error)]
pub enum InitError {
    /// The supplied configuration failed validation; nothing was installed.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors opening the remote datagram transport.
///
/// These never abort initialization; the remote sink is dropped instead.
#[derive(Debug, Error)]
pub enum TransportError {
    /// `host:port` could not be resolved.
    #[error("failed to resolve udp address {address}: {source}")]
    Resolve {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Resolution succeeded but yielded no addresses.
    #[error("no udp address found for {0}")]
    NoAddress(String),

    /// The socket could not be bound or connected.
    #[error("failed to dial udp {address}: {source}")]
    Open {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(ConfigError::MissingLogType.to_string(), "logType is required");

        let err = InitError::from(ConfigError::MissingLogType);
        assert_eq!(err.to_string(), "configuration error: logType is required");

        let err = TransportError::NoAddress("nowhere:5140".into());
        assert!(err.to_string().contains("nowhere:5140"));
    }
}
