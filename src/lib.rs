//! JSON structured logging to stdout and a remote UDP log collector.
//!
//! ```no_run
//! use lagoon_logs::{LoggerConfig, LoggerContext};
//!
//! let logger = LoggerContext::new();
//! let mut config = LoggerConfig::new();
//! config.log_type = "shop-prod".to_string();
//! config.log_host = "logs.example.com".to_string();
//! logger.initialize(config)?;
//!
//! tracing::info!(order_id = 42, "order placed");
//! # Ok::<(), lagoon_logs::InitError>(())
//! ```

pub mod config;
pub mod error;
pub mod hostname;
pub mod logging;
pub mod net;

#[cfg(test)]
mod test_support;

pub use config::{LoggerConfig, ResolvedSettings};
pub use error::{ConfigError, InitError, TransportError};
pub use logging::{LoggerContext, MESSAGE_VERSION};
