//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! LoggerConfig::default() / config file (TOML)
//!     → caller overrides fields
//!     → LoggerContext::apply_config
//!         → ResolvedSettings (replaces previous value)
//!         → validation.rs (log type required, host advisory)
//!     → consumed once by the logger initializer
//! ```
//!
//! # Design Decisions
//! - Defaulting and validation are separate steps so callers can edit a
//!   default config before committing it
//! - Applying a config overwrites every resolved field; it is not additive

pub mod loader;
pub mod resolved;
pub mod schema;
pub mod validation;

pub use resolved::ResolvedSettings;
pub use schema::LoggerConfig;
