//! Configuration validation.
//!
//! # Responsibilities
//! - Reject settings without a log type
//! - Warn (without failing) when no log host is given
//!
//! # Design Decisions
//! - Runs against the committed [`ResolvedSettings`], after defaults and
//!   caller overrides have been merged
//! - The host warning goes through whatever dispatcher is current; the
//!   JSON logger usually is not installed yet

use crate::config::resolved::ResolvedSettings;
use crate::error::ConfigError;

/// Validate committed settings.
pub fn validate(settings: &ResolvedSettings) -> Result<(), ConfigError> {
    if settings.log_host.is_empty() {
        tracing::warn!("log.host is not supplied and will default to localhost");
    }

    if settings.log_type.is_empty() {
        return Err(ConfigError::MissingLogType);
    }

    Ok(())
}
