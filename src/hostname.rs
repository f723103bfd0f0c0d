//! Hostname detection.

use std::env;

/// Reported when no hostname can be determined.
pub const UNKNOWN_HOSTNAME: &str = "unknown";

/// Get the machine hostname.
///
/// Tries, in order:
/// 1. The system hostname (`gethostname`)
/// 2. The `HOSTNAME` environment variable
/// 3. `"unknown"`
#[must_use]
pub fn get_hostname() -> String {
    if let Some(hostname) = system_hostname() {
        return hostname;
    }

    if let Ok(hostname) = env::var("HOSTNAME") {
        if !hostname.is_empty() {
            return hostname;
        }
    }

    tracing::warn!("Could not determine hostname, using '{}'", UNKNOWN_HOSTNAME);
    UNKNOWN_HOSTNAME.to_string()
}

#[cfg(unix)]
fn system_hostname() -> Option<String> {
    match nix::unistd::gethostname() {
        Ok(hostname) => hostname.into_string().ok().filter(|h| !h.is_empty()),
        Err(e) => {
            tracing::warn!("Failed to get system hostname: {}", e);
            None
        }
    }
}

#[cfg(not(unix))]
fn system_hostname() -> Option<String> {
    env::var("COMPUTERNAME").ok().filter(|h| !h.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_hostname_not_empty() {
        assert!(!get_hostname().is_empty());
    }
}
