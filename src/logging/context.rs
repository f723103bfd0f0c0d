//! Owned logging state.
//!
//! # Responsibilities
//! - Hold the resolved settings (replaced wholesale by each applied config)
//! - Guard the one-time construction of the JSON logger
//! - Keep the installed dispatcher and remote writer for later use
//!
//! # Design Decisions
//! - One context per process, created at startup and shared by reference;
//!   tests build their own and reset it between cases
//! - Settings live in an `ArcSwap` (written rarely, read on every setup and
//!   inspection); the installed logger lives behind a mutex that also
//!   serializes first-time setup

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arc_swap::ArcSwap;
use tracing::Dispatch;

use crate::config::validation::validate;
use crate::config::{LoggerConfig, ResolvedSettings};
use crate::error::ConfigError;
use crate::net::{SynchronizedWriter, UdpConnection};

/// Where the built dispatcher goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallTarget {
    /// `tracing::dispatcher::set_global_default`.
    Global,
    /// Kept in the context only; callers enter it with
    /// `tracing::dispatcher::with_default`.
    Scoped,
}

/// The logger built by the first successful initialization.
#[derive(Clone)]
pub(crate) struct Installed {
    pub(crate) dispatch: Dispatch,
    pub(crate) remote: Option<Arc<SynchronizedWriter<UdpConnection>>>,
}

/// Process-wide logging state, owned explicitly.
///
/// `C` is the console writer; stdout unless replaced with
/// [`LoggerContext::with_console`].
pub struct LoggerContext<C = fn() -> io::Stdout> {
    pub(crate) settings: ArcSwap<ResolvedSettings>,
    pub(crate) initialized: AtomicBool,
    pub(crate) installed: Mutex<Option<Installed>>,
    pub(crate) console: C,
    pub(crate) target: InstallTarget,
}

impl LoggerContext {
    /// A context writing to stdout and installing globally.
    pub fn new() -> Self {
        Self::with_console(io::stdout as fn() -> io::Stdout)
    }
}

impl Default for LoggerContext {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> LoggerContext<C> {
    /// A context writing console output to `console` and installing globally.
    pub fn with_console(console: C) -> Self {
        Self {
            settings: ArcSwap::from_pointee(ResolvedSettings::default()),
            initialized: AtomicBool::new(false),
            installed: Mutex::new(None),
            console,
            target: InstallTarget::Global,
        }
    }

    /// Keep the dispatcher in the context instead of installing it globally.
    pub fn scoped(mut self) -> Self {
        self.target = InstallTarget::Scoped;
        self
    }

    pub fn install_target(&self) -> InstallTarget {
        self.target
    }

    /// Snapshot of the current resolved settings.
    pub fn settings(&self) -> Arc<ResolvedSettings> {
        self.settings.load_full()
    }

    /// Replace the resolved settings with `config` and validate them.
    ///
    /// Every field is overwritten; the hostname is kept.
    pub fn apply_config(&self, config: LoggerConfig) -> Result<(), ConfigError> {
        validate(&self.commit(config))
    }

    /// Store `config` as the current settings and return that exact snapshot.
    pub(crate) fn commit(&self, config: LoggerConfig) -> Arc<ResolvedSettings> {
        let hostname = self.settings.load().hostname.clone();
        let settings = Arc::new(ResolvedSettings::from_config(config, hostname));
        self.settings.store(Arc::clone(&settings));
        settings
    }

    pub(crate) fn set_hostname(&self, hostname: String) {
        self.settings.rcu(|current| ResolvedSettings {
            hostname: hostname.clone(),
            ..ResolvedSettings::clone(current)
        });
    }

    /// Whether the JSON logger has been built.
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// The installed dispatcher, if initialization has completed.
    pub fn dispatch(&self) -> Option<Dispatch> {
        self.lock_installed().as_ref().map(|i| i.dispatch.clone())
    }

    /// The synchronized remote writer, if the transport opened.
    pub fn remote_writer(&self) -> Option<Arc<SynchronizedWriter<UdpConnection>>> {
        self.lock_installed().as_ref().and_then(|i| i.remote.clone())
    }

    /// Close the remote transport. A no-op when there is none.
    pub fn shutdown(&self) -> io::Result<()> {
        match self.remote_writer() {
            Some(remote) if !remote.is_closed() => remote.close(),
            _ => Ok(()),
        }
    }

    /// Forget the installed logger and settings so the context can be
    /// initialized again.
    ///
    /// A globally installed dispatcher cannot be removed from tracing; only
    /// the context's own state is cleared.
    pub fn reset(&self) {
        let mut installed = self.lock_installed();
        if let Some(remote) = installed.take().and_then(|i| i.remote) {
            if !remote.is_closed() {
                let _ = remote.close();
            }
        }
        self.settings.store(Arc::new(ResolvedSettings::default()));
        self.initialized.store(false, Ordering::Release);
    }

    pub(crate) fn lock_installed(&self) -> MutexGuard<'_, Option<Installed>> {
        self.installed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{text_subscriber, Capture};

    fn context() -> LoggerContext<Capture> {
        LoggerContext::with_console(Capture::default()).scoped()
    }

    #[test]
    fn test_new_context_is_empty() {
        let ctx = LoggerContext::new();
        assert_eq!(ctx.install_target(), InstallTarget::Global);
        assert!(!ctx.is_initialized());
        assert!(ctx.dispatch().is_none());
        assert!(ctx.remote_writer().is_none());
        assert_eq!(*ctx.settings(), ResolvedSettings::default());
    }

    #[test]
    fn test_apply_config_overwrites_settings() {
        let ctx = context();
        ctx.set_hostname("test-host".into());

        let config = LoggerConfig {
            add_source: false,
            application_name: "test-app".into(),
            log_channel: "TestChannel".into(),
            log_host: "test.example.com".into(),
            log_port: 9999,
            log_type: "test-type".into(),
            message_version: 2,
        };
        ctx.apply_config(config.clone()).unwrap();
        assert_eq!(
            *ctx.settings(),
            ResolvedSettings::from_config(config, "test-host".into())
        );

        // Not additive: a second config replaces every field.
        let second = LoggerConfig {
            log_type: "other".into(),
            log_host: "other.example.com".into(),
            ..LoggerConfig::default()
        };
        ctx.apply_config(second).unwrap();
        let settings = ctx.settings();
        assert_eq!(settings.application_name, "");
        assert_eq!(settings.log_channel, "LagoonLogs");
        assert_eq!(settings.log_port, 5140);
        assert!(settings.add_source);
        assert_eq!(settings.hostname, "test-host");
    }

    #[test]
    fn test_apply_config_returns_validation_error() {
        let ctx = context();
        let capture = Capture::default();

        let result = tracing::subscriber::with_default(text_subscriber(&capture), || {
            ctx.apply_config(LoggerConfig::default())
        });

        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::MissingLogType));
        assert_eq!(err.to_string(), "logType is required");
        assert!(capture.contents().contains("log.host is not supplied"));
        // Settings are committed even when validation fails.
        assert_eq!(ctx.settings().log_type, "");
    }

    #[test]
    fn test_shutdown_without_remote_is_noop() {
        let ctx = context();
        assert!(ctx.shutdown().is_ok());
    }
}
