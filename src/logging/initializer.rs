//! Logger initialization.
//!
//! # Responsibilities
//! - Record the hostname and the fixed message version
//! - Apply and validate the caller's config
//! - Build the JSON logger exactly once and install it
//!
//! # Design Decisions
//! - First caller wins: later calls still apply and validate their config
//!   but leave the installed logger untouched
//! - A transport that fails to open is logged and dropped; console output
//!   continues on its own
//! - Concurrent first callers block on the setup lock until the winner is done

use std::sync::atomic::Ordering;
use std::sync::Arc;

use tracing::Dispatch;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::JsonFields;
use tracing_subscriber::fmt::MakeWriter;

use crate::config::validation::validate;
use crate::config::{LoggerConfig, ResolvedSettings};
use crate::error::InitError;
use crate::hostname::get_hostname;
use crate::logging::context::{InstallTarget, Installed, LoggerContext};
use crate::logging::format::RecordFormat;
use crate::net::{connect, dual_sink, RemoteSink, SynchronizedWriter};

/// Message format version written as `@version`, whatever the config says.
pub const MESSAGE_VERSION: u32 = 3;

impl<C> LoggerContext<C>
where
    C: for<'a> MakeWriter<'a> + Clone + Send + Sync + 'static,
{
    /// Configure the context and install the dual-sink JSON logger.
    ///
    /// Configuration errors abort before anything is built. The logger itself
    /// is built by the first successful call only.
    pub fn initialize(&self, config: LoggerConfig) -> Result<(), InitError> {
        self.set_hostname(get_hostname());

        let config = LoggerConfig {
            message_version: MESSAGE_VERSION,
            ..config
        };
        // Build from the snapshot that was validated, not whatever a
        // concurrent caller has stored since.
        let settings = self.commit(config);
        validate(&settings)?;

        self.setup_once(&settings);
        Ok(())
    }

    fn setup_once(&self, settings: &ResolvedSettings) {
        if self.initialized.load(Ordering::Acquire) {
            return;
        }

        let mut installed = self.lock_installed();
        if installed.is_some() {
            return;
        }

        let remote = open_remote(settings);
        let dispatch = build_dispatch(settings, dual_sink(self.console.clone(), remote.clone()));

        if self.target == InstallTarget::Global {
            if let Err(e) = tracing::dispatcher::set_global_default(dispatch.clone()) {
                tracing::warn!(error = %e, "A global logger is already installed, keeping it");
            }
        }

        *installed = Some(Installed {
            dispatch,
            remote: remote.writer().cloned(),
        });
        self.initialized.store(true, Ordering::Release);
    }
}

/// Open the remote transport, or leave it out on failure.
fn open_remote(settings: &ResolvedSettings) -> RemoteSink {
    match connect(&settings.log_host, settings.log_port) {
        Ok(conn) => RemoteSink::new(Some(Arc::new(SynchronizedWriter::new(conn)))),
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Failed to connect to UDP endpoint, logging to stdout only"
            );
            RemoteSink::default()
        }
    }
}

/// Build the JSON logger over `writer`.
pub fn build_dispatch<W>(settings: &ResolvedSettings, writer: W) -> Dispatch
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let subscriber = tracing_subscriber::fmt()
        .fmt_fields(JsonFields::new())
        .event_format(RecordFormat::new(settings))
        .with_writer(writer)
        .with_max_level(LevelFilter::DEBUG)
        .finish();

    Dispatch::new(subscriber)
}
