//! Structured logging subsystem.
//!
//! # Data Flow
//! ```text
//! LoggerContext::initialize(config)
//!     → hostname + fixed message version
//!     → apply_config (resolve, validate)          ── error: abort, nothing installed
//!     → first call only:
//!         → net::connect (UDP)                    ── error: warn, console only
//!         → SynchronizedWriter + dual sink
//!         → format.rs (RecordFormat: renames, default fields)
//!         → Dispatch installed (global or scoped)
//!
//! tracing::info!(..) anywhere
//!     → RecordFormat → one JSON line
//!     → stdout + UDP datagram
//! ```
//!
//! # Design Decisions
//! - Debug and above pass; nothing is filtered by level beyond that
//! - Default fields are captured when the logger is built
//! - The remote sink is optional, never a placeholder writer

pub mod context;
pub mod format;
pub mod initializer;

pub use context::{InstallTarget, LoggerContext};
pub use format::{default_fields, replace_attr, Attr, RecordFormat};
pub use initializer::{build_dispatch, MESSAGE_VERSION};
