//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ResolvedSettings (log_host, log_port)
//!     → connection.rs (resolve, bind, connect UDP)
//!     → sync_writer.rs (one lock around write/close)
//!     → sink.rs (console + optional remote fan-out)
//!     → handed to the JSON formatter as its writer
//! ```
//!
//! # Design Decisions
//! - Fire and forget: no acknowledgement, retry, or buffering
//! - One datagram per record
//! - A transport that fails to open is left out, not retried

pub mod connection;
pub mod sink;
pub mod sync_writer;

pub use connection::{connect, UdpConnection};
pub use sink::{dual_sink, DualSink, RemoteSink};
pub use sync_writer::SynchronizedWriter;
