//! Fan-out of formatted records to the console and the remote collector.

use std::sync::Arc;

use tracing_subscriber::fmt::writer::{MakeWriterExt, OptionalWriter, Tee};
use tracing_subscriber::fmt::MakeWriter;

use crate::net::connection::UdpConnection;
use crate::net::sync_writer::SynchronizedWriter;

/// The remote half of the fan-out. Absent when the transport failed to open.
#[derive(Debug, Clone, Default)]
pub struct RemoteSink {
    writer: Option<Arc<SynchronizedWriter<UdpConnection>>>,
}

impl RemoteSink {
    pub fn new(writer: Option<Arc<SynchronizedWriter<UdpConnection>>>) -> Self {
        Self { writer }
    }

    pub fn is_present(&self) -> bool {
        self.writer.is_some()
    }

    pub fn writer(&self) -> Option<&Arc<SynchronizedWriter<UdpConnection>>> {
        self.writer.as_ref()
    }
}

impl<'a> MakeWriter<'a> for RemoteSink {
    type Writer = OptionalWriter<&'a SynchronizedWriter<UdpConnection>>;

    fn make_writer(&'a self) -> Self::Writer {
        self.writer.as_deref().into()
    }
}

/// Console first, then the remote sink if there is one.
pub type DualSink<C> = Tee<C, RemoteSink>;

/// Compose the console writer with an optional remote sink.
pub fn dual_sink<C>(console: C, remote: RemoteSink) -> DualSink<C>
where
    C: for<'a> MakeWriter<'a>,
{
    console.and(remote)
}
