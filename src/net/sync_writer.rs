//! Serialized access to the remote transport.
//!
//! Log records are produced from any thread. A datagram socket handle is not
//! meant to be shared by uncoordinated writers, so every write and the final
//! close go through one mutex.

use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::net::connection::UdpConnection;

/// Wraps one transport; each `write` and `close` holds the same lock.
#[derive(Debug)]
pub struct SynchronizedWriter<T = UdpConnection> {
    /// `None` once closed.
    conn: Mutex<Option<T>>,
}

impl<T: io::Write> SynchronizedWriter<T> {
    pub fn new(conn: T) -> Self {
        Self {
            conn: Mutex::new(Some(conn)),
        }
    }

    /// Forward one write to the transport while holding the lock.
    pub fn write(&self, buf: &[u8]) -> io::Result<usize> {
        match self.lock().as_mut() {
            Some(conn) => conn.write(buf),
            None => Err(closed()),
        }
    }

    /// Drop the transport while holding the lock.
    ///
    /// Later writes and a second close fail with `NotConnected`.
    pub fn close(&self) -> io::Result<()> {
        match self.lock().take() {
            Some(mut conn) => {
                let flushed = conn.flush();
                drop(conn);
                flushed
            }
            None => Err(closed()),
        }
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.lock().is_none()
    }

    fn lock(&self) -> MutexGuard<'_, Option<T>> {
        // The guarded value is a socket handle; a panic elsewhere leaves it usable.
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: io::Write> io::Write for &SynchronizedWriter<T> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        SynchronizedWriter::write(*self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.lock().as_mut() {
            Some(conn) => conn.flush(),
            None => Err(closed()),
        }
    }
}

fn closed() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "use of closed network connection")
}
