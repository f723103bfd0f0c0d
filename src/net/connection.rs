//! Datagram transport to the remote log collector.
//!
//! # Responsibilities
//! - Resolve `host:port` (empty host means localhost)
//! - Bind a local socket of the matching address family
//! - Connect it so plain `send` reaches the collector

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};

use crate::error::TransportError;

/// Host used when no log host is configured.
pub const DEFAULT_HOST: &str = "localhost";

/// A connected UDP socket. Each `write` sends one datagram.
#[derive(Debug)]
pub struct UdpConnection {
    socket: UdpSocket,
}

impl UdpConnection {
    /// Local address the socket is bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Collector address the socket is connected to.
    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.socket.peer_addr()
    }
}

impl io::Write for UdpConnection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.socket.send(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Open a datagram connection to `host:port`.
///
/// Resolution and socket setup fail independently; both surface as a
/// [`TransportError`].
pub fn connect(host: &str, port: u16) -> Result<UdpConnection, TransportError> {
    let host = if host.is_empty() { DEFAULT_HOST } else { host };
    let address = format!("{host}:{port}");

    let remote = resolve(&address).inspect_err(|e| {
        tracing::error!(address = %address, error = %e, "Failed to resolve udp address");
    })?;

    let socket = open(remote).inspect_err(|e| {
        tracing::error!(remote = %remote, error = %e, "Failed to dial udp");
    })?;

    tracing::debug!(remote = %remote, "UDP log transport connected");

    Ok(UdpConnection { socket })
}

fn resolve(address: &str) -> Result<SocketAddr, TransportError> {
    address
        .to_socket_addrs()
        .map_err(|source| TransportError::Resolve {
            address: address.to_owned(),
            source,
        })?
        .next()
        .ok_or_else(|| TransportError::NoAddress(address.to_owned()))
}

/// Bind a socket of the same family as `remote` and connect it.
fn open(remote: SocketAddr) -> Result<UdpSocket, TransportError> {
    let local: SocketAddr = if remote.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };

    let socket = UdpSocket::bind(local).map_err(|source| TransportError::Open {
        address: remote,
        source,
    })?;
    socket.connect(remote).map_err(|source| TransportError::Open {
        address: remote,
        source,
    })?;
    Ok(socket)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{text_subscriber, Capture};
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn test_invalid_address() {
        let capture = Capture::default();
        let err = tracing::subscriber::with_default(text_subscriber(&capture), || {
            connect("invalid-address-format:::", 5140).unwrap_err()
        });
        assert!(matches!(err, TransportError::Resolve { .. }));
        assert!(capture.contents().contains("Failed to resolve udp address"));
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_dial_failure() {
        // Resolves without DNS; connecting to limited broadcast without
        // SO_BROADCAST is refused by the kernel.
        let capture = Capture::default();
        let err = tracing::subscriber::with_default(text_subscriber(&capture), || {
            connect("255.255.255.255", 5140).unwrap_err()
        });
        match err {
            TransportError::Open { address, .. } => {
                assert_eq!(address, "255.255.255.255:5140".parse().unwrap());
            }
            other => panic!("expected open failure, got {other}"),
        }
        assert!(err_logged(&capture, "Failed to dial udp"));
        assert!(!err_logged(&capture, "Failed to resolve udp address"));
    }

    #[test]
    fn test_connect_and_send() {
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        receiver
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let port = receiver.local_addr().unwrap().port();

        let mut conn = connect("127.0.0.1", port).unwrap();
        assert_eq!(conn.peer_addr().unwrap(), receiver.local_addr().unwrap());
        assert!(conn.local_addr().is_ok());

        conn.write_all(b"hello collector").unwrap();

        let mut buf = [0u8; 64];
        let (n, _) = receiver.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"hello collector");
    }

    #[test]
    fn test_empty_host_uses_localhost() {
        // "localhost" may resolve to ::1 on hosts without IPv6 sockets, so
        // the dial itself may fail; either way the target is localhost.
        match connect("", 5140) {
            Ok(conn) => assert!(conn.peer_addr().unwrap().ip().is_loopback()),
            Err(TransportError::Open { address, .. }) => {
                assert!(address.ip().is_loopback());
                assert_eq!(address.port(), 5140);
            }
            Err(TransportError::Resolve { address, .. })
            | Err(TransportError::NoAddress(address)) => {
                assert_eq!(address, "localhost:5140");
            }
        }
    }

    fn err_logged(capture: &Capture, message: &str) -> bool {
        capture
            .contents()
            .lines()
            .any(|line| line.contains("ERROR") && line.contains(message))
    }
}
