//! UDP backend for a network-attached strip controller
//!
//! Each datagram is a run of 4-byte entries:
//!
//! ```text
//! |i|r|g|b|
//! ```
//!
//! where `i` is the zero-based pixel index (0-255) and `r`, `g`, `b` are the
//! corrected channel values. Datagrams carry no header and are independent
//! of each other; a lost datagram is repaired by the next update that still
//! sees the pixel as changed.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};

use heapless::Vec as FixedVec;
use tracing::{debug, trace};

use super::{BackendKind, check_pixel_count};
use crate::OutputBackend;
use crate::error::{ConfigError, DeviceError};
use crate::frame::CorrectedFrame;

/// Bytes per pixel entry
pub const ENTRY_LEN: usize = 4;

/// Maximum pixel entries in one datagram
pub const MAX_PIXELS_PER_DATAGRAM: usize = 126;

/// Maximum datagram payload size
pub const MAX_DATAGRAM_LEN: usize = ENTRY_LEN * MAX_PIXELS_PER_DATAGRAM;

/// Highest pixel count the 1-byte index field can address
pub const MAX_ADDRESSABLE_PIXELS: usize = 256;

/// One encoded datagram payload
pub type Datagram = FixedVec<u8, MAX_DATAGRAM_LEN>;

const _: () = assert!(MAX_DATAGRAM_LEN >= ENTRY_LEN * MAX_PIXELS_PER_DATAGRAM);

/// Iterator over the datagrams for a set of changed pixels
///
/// Produces full datagrams first and the remainder last.
pub struct Datagrams<'a> {
    frame: &'a CorrectedFrame,
    chunks: core::slice::Chunks<'a, usize>,
}

impl Iterator for Datagrams<'_> {
    type Item = Datagram;

    #[allow(clippy::cast_possible_truncation)]
    fn next(&mut self) -> Option<Datagram> {
        let chunk = self.chunks.next()?;
        let mut datagram = Datagram::new();
        for &index in chunk {
            let color = self.frame.pixel(index);
            let pushed = datagram.extend_from_slice(&[index as u8, color.r, color.g, color.b]);
            debug_assert!(pushed.is_ok(), "datagram holds {MAX_PIXELS_PER_DATAGRAM} entries");
        }
        Some(datagram)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for Datagrams<'_> {}

/// Split a change set into runs of at most [`MAX_PIXELS_PER_DATAGRAM`]
///
/// Full runs come first and the remainder last; an empty set yields no run.
pub fn split_changed(changed: &[usize]) -> core::slice::Chunks<'_, usize> {
    changed.chunks(MAX_PIXELS_PER_DATAGRAM)
}

/// Split changed pixels into datagrams
///
/// Fails if any index does not fit the 1-byte index field. `changed` must be
/// ascending, as produced by [`diff_into`](crate::diff::diff_into).
pub fn encode_datagrams<'a>(
    frame: &'a CorrectedFrame,
    changed: &'a [usize],
) -> Result<Datagrams<'a>, DeviceError> {
    if let Some(&index) = changed.iter().max() {
        if index >= MAX_ADDRESSABLE_PIXELS {
            return Err(DeviceError::IndexOverflow { index });
        }
    }
    Ok(Datagrams {
        frame,
        chunks: split_changed(changed),
    })
}

/// Backend that sends changed pixels to a UDP endpoint
#[derive(Debug)]
pub struct NetworkBackend {
    socket: UdpSocket,
    target: SocketAddr,
}

impl NetworkBackend {
    /// Bind an ephemeral local socket for sending to `target`
    pub fn connect(target: SocketAddr) -> std::io::Result<Self> {
        let local: SocketAddr = if target.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local)?;
        Ok(Self::from_socket(socket, target))
    }

    /// Resolve `host:port` and bind a socket for it
    pub fn resolve(host: &str, port: u16) -> Result<Self, ConfigError> {
        let unresolved = |source| ConfigError::Address {
            target: format!("{host}:{port}"),
            source,
        };
        let target = (host, port)
            .to_socket_addrs()
            .map_err(unresolved)?
            .next()
            .ok_or_else(|| {
                unresolved(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no addresses found",
                ))
            })?;
        debug!(%target, "sending frames over udp");
        Ok(Self::connect(target)?)
    }

    /// Use an already bound socket
    pub const fn from_socket(socket: UdpSocket, target: SocketAddr) -> Self {
        Self { socket, target }
    }

    pub const fn target(&self) -> SocketAddr {
        self.target
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

impl OutputBackend for NetworkBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Esp8266
    }

    fn resize(&mut self, pixel_count: usize) -> Result<(), ConfigError> {
        check_pixel_count(self.kind(), pixel_count, MAX_ADDRESSABLE_PIXELS)
    }

    fn transmit(&mut self, frame: &CorrectedFrame, changed: &[usize]) -> Result<(), DeviceError> {
        for datagram in encode_datagrams(frame, changed)? {
            trace!(len = datagram.len(), target = %self.target, "sending datagram");
            self.socket.send_to(&datagram, self.target)?;
        }
        Ok(())
    }
}
