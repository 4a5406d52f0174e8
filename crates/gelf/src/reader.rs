//! Reader — owns a UDP socket, dispatches datagrams to the reassembler or
//! directly to the decoder, and yields complete `Message`s to callers.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use gelf_core::Message;

use crate::config::ReaderConfig;
use crate::decode;
use crate::error::ReadError;
use crate::reassembler::{Offer, Reassembler};

/// Largest datagram this Reader will accept off the wire.
const RECV_BUFFER_SIZE: usize = 65536;

/// Binds a UDP socket and reassembles/decodes the GELF messages arriving
/// on it. `ReadMessage` blocks the calling thread; per-datagram failures
/// (malformed chunks, unrecognized formats, JSON decode errors) are logged
/// and skipped rather than ending the read loop.
pub struct Reader {
    socket: UdpSocket,
    reassembler: Reassembler,
    pending: Vec<u8>,
}

impl Reader {
    /// Bind `bind_addr` (port 0 is permitted — the OS assigns one).
    pub fn new(bind_addr: impl ToSocketAddrs, config: ReaderConfig) -> io::Result<Self> {
        let socket = UdpSocket::bind(bind_addr)?;
        Ok(Self {
            socket,
            reassembler: Reassembler::new(config.reassembly_timeout, config.max_in_flight_messages),
            pending: Vec::new(),
        })
    }

    /// The address this Reader is bound to.
    pub fn addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Block until a complete `Message` is available.
    pub fn read_message(&self) -> Result<Message, ReadError> {
        let mut buf = vec![0u8; RECV_BUFFER_SIZE];
        loop {
            let len = self
                .socket
                .recv(&mut buf)
                .map_err(classify_recv_error)?;
            let datagram = &buf[..len];

            let payload = match self.reassembler.offer(datagram) {
                Ok(Offer::NotAChunk) => datagram,
                Ok(Offer::Buffered) => continue,
                Ok(Offer::Complete(ref reassembled)) => reassembled.as_slice(),
                Err(e) => {
                    tracing::warn!(error = %e, "gelf read: malformed chunk, dropping");
                    continue;
                }
            };

            match decode::decode(payload) {
                Ok(msg) => return Ok(msg),
                Err(e) => {
                    tracing::warn!(error = %e, "gelf read: dropping undecodable datagram");
                    continue;
                }
            }
        }
    }
}

impl io::Read for Reader {
    /// Byte-sink adapter for a generic reader: each call returns bytes of
    /// `short` (falling back to `full` when `short` is empty) from the next
    /// complete message, buffering any remainder for subsequent calls when
    /// `buf` is smaller than the message text.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pending.is_empty() {
            let msg = self
                .read_message()
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            let text = if !msg.short.is_empty() { msg.short } else { msg.full };
            self.pending = text.into_bytes();
        }

        let n = buf.len().min(self.pending.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.drain(..n);
        Ok(n)
    }
}

/// `recv`/`recv_from` on a socket that was closed concurrently surfaces as
/// `EBADF` on Unix. This is the best portable signal std gives us that the
/// Reader was cancelled via socket close rather than hitting a transient
/// I/O error.
///
/// Either way this is terminal for the `Reader`, so it's logged at `error`
/// here before the caller ever sees it.
fn classify_recv_error(e: io::Error) -> ReadError {
    if e.raw_os_error() == Some(9) {
        tracing::error!("gelf read: socket closed");
        ReadError::SocketClosed
    } else {
        tracing::error!(error = %e, "gelf read: socket receive failed");
        ReadError::Socket(e)
    }
}
