//! Writer — encodes, compresses, chunks, and sends GELF messages on a UDP
//! socket connected to a collector.

use std::io;
use std::net::{ToSocketAddrs, UdpSocket};
use std::time::{SystemTime, UNIX_EPOCH};

use gelf_core::{chunk, compress, Message};

use crate::config::WriterConfig;
use crate::error::WriteError;

/// Owns a UDP socket connected (in the `connect(2)` sense) to a GELF
/// collector. Safe for concurrent use when the underlying socket is —
/// each `write_message` call is independent, and UDP ordering is already
/// best-effort, so no internal serialization is required.
pub struct Writer {
    socket: UdpSocket,
    config: WriterConfig,
    hostname: String,
}

impl Writer {
    /// Bind an ephemeral local socket and connect it to `remote_addr`.
    pub fn new(remote_addr: impl ToSocketAddrs, config: WriterConfig) -> io::Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.connect(remote_addr)?;
        let hostname = hostname::get()?.to_string_lossy().into_owned();
        Ok(Self {
            socket,
            config,
            hostname,
        })
    }

    /// Encode, compress, chunk, and send `msg`. Returns once every datagram
    /// has been handed to the kernel; any socket error aborts immediately
    /// and is surfaced to the caller — there is no internal retry.
    pub fn write_message(&self, msg: &Message) -> Result<(), WriteError> {
        let mut msg = msg.clone();
        if msg.host.is_empty() {
            msg.host = self.hostname.clone();
        }
        if msg.facility.is_empty() {
            msg.facility = self.config.facility.clone();
        }

        let envelope = msg.encode()?;
        let compressed = compress::compress(
            &envelope,
            self.config.compression_type,
            self.config.compression_level,
        )?;
        let datagrams = chunk::split(&compressed, self.config.max_datagram_size)?;

        for datagram in &datagrams {
            if let Err(e) = self.socket.send(datagram) {
                tracing::warn!(error = %e, "gelf write: socket send failed");
                return Err(WriteError::Io(e));
            }
        }

        tracing::trace!(
            chunks = datagrams.len(),
            envelope_len = compressed.len(),
            "gelf message sent"
        );
        Ok(())
    }

    /// The socket's connected local address, useful for tests and
    /// self-reporting.
    pub fn local_addr(&self) -> io::Result<std::net::SocketAddr> {
        self.socket.local_addr()
    }
}

impl io::Write for Writer {
    /// Byte-sink adapter for generic logging facades: treats `buf` as a
    /// complete log line. Always reports the full input length consumed on
    /// success, matching the contract of a sink that never partially
    /// accepts a line — not the number of bytes actually put on the wire.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        let full = text.trim_end_matches('\n').to_string();
        let short = match full.find('\n') {
            Some(idx) => full[..idx].to_string(),
            None => full.clone(),
        };
        let time_unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();

        let msg = Message {
            short,
            full,
            time_unix,
            ..Message::default()
        };

        self.write_message(&msg)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
