//! Transport-facing error types — what a Writer/Reader caller actually sees.
//!
//! Codec-level errors (`MessageError`, `WireError`) come from `gelf-core`;
//! this module adds the socket-layer errors around them, following the
//! teacher crate's convention of one `thiserror`-derived enum per component
//! rather than a single catch-all or a boxed `dyn Error`.

use gelf_core::{MessageError, WireError};
use thiserror::Error;

/// Errors a `Writer` can return from `write_message`/`write`.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error(transparent)]
    Message(#[from] MessageError),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("I/O failure during compression or send: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors a `Reader` can surface as the terminal result of `read_message`.
///
/// Per-datagram problems (`MalformedChunk`, `UnknownFormat`, decode
/// failures) are logged and skipped inside `read_message`, never returned —
/// only socket-level failures end the read loop.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("socket closed while receiving")]
    SocketClosed,

    #[error("socket receive failed: {0}")]
    Socket(#[source] std::io::Error),
}
