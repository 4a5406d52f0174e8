//! GELF wire format — chunk header layout and envelope magic bytes.
//!
//! These constants and the `ChunkHeader` layout ARE the protocol. Changing
//! them breaks interoperability with any other GELF collector or chunker.
//!
//! Unlike a fixed-size binary struct, a GELF chunk header has no internal
//! padding concerns (it's 12 raw bytes, hand-packed), so there is no
//! `#[repr(C, packed)]` type here — `ChunkHeader` is an in-memory
//! convenience value that `encode`/`decode` translate to/from the wire.

use thiserror::Error;

/// Two-byte magic identifying a GELF chunk datagram.
pub const CHUNK_MAGIC: [u8; 2] = [0x1e, 0x0f];

/// Size of a chunk header: magic (2) + message id (8) + sequence (1) + count (1).
pub const CHUNK_HEADER_LEN: usize = 12;

/// Maximum number of chunks a single message may be split into.
/// Bounds the one-byte sequence count field.
pub const MAX_CHUNK_COUNT: usize = 128;

/// Conservative default datagram size: Ethernet MTU minus IP/UDP headers.
pub const DEFAULT_MAX_DATAGRAM_SIZE: usize = 1420;

/// Magic bytes for gzip-compressed payloads (RFC 1952).
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// First byte of a zlib-compressed payload (RFC 1950, CMF byte for a 32K window).
pub const ZLIB_MAGIC_BYTE: u8 = 0x78;

/// First byte of an uncompressed JSON object.
pub const JSON_MAGIC_BYTE: u8 = b'{';

/// Parsed representation of a chunk's 12-byte header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub message_id: [u8; 8],
    pub sequence: u8,
    pub count: u8,
}

impl ChunkHeader {
    /// Write this header's wire bytes (magic + id + sequence + count) to `out`.
    pub fn encode_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&CHUNK_MAGIC);
        out.extend_from_slice(&self.message_id);
        out.push(self.sequence);
        out.push(self.count);
    }

    /// Parse a header from the front of a datagram.
    ///
    /// Returns `None` if the datagram is too short or the magic doesn't match —
    /// callers treat that as "not a chunk, try direct decode", not an error.
    pub fn parse(datagram: &[u8]) -> Option<Self> {
        if datagram.len() < CHUNK_HEADER_LEN {
            return None;
        }
        if datagram[0..2] != CHUNK_MAGIC {
            return None;
        }
        let mut message_id = [0u8; 8];
        message_id.copy_from_slice(&datagram[2..10]);
        Some(Self {
            message_id,
            sequence: datagram[10],
            count: datagram[11],
        })
    }
}

/// Errors arising from chunk-header and format validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("sequence {sequence} out of range for count {count}")]
    MalformedChunk { sequence: u8, count: u8 },

    #[error("compressed envelope requires {needed} chunks, exceeding the {MAX_CHUNK_COUNT} limit")]
    MessageTooLarge { needed: usize },

    #[error("reassembled payload has no recognizable format magic")]
    UnknownFormat,
}
