//! Decompressor + decoder: turns a reassembled (or single-datagram)
//! envelope back into a `Message`.

use gelf_core::{compress::decompress_auto, message::MessageError, wire::WireError, Message};

/// Errors from the decode path: either the payload had no recognizable
/// compression/JSON magic, or the decompressed bytes weren't valid GELF JSON.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Wire(#[from] WireError),

    #[error(transparent)]
    Message(#[from] MessageError),
}

/// Decompress `payload` (auto-detecting gzip/zlib/identity) and parse the
/// resulting JSON envelope into a `Message`.
pub fn decode(payload: &[u8]) -> Result<Message, DecodeError> {
    let json = decompress_auto(payload)?;
    Message::decode(&json).map_err(DecodeError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gelf_core::compress::{compress, CompressionLevel, CompressionType};

    #[test]
    fn decodes_gzip_envelope() {
        let mut msg = Message::default();
        msg.full = "hello\nworld".to_string();
        let json = msg.encode().unwrap();
        let compressed = compress(&json, CompressionType::Gzip, CompressionLevel::DefaultCompression).unwrap();

        let decoded = decode(&compressed).unwrap();
        assert_eq!(decoded.short, "hello");
        assert_eq!(decoded.full, "hello\nworld");
    }

    #[test]
    fn unknown_format_surfaces_as_wire_error() {
        let err = decode(b"garbage").unwrap_err();
        assert!(matches!(err, DecodeError::Wire(WireError::UnknownFormat)));
    }
}
