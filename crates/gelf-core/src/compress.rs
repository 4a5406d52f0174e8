//! Payload compression — gzip, zlib, or identity framing at a chosen level.
//!
//! Stateless per call: there is no compressor object to construct, just a
//! function of `(bytes, type, level)`, matching the spec's description of
//! the Compressor as a pure transform with no retained state.

use std::io::{Read, Write};

use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;

use serde::{Deserialize, Serialize};

use crate::wire::{WireError, GZIP_MAGIC, JSON_MAGIC_BYTE, ZLIB_MAGIC_BYTE};

/// Compression framing applied to the JSON envelope before it goes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionType {
    Gzip,
    Zlib,
    None,
}

impl Default for CompressionType {
    fn default() -> Self {
        CompressionType::Gzip
    }
}

/// DEFLATE-family compression level. Mirrors the conventional zlib levels
/// rather than exposing the raw 0-9 integer, so a caller can't pass an
/// out-of-range value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionLevel {
    NoCompression,
    BestSpeed,
    DefaultCompression,
    BestCompression,
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::DefaultCompression
    }
}

impl From<CompressionLevel> for Compression {
    fn from(level: CompressionLevel) -> Self {
        match level {
            CompressionLevel::NoCompression => Compression::none(),
            CompressionLevel::BestSpeed => Compression::fast(),
            CompressionLevel::DefaultCompression => Compression::default(),
            CompressionLevel::BestCompression => Compression::best(),
        }
    }
}

/// Compress `data` per `kind` at `level`. `CompressionType::None` returns
/// `data` unchanged.
pub fn compress(
    data: &[u8],
    kind: CompressionType,
    level: CompressionLevel,
) -> std::io::Result<Vec<u8>> {
    match kind {
        CompressionType::None => Ok(data.to_vec()),
        CompressionType::Gzip => {
            let mut encoder = GzEncoder::new(Vec::new(), level.into());
            encoder.write_all(data)?;
            encoder.finish()
        }
        CompressionType::Zlib => {
            let mut encoder = ZlibEncoder::new(Vec::new(), level.into());
            encoder.write_all(data)?;
            encoder.finish()
        }
    }
}

/// Detect the compression format of a reassembled payload by its leading
/// bytes, then decompress it. Uncompressed JSON is returned unchanged.
pub fn decompress_auto(payload: &[u8]) -> Result<Vec<u8>, WireError> {
    if payload.starts_with(&GZIP_MAGIC) {
        let mut out = Vec::new();
        GzDecoder::new(payload)
            .read_to_end(&mut out)
            .map_err(|_| WireError::UnknownFormat)?;
        Ok(out)
    } else if payload.first() == Some(&ZLIB_MAGIC_BYTE) {
        let mut out = Vec::new();
        ZlibDecoder::new(payload)
            .read_to_end(&mut out)
            .map_err(|_| WireError::UnknownFormat)?;
        Ok(out)
    } else if payload.first() == Some(&JSON_MAGIC_BYTE) {
        Ok(payload.to_vec())
    } else {
        Err(WireError::UnknownFormat)
    }
}
