//! gelf-core — wire format, message model, and compression for GELF over UDP.
//!
//! This crate has no knowledge of sockets; it is the pure codec that
//! `gelf`'s Writer and Reader build on.

pub mod chunk;
pub mod compress;
pub mod message;
pub mod wire;

pub use compress::{compress, decompress_auto, CompressionLevel, CompressionType};
pub use message::{Message, MessageError};
pub use wire::{ChunkHeader, WireError};
