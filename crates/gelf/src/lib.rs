//! High-level GELF client/server: a `Writer` and `Reader` pair built on top
//! of the wire codec in `gelf-core`, plus the ambient stack (config, errors,
//! caller resolution) a host process needs around them.

pub mod caller;
pub mod config;
pub mod decode;
pub mod error;
pub mod reader;
pub mod reassembler;
pub mod writer;

pub use caller::CallerResolver;
pub use config::{GelfConfig, ReaderConfig, WriterConfig};
pub use decode::{decode, DecodeError};
pub use error::{ReadError, WriteError};
pub use reader::Reader;
pub use reassembler::{Offer, Reassembler};
pub use writer::Writer;

pub use gelf_core::{
    chunk, compress, wire, CompressionLevel, CompressionType, Message, MessageError, WireError,
};
