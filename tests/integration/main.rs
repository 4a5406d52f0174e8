//! End-to-end tests driving real loopback UDP sockets between a `Writer`
//! and a `Reader`, exercising the wire protocol the way two separate
//! processes would see it rather than calling the codec functions directly.

use gelf::{GelfConfig, Reader, ReaderConfig, Writer, WriterConfig};
use gelf_core::{CompressionLevel, CompressionType, Message};

mod chunking;
mod errors;
mod reassembly;
mod round_trip;

/// Bind a `Reader` on an OS-assigned loopback port and a `Writer` connected
/// to it, using the given writer-side compression settings.
fn writer_reader_pair(compression_type: CompressionType) -> (Writer, Reader) {
    let reader = Reader::new("127.0.0.1:0", ReaderConfig::default()).expect("bind reader");
    let addr = reader.addr().expect("reader addr");

    let writer_config = WriterConfig {
        compression_type,
        compression_level: CompressionLevel::DefaultCompression,
        ..WriterConfig::default()
    };
    let writer = Writer::new(addr, writer_config).expect("connect writer");

    (writer, reader)
}

fn message_with_full(full: impl Into<String>) -> Message {
    Message {
        full: full.into(),
        ..Message::default()
    }
}

/// Sanity check that the defaults a host process would actually load line
/// up with what `writer_reader_pair` assumes.
#[test]
fn default_config_matches_writer_reader_defaults() {
    let config = GelfConfig::default();
    assert_eq!(config.writer.compression_type, CompressionType::Gzip);
    assert_eq!(config.writer.max_datagram_size, WriterConfig::default().max_datagram_size);
    assert_eq!(
        config.reader.max_in_flight_messages,
        ReaderConfig::default().max_in_flight_messages
    );
}
