use crate::*;
use gelf::WriteError;
use gelf_core::WireError;

/// Text that resists gzip enough to still span several datagrams after
/// compression — repetition-resistant filler keeps the deflate stream from
/// collapsing it back under one MTU.
fn incompressible_body(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("line-{i}-{:x}-filler", i * 2654435761u32 as usize))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn large_message_reassembles_across_chunks() {
    let (writer, reader) = writer_reader_pair(CompressionType::Gzip);

    let body = format!("awesomesauce\n{}", incompressible_body(4096));
    let msg = message_with_full(body.clone());
    writer.write_message(&msg).unwrap();

    let received = reader.read_message().unwrap();
    assert_eq!(received.full, body);
}

#[test]
fn reader_keeps_working_after_a_large_message() {
    let (writer, reader) = writer_reader_pair(CompressionType::Gzip);

    let big = message_with_full(format!("big\n{}", incompressible_body(2048)));
    writer.write_message(&big).unwrap();
    assert_eq!(reader.read_message().unwrap().full, big.full);

    let small = message_with_full("small after big");
    writer.write_message(&small).unwrap();
    assert_eq!(reader.read_message().unwrap().full, "small after big");
}

#[test]
fn envelope_exceeding_the_chunk_limit_is_rejected_before_sending() {
    let reader = gelf::Reader::new("127.0.0.1:0", gelf::ReaderConfig::default()).unwrap();
    let addr = reader.addr().unwrap();

    let writer = gelf::Writer::new(
        addr,
        WriterConfig {
            compression_type: CompressionType::None,
            max_datagram_size: 20,
            ..WriterConfig::default()
        },
    )
    .unwrap();

    // 128 chunks * (20 - 12 header bytes) is nowhere near enough room for
    // this payload, so splitting it must fail rather than silently truncate.
    let oversized = message_with_full("x".repeat(2_000_000));
    let err = writer.write_message(&oversized).unwrap_err();
    assert!(matches!(
        err,
        WriteError::Wire(WireError::MessageTooLarge { .. })
    ));
}
