use crate::*;
use gelf_core::chunk;
use std::net::UdpSocket;

fn raw_sender() -> UdpSocket {
    UdpSocket::bind("127.0.0.1:0").unwrap()
}

#[test]
fn out_of_order_chunks_still_reassemble() {
    let reader = gelf::Reader::new("127.0.0.1:0", gelf::ReaderConfig::default()).unwrap();
    let addr = reader.addr().unwrap();
    let sender = raw_sender();

    let msg = message_with_full(format!("out of order\n{}", "a".repeat(6000)));
    let envelope = msg.encode().unwrap();
    let compressed = gelf_core::compress::compress(
        &envelope,
        CompressionType::None,
        CompressionLevel::DefaultCompression,
    )
    .unwrap();
    let mut datagrams = chunk::split(&compressed, 1420).unwrap();
    assert!(datagrams.len() > 1, "test payload must actually chunk");
    datagrams.reverse();

    for datagram in &datagrams {
        sender.send_to(datagram, addr).unwrap();
    }

    let received = reader.read_message().unwrap();
    assert_eq!(received.full, msg.full);
}

#[test]
fn retransmitted_duplicate_chunk_does_not_block_completion() {
    let reader = gelf::Reader::new("127.0.0.1:0", gelf::ReaderConfig::default()).unwrap();
    let addr = reader.addr().unwrap();
    let sender = raw_sender();

    let msg = message_with_full(format!("duplicate\n{}", "b".repeat(6000)));
    let envelope = msg.encode().unwrap();
    let compressed = gelf_core::compress::compress(
        &envelope,
        CompressionType::None,
        CompressionLevel::DefaultCompression,
    )
    .unwrap();
    let datagrams = chunk::split(&compressed, 1420).unwrap();
    assert!(datagrams.len() > 1);

    sender.send_to(&datagrams[0], addr).unwrap();
    sender.send_to(&datagrams[0], addr).unwrap(); // retransmit
    for datagram in &datagrams[1..] {
        sender.send_to(datagram, addr).unwrap();
    }

    let received = reader.read_message().unwrap();
    assert_eq!(received.full, msg.full);
}

#[test]
fn garbage_datagram_is_skipped_without_ending_the_read_loop() {
    let reader = gelf::Reader::new("127.0.0.1:0", gelf::ReaderConfig::default()).unwrap();
    let addr = reader.addr().unwrap();
    let sender = raw_sender();

    sender.send_to(b"not gelf at all", addr).unwrap();

    let writer = gelf::Writer::new(addr, WriterConfig::default()).unwrap();
    writer
        .write_message(&message_with_full("still alive"))
        .unwrap();

    let received = reader.read_message().unwrap();
    assert_eq!(received.full, "still alive");
}
