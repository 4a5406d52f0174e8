use crate::*;

#[test]
fn uncompressed_message_round_trips() {
    let (writer, reader) = writer_reader_pair(CompressionType::None);

    let msg = message_with_full("awesomesauce\nbananas");
    writer.write_message(&msg).unwrap();

    let received = reader.read_message().unwrap();
    assert_eq!(received.short, "awesomesauce");
    assert_eq!(received.full, "awesomesauce\nbananas");
    assert!(!received.host.is_empty());
}

#[test]
fn gzip_message_round_trips() {
    let (writer, reader) = writer_reader_pair(CompressionType::Gzip);

    let msg = message_with_full("gzip end to end");
    writer.write_message(&msg).unwrap();

    let received = reader.read_message().unwrap();
    assert_eq!(received.full, "gzip end to end");
}

#[test]
fn zlib_message_round_trips() {
    let (writer, reader) = writer_reader_pair(CompressionType::Zlib);

    let msg = message_with_full("zlib end to end");
    writer.write_message(&msg).unwrap();

    let received = reader.read_message().unwrap();
    assert_eq!(received.full, "zlib end to end");
}

#[test]
fn extra_fields_survive_the_wire() {
    let (writer, reader) = writer_reader_pair(CompressionType::Gzip);

    let mut msg = message_with_full("structured fields");
    msg.extra.insert("_request_id".to_string(), serde_json::json!("abc123"));
    msg.extra.insert("_retries".to_string(), serde_json::json!(2));
    writer.write_message(&msg).unwrap();

    let received = reader.read_message().unwrap();
    assert_eq!(
        received.extra.get("_request_id"),
        Some(&serde_json::json!("abc123"))
    );
    assert_eq!(received.extra.get("_retries"), Some(&serde_json::json!(2.0)));
}

#[test]
fn several_messages_arrive_in_order_on_a_quiet_link() {
    let (writer, reader) = writer_reader_pair(CompressionType::None);

    for i in 0..5 {
        writer
            .write_message(&message_with_full(format!("message {i}")))
            .unwrap();
    }

    for i in 0..5 {
        let received = reader.read_message().unwrap();
        assert_eq!(received.full, format!("message {i}"));
    }
}
