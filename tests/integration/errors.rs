use crate::*;
use gelf::WriteError;
use gelf_core::MessageError;

#[test]
fn writer_rejects_an_unprefixed_extra_key_before_sending_anything() {
    let (writer, reader) = writer_reader_pair(CompressionType::None);

    let mut msg = message_with_full("should never arrive");
    msg.extra.insert("bad_key".to_string(), serde_json::json!(1));

    let err = writer.write_message(&msg).unwrap_err();
    assert!(matches!(err, WriteError::Message(MessageError::InvalidField(_))));

    // Confirm nothing was put on the wire: a follow-up good message is the
    // first thing the reader ever sees.
    writer
        .write_message(&message_with_full("the real message"))
        .unwrap();
    let received = reader.read_message().unwrap();
    assert_eq!(received.full, "the real message");
}

#[test]
fn writer_rejects_the_id_extra_key() {
    let (writer, _reader) = writer_reader_pair(CompressionType::None);

    let mut msg = message_with_full("id collision");
    msg.extra.insert("_id".to_string(), serde_json::json!("not allowed"));

    let err = writer.write_message(&msg).unwrap_err();
    assert!(matches!(err, WriteError::Message(MessageError::InvalidField(_))));
}
