//! Datagram-size-aware splitter: turns a compressed envelope into either a
//! single datagram or a burst of GELF chunks.

use rand::RngCore;

use crate::wire::{ChunkHeader, WireError, CHUNK_HEADER_LEN, MAX_CHUNK_COUNT};

/// Split `envelope` into the datagrams that should be written to the wire.
///
/// If `envelope` fits within `max_datagram_size`, a single datagram
/// containing it verbatim is returned. Otherwise the envelope is split into
/// `ceil(len / (max_datagram_size - 12))` chunks, each prefixed with a
/// 12-byte header sharing one randomly generated message id.
///
/// Fails with `MessageTooLarge` if the envelope would need more than
/// `MAX_CHUNK_COUNT` chunks — the sequence count field is one byte.
pub fn split(envelope: &[u8], max_datagram_size: usize) -> Result<Vec<Vec<u8>>, WireError> {
    if envelope.len() <= max_datagram_size {
        return Ok(vec![envelope.to_vec()]);
    }

    let chunk_payload = max_datagram_size.saturating_sub(CHUNK_HEADER_LEN).max(1);
    let count = envelope.len().div_ceil(chunk_payload);
    if count > MAX_CHUNK_COUNT {
        return Err(WireError::MessageTooLarge { needed: count });
    }

    let mut message_id = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut message_id);

    let mut datagrams = Vec::with_capacity(count);
    for (sequence, fragment) in envelope.chunks(chunk_payload).enumerate() {
        let header = ChunkHeader {
            message_id,
            sequence: sequence as u8,
            count: count as u8,
        };
        let mut datagram = Vec::with_capacity(CHUNK_HEADER_LEN + fragment.len());
        header.encode_to(&mut datagram);
        datagram.extend_from_slice(fragment);
        datagrams.push(datagram);
    }

    Ok(datagrams)
}
