//! Reassembly table: buffers partial multi-chunk GELF messages keyed by
//! message id, tolerating out-of-order arrival and bounding total in-flight
//! state the way an adversarial sender could otherwise exhaust it.
//!
//! Modelled after the teacher crate's `FileReassembler` — a keyed map of
//! in-progress assemblies, a timeout-based sweep, and a cap on concurrent
//! entries — generalized from file chunks to GELF chunks.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use gelf_core::wire::ChunkHeader;
use gelf_core::WireError;

/// Default age after which an incomplete message is evicted.
pub const DEFAULT_REASSEMBLY_TIMEOUT: Duration = Duration::from_secs(5);

/// Default cap on concurrent partial messages.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 128;

/// Outcome of offering one datagram to the reassembler.
#[derive(Debug)]
pub enum Offer {
    /// The datagram did not carry the chunk magic; hand it to the decoder directly.
    NotAChunk,
    /// The chunk was buffered; the message is still incomplete.
    Buffered,
    /// This was the last missing chunk; the reassembled envelope follows.
    Complete(Vec<u8>),
}

struct Entry {
    count: u8,
    fragments: HashMap<u8, Vec<u8>>,
    first_seen_at: Instant,
}

/// Keyed buffer for in-flight multi-chunk GELF messages.
///
/// Safe to share across threads (backed by `DashMap`), though the Reader
/// contract only ever drives it from the single thread calling
/// `ReadMessage`.
pub struct Reassembler {
    entries: DashMap<[u8; 8], Entry>,
    order: Mutex<VecDeque<[u8; 8]>>,
    timeout: Duration,
    max_in_flight: usize,
}

impl Default for Reassembler {
    fn default() -> Self {
        Self::new(DEFAULT_REASSEMBLY_TIMEOUT, DEFAULT_MAX_IN_FLIGHT)
    }
}

impl Reassembler {
    pub fn new(timeout: Duration, max_in_flight: usize) -> Self {
        Self {
            entries: DashMap::new(),
            order: Mutex::new(VecDeque::new()),
            timeout,
            max_in_flight,
        }
    }

    /// Offer one received datagram. See `Offer` for the possible outcomes.
    pub fn offer(&self, datagram: &[u8]) -> Result<Offer, WireError> {
        let header = match ChunkHeader::parse(datagram) {
            Some(header) => header,
            None => return Ok(Offer::NotAChunk),
        };

        if header.count == 0 || header.sequence >= header.count {
            return Err(WireError::MalformedChunk {
                sequence: header.sequence,
                count: header.count,
            });
        }

        self.sweep_expired();

        let payload = &datagram[gelf_core::wire::CHUNK_HEADER_LEN..];
        let is_new = !self.entries.contains_key(&header.message_id);

        {
            let mut entry = self.entries.entry(header.message_id).or_insert_with(|| Entry {
                count: header.count,
                fragments: HashMap::new(),
                first_seen_at: Instant::now(),
            });

            if entry.count != header.count {
                tracing::warn!(
                    message_id = ?header.message_id,
                    declared = entry.count,
                    got = header.count,
                    "chunk count mismatch, discarding chunk"
                );
                return Ok(Offer::Buffered);
            }

            if entry.fragments.contains_key(&header.sequence) {
                tracing::trace!(
                    message_id = ?header.message_id,
                    sequence = header.sequence,
                    "duplicate chunk, discarding"
                );
                return Ok(Offer::Buffered);
            }

            entry.fragments.insert(header.sequence, payload.to_vec());
        }

        if is_new {
            let mut order = self.order.lock().unwrap();
            order.push_back(header.message_id);
            self.evict_oldest_if_over_capacity(&mut order);
        }

        self.try_complete(&header.message_id, header.count)
    }

    fn try_complete(&self, message_id: &[u8; 8], count: u8) -> Result<Offer, WireError> {
        let complete = self
            .entries
            .get(message_id)
            .map(|entry| entry.fragments.len() == count as usize)
            .unwrap_or(false);

        if !complete {
            return Ok(Offer::Buffered);
        }

        let (_, entry) = self.entries.remove(message_id).expect("entry present");
        {
            let mut order = self.order.lock().unwrap();
            order.retain(|id| id != message_id);
        }

        let mut payload = Vec::new();
        for sequence in 0..count {
            match entry.fragments.get(&sequence) {
                Some(fragment) => payload.extend_from_slice(fragment),
                None => unreachable!("fragment count matched but a sequence is missing"),
            }
        }

        Ok(Offer::Complete(payload))
    }

    fn evict_oldest_if_over_capacity(&self, order: &mut VecDeque<[u8; 8]>) {
        while order.len() > self.max_in_flight {
            if let Some(oldest) = order.pop_front() {
                if let Some((_, entry)) = self.entries.remove(&oldest) {
                    tracing::debug!(
                        message_id = ?oldest,
                        fragments_received = entry.fragments.len(),
                        declared_count = entry.count,
                        "evicted oldest in-flight message, too many concurrent partials"
                    );
                }
            }
        }
    }

    /// Remove entries older than the reassembly timeout. Called on every
    /// `offer`, amortizing the sweep instead of requiring a background task.
    fn sweep_expired(&self) {
        let timeout = self.timeout;
        let expired: Vec<[u8; 8]> = self
            .entries
            .iter()
            .filter(|e| e.first_seen_at.elapsed() > timeout)
            .map(|e| *e.key())
            .collect();

        for id in expired {
            if let Some((_, entry)) = self.entries.remove(&id) {
                tracing::debug!(
                    message_id = ?id,
                    fragments_received = entry.fragments.len(),
                    declared_count = entry.count,
                    "reassembly timed out, discarding incomplete message"
                );
            }
            let mut order = self.order.lock().unwrap();
            order.retain(|oid| *oid != id);
        }
    }
}
