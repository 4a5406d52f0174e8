//! The canonical GELF log record and its JSON envelope encoding.
//!
//! Extras are modelled as `BTreeMap<String, serde_json::Value>` rather than
//! a hand-rolled tagged enum — `serde_json::Value` already is that tagged
//! variant, and reaching for it keeps this module a thin layer over
//! `serde_json` instead of a second copy of it.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

/// Top-level JSON keys that a caller may never supply via `extra` or
/// `raw_extra`. Reserved fields always win over anything extras attempt
/// to set.
const RESERVED_KEYS: &[&str] = &[
    "version",
    "host",
    "short_message",
    "full_message",
    "timestamp",
    "level",
    "facility",
    "_id",
];

/// Default GELF spec version this crate emits.
pub const DEFAULT_VERSION: &str = "1.1";

/// Default syslog severity: informational.
pub const DEFAULT_LEVEL: u8 = 6;

/// Errors raised while building or parsing a GELF envelope.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("extra key {0:?} is reserved or missing the required '_' prefix")]
    InvalidField(String),

    #[error("failed to encode message as JSON: {0}")]
    EncodingError(#[from] serde_json::Error),

    #[error("envelope is not a JSON object")]
    NotAnObject,
}

/// The canonical in-memory GELF log record.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub version: String,
    pub host: String,
    pub short: String,
    pub full: String,
    pub time_unix: f64,
    pub level: u8,
    pub facility: String,
    pub extra: BTreeMap<String, Value>,
    /// Pre-encoded JSON object bytes, merged verbatim alongside `extra`.
    /// Must be empty, or a JSON object (`{...}`) containing no reserved keys.
    pub raw_extra: Vec<u8>,
}

impl Default for Message {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            host: String::new(),
            short: String::new(),
            full: String::new(),
            time_unix: 0.0,
            level: DEFAULT_LEVEL,
            facility: String::new(),
            extra: BTreeMap::new(),
            raw_extra: Vec::new(),
        }
    }
}

impl Message {
    /// Apply invariant 2: derive `short` from the first line of `full` when
    /// `short` is empty. Called just before encoding, not on every mutation.
    fn effective_short(&self) -> &str {
        if !self.short.is_empty() {
            return &self.short;
        }
        match self.full.find('\n') {
            Some(idx) => &self.full[..idx],
            None => &self.full,
        }
    }

    /// Encode the canonical JSON envelope: reserved fields, `raw_extra`
    /// spliced in verbatim, then `extra` — in that order, so that on
    /// decode (where JSON parsers keep the last occurrence of a duplicate
    /// key) `extra` overrides `raw_extra` overrides reserved fields.
    pub fn encode(&self) -> Result<Vec<u8>, MessageError> {
        for key in self.extra.keys() {
            validate_extra_key(key)?;
        }
        validate_raw_extra(&self.raw_extra)?;

        let mut reserved = serde_json::Map::new();
        reserved.insert("version".into(), Value::String(self.version.clone()));
        reserved.insert("host".into(), Value::String(self.host.clone()));
        reserved.insert(
            "short_message".into(),
            Value::String(self.effective_short().to_string()),
        );
        reserved.insert("full_message".into(), Value::String(self.full.clone()));
        reserved.insert(
            "timestamp".into(),
            serde_json::Number::from_f64(self.time_unix)
                .map(Value::Number)
                .unwrap_or(Value::Null),
        );
        reserved.insert("level".into(), Value::Number(self.level.into()));
        reserved.insert("facility".into(), Value::String(self.facility.clone()));

        let body = serde_json::to_string(&Value::Object(reserved))?;
        let mut out = String::with_capacity(body.len() + self.raw_extra.len() + 64);
        // Strip the trailing '}' so siblings can be spliced in.
        out.push_str(&body[..body.len() - 1]);

        if !self.raw_extra.is_empty() {
            let raw = std::str::from_utf8(&self.raw_extra)
                .map_err(|_| MessageError::InvalidField("raw_extra".to_string()))?
                .trim();
            let inner = raw[1..raw.len() - 1].trim();
            if !inner.is_empty() {
                out.push(',');
                out.push_str(inner);
            }
        }

        for (key, value) in &self.extra {
            out.push(',');
            out.push_str(&serde_json::to_string(key)?);
            out.push(':');
            out.push_str(&serde_json::to_string(value)?);
        }
        out.push('}');

        Ok(out.into_bytes())
    }

    /// Decode a JSON envelope back into a `Message`.
    ///
    /// `short_message`/`full_message`/`timestamp` map to `short`/`full`/
    /// `time_unix`. Keys starting with `_`, plus any non-reserved key, are
    /// collected into `extra`, with every number coerced to a float — GELF
    /// collectors unmarshal extras into a dynamically typed map with no
    /// integer/float distinction, so a sender's integer extra and a float
    /// extra of equal value are indistinguishable once decoded.
    /// `raw_extra` is always empty on decode — it is a write-side
    /// performance path, not part of the logical model.
    pub fn decode(bytes: &[u8]) -> Result<Message, MessageError> {
        let value: Value = serde_json::from_slice(bytes)?;
        let map = match value {
            Value::Object(map) => map,
            _ => return Err(MessageError::NotAnObject),
        };
        let mut map = map;

        let mut msg = Message {
            version: take_string(&mut map, "version"),
            host: take_string(&mut map, "host"),
            short: take_string(&mut map, "short_message"),
            full: take_string(&mut map, "full_message"),
            time_unix: map
                .remove("timestamp")
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0),
            level: map
                .remove("level")
                .and_then(|v| v.as_u64())
                .map(|v| v as u8)
                .unwrap_or(DEFAULT_LEVEL),
            facility: take_string(&mut map, "facility"),
            extra: BTreeMap::new(),
            raw_extra: Vec::new(),
        };

        for (key, value) in map {
            msg.extra.insert(key, coerce_numbers_to_f64(value));
        }

        Ok(msg)
    }
}

/// Recursively rewrite every JSON number as a float, mirroring the decode
/// side of a GELF collector that unmarshals extras into a dynamically typed
/// map: such decoders have no integer/float distinction, so an integer
/// extra and a float extra of the same value are indistinguishable once
/// they've crossed the wire. Without this, `10` parsed back by `serde_json`
/// stays an integer-typed `Number` and never compares equal to `10.0`.
fn coerce_numbers_to_f64(value: Value) -> Value {
    match value {
        Value::Number(n) => n
            .as_f64()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Number(n)),
        Value::Array(items) => {
            Value::Array(items.into_iter().map(coerce_numbers_to_f64).collect())
        }
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, coerce_numbers_to_f64(v)))
                .collect(),
        ),
        other => other,
    }
}

fn take_string(map: &mut serde_json::Map<String, Value>, key: &str) -> String {
    map.remove(key)
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

fn validate_extra_key(key: &str) -> Result<(), MessageError> {
    if !key.starts_with('_') || key == "_id" {
        return Err(MessageError::InvalidField(key.to_string()));
    }
    Ok(())
}

/// Shallow structural check for `raw_extra`: must look like a JSON object
/// and must not textually contain a reserved key. No full parse — this is
/// the performance path `raw_extra` exists for.
fn validate_raw_extra(raw: &[u8]) -> Result<(), MessageError> {
    if raw.is_empty() {
        return Ok(());
    }
    let text = std::str::from_utf8(raw)
        .map_err(|_| MessageError::InvalidField("raw_extra".to_string()))?
        .trim();
    if !text.starts_with('{') || !text.ends_with('}') {
        return Err(MessageError::InvalidField("raw_extra".to_string()));
    }
    for key in RESERVED_KEYS {
        let needle = format!("\"{key}\"");
        if text.contains(&needle) {
            return Err(MessageError::InvalidField(key.to_string()));
        }
    }
    Ok(())
}
