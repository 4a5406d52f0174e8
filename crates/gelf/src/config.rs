//! Configuration for Writer/Reader, resolved environment → file → defaults.
//!
//! Mirrors the teacher crate's `SummitConfig` resolution order and env-var
//! naming convention, adapted to this crate's two endpoints. This layer is
//! a convenience for host processes; it never changes what goes on the
//! wire — a caller that doesn't want file/env resolution can build a
//! `WriterConfig`/`ReaderConfig` directly.

use std::path::PathBuf;
use std::time::Duration;

use gelf_core::{CompressionLevel, CompressionType};
use serde::{Deserialize, Serialize};

use crate::reassembler::{DEFAULT_MAX_IN_FLIGHT, DEFAULT_REASSEMBLY_TIMEOUT};

/// Aggregate configuration for a GELF endpoint process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GelfConfig {
    pub writer: WriterConfig,
    pub reader: ReaderConfig,
}

impl Default for GelfConfig {
    fn default() -> Self {
        Self {
            writer: WriterConfig::default(),
            reader: ReaderConfig::default(),
        }
    }
}

/// Writer-side settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    pub compression_type: CompressionType,
    pub compression_level: CompressionLevel,
    pub facility: String,
    pub max_datagram_size: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression_type: CompressionType::default(),
            compression_level: CompressionLevel::default(),
            facility: String::new(),
            max_datagram_size: gelf_core::wire::DEFAULT_MAX_DATAGRAM_SIZE,
        }
    }
}

/// Reader-side settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    #[serde(with = "duration_secs")]
    pub reassembly_timeout: Duration,
    pub max_in_flight_messages: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            reassembly_timeout: DEFAULT_REASSEMBLY_TIMEOUT,
            max_in_flight_messages: DEFAULT_MAX_IN_FLIGHT,
        }
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(d)?;
        Ok(Duration::from_secs(secs))
    }
}

/// Errors loading or writing a `GelfConfig` file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    ReadFailed(PathBuf, std::io::Error),
    #[error("failed to parse {0}: {1}")]
    ParseFailed(PathBuf, toml::de::Error),
    #[error("failed to write {0}: {1}")]
    WriteFailed(PathBuf, std::io::Error),
    #[error("failed to serialize: {0}")]
    SerializeFailed(toml::ser::Error),
}

impl GelfConfig {
    /// Load config: env vars → file at `path` (if it exists) → defaults.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let text = std::fs::read_to_string(path)
                .map_err(|e| ConfigError::ReadFailed(path.to_path_buf(), e))?;
            toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(path.to_path_buf(), e))?
        } else {
            GelfConfig::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Write `self` to `path` as TOML.
    pub fn write(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteFailed(path.to_path_buf(), e))?;
        }
        let text = toml::to_string_pretty(self).map_err(ConfigError::SerializeFailed)?;
        std::fs::write(path, text).map_err(|e| ConfigError::WriteFailed(path.to_path_buf(), e))
    }

    /// Apply `GELF_<SECTION>__<FIELD>` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("GELF_WRITER__FACILITY") {
            self.writer.facility = v;
        }
        if let Ok(v) = std::env::var("GELF_WRITER__MAX_DATAGRAM_SIZE") {
            if let Ok(n) = v.parse() {
                self.writer.max_datagram_size = n;
            }
        }
        if let Ok(v) = std::env::var("GELF_READER__MAX_IN_FLIGHT_MESSAGES") {
            if let Ok(n) = v.parse() {
                self.reader.max_in_flight_messages = n;
            }
        }
        if let Ok(v) = std::env::var("GELF_READER__REASSEMBLY_TIMEOUT_SECS") {
            if let Ok(secs) = v.parse() {
                self.reader.reassembly_timeout = Duration::from_secs(secs);
            }
        }
    }
}
