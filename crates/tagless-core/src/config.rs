use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{TaglessError, TaglessResult};
use crate::types::OutputFormat;

/// Default read size for the streaming digest (64 KiB)
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Default digest algorithm
pub const DEFAULT_ALGORITHM: &str = "sha1";

/// Top-level configuration (loaded from tagless.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaglessConfig {
    pub hash: HashConfig,
    pub output: OutputConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HashConfig {
    /// Digest algorithm name (default: sha1)
    pub algorithm: String,
    /// Bytes per read while hashing (default: 65536)
    pub chunk_size: usize,
    /// Hash at most this many bytes of music (unset = whole payload)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_bytes: Option<u64>,
    /// Worker thread count when hashing several files (0 = cpu_count)
    pub jobs: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "text" or "json"
    pub format: OutputFormat,
    /// Print only the hash, without the file name
    pub hash_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (default: warn)
    pub level: String,
    /// Log format: "json" or "text"
    pub format: String,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            algorithm: DEFAULT_ALGORITHM.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_bytes: None,
            jobs: 0,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "text".into(),
        }
    }
}

impl TaglessConfig {
    /// Load a config file, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> TaglessResult<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| TaglessError::storage(path, e))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| TaglessError::Config(format!("parsing {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the hashing pipeline cannot run with.
    pub fn validate(&self) -> TaglessResult<()> {
        if self.hash.chunk_size == 0 {
            return Err(TaglessError::InvalidChunkSize);
        }
        if self.hash.max_bytes == Some(0) {
            return Err(TaglessError::InvalidMaxBytes);
        }
        Ok(())
    }
}
