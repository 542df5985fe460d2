use serde::{Deserialize, Serialize};

/// How per-file results are rendered on stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `<hash> <file name>` per line
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Result of hashing one file's music payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashRecord {
    pub path: String,
    pub algorithm: String,
    pub hash: String,
}

/// Tag layout of one file, as reported by `tagless info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagReport {
    pub path: String,
    pub filesize: u64,
    pub startbyte: u64,
    pub endbyte: u64,
    pub music_size: u64,
    pub has_id3v1: bool,
    pub has_id3v1_extended: bool,
    pub has_id3v2: bool,
    pub id3v2_version: Option<u8>,
    pub id3v2_flags: Option<u8>,
    pub clamped: bool,
}
