use std::path::PathBuf;
use thiserror::Error;

pub type TaglessResult<T> = Result<T, TaglessError>;

#[derive(Debug, Error)]
pub enum TaglessError {
    #[error("storage error on {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tag size fields point outside the file. Recovered by hashing the whole file.
    #[error("malformed tag size: music range {startbyte}..{endbyte} does not fit in {filesize} bytes")]
    MalformedTagSize {
        startbyte: u64,
        endbyte: u64,
        filesize: u64,
    },

    #[error("unknown '{name}' algorithm. Available options are: {}", available.join(", "))]
    UnsupportedAlgorithm {
        name: String,
        available: Vec<String>,
    },

    #[error("invalid max bytes value: it should be a positive integer")]
    InvalidMaxBytes,

    #[error("invalid chunk size: it should be a positive integer")]
    InvalidChunkSize,

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TaglessError {
    /// Attach a path to a bare I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TaglessError::Storage {
            path: path.into(),
            source,
        }
    }

    /// Re-tag a path-less `Io` error with the file it came from.
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            TaglessError::Io(source) => TaglessError::storage(path, source),
            other => other,
        }
    }
}
