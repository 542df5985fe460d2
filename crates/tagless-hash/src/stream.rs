//! Streaming digest over the music payload
//!
//! Reads `[start, end)` in fixed-size chunks and feeds them to a
//! [`ContentHasher`]. No read ever crosses `end`, so memory use is bounded
//! by the chunk size regardless of file size.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use tagless_core::config::DEFAULT_CHUNK_SIZE;
use tagless_core::{TaglessError, TaglessResult};
use tracing::debug;

use crate::boundary::TaggedFile;
use crate::hasher::ContentHasher;
use crate::registry::AlgorithmRegistry;
use crate::source::ByteSource;

/// Tuning knobs for a single hash run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashOptions {
    /// Bytes per read
    pub chunk_size: usize,
    /// Hash at most this many bytes of music
    pub max_bytes: Option<u64>,
}

impl Default for HashOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_bytes: None,
        }
    }
}

impl HashOptions {
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn validate(&self) -> TaglessResult<()> {
        if self.chunk_size == 0 {
            return Err(TaglessError::InvalidChunkSize);
        }
        if self.max_bytes == Some(0) {
            return Err(TaglessError::InvalidMaxBytes);
        }
        Ok(())
    }

    /// Shrink `[start, end)` to honour `max_bytes`.
    fn limit(&self, start: u64, end: u64) -> u64 {
        match self.max_bytes {
            Some(max) => end.min(start.saturating_add(max)),
            None => end,
        }
    }
}

/// Either an algorithm name to look up or a ready hasher
pub enum HasherChoice<'a> {
    Algorithm(&'a str),
    Hasher(Box<dyn ContentHasher>),
}

impl<'a> From<&'a str> for HasherChoice<'a> {
    fn from(name: &'a str) -> Self {
        HasherChoice::Algorithm(name)
    }
}

impl From<Box<dyn ContentHasher>> for HasherChoice<'_> {
    fn from(hasher: Box<dyn ContentHasher>) -> Self {
        HasherChoice::Hasher(hasher)
    }
}

impl HasherChoice<'_> {
    fn into_hasher(self, registry: &AlgorithmRegistry) -> TaglessResult<Box<dyn ContentHasher>> {
        match self {
            HasherChoice::Algorithm(name) => registry.resolve(name),
            HasherChoice::Hasher(hasher) => Ok(hasher),
        }
    }
}

/// Hash exactly the bytes `[start, end)` of `source`.
///
/// A source shorter than `end` is an error, never a silently short digest.
pub fn hash_range<S, H>(
    source: &mut S,
    start: u64,
    end: u64,
    mut hasher: H,
    chunk_size: usize,
) -> TaglessResult<String>
where
    S: ByteSource,
    H: ContentHasher,
{
    if chunk_size == 0 {
        return Err(TaglessError::InvalidChunkSize);
    }
    let size = end.saturating_sub(start);
    debug!(start, end, size, "hashing music range");

    source.seek(SeekFrom::Start(start))?;

    // never allocate more than the range needs
    let mut buf = vec![0u8; usize::try_from(size).map_or(chunk_size, |s| s.min(chunk_size))];
    let mut remaining = size;
    while remaining > 0 {
        let want = usize::try_from(remaining).map_or(chunk_size, |r| r.min(chunk_size));
        source.read_exact(&mut buf[..want])?;
        hasher.update(&buf[..want]);
        remaining -= want as u64;
    }

    Ok(hasher.hexdigest())
}

/// Hash the music payload of `source`, skipping id3v1 and id3v2 tags.
pub fn hash_music<S, H>(source: &mut S, hasher: H) -> TaglessResult<String>
where
    S: ByteSource,
    H: ContentHasher,
{
    hash_music_with(source, hasher, &HashOptions::default())
}

/// [`hash_music`] with explicit options.
pub fn hash_music_with<S, H>(source: &mut S, hasher: H, options: &HashOptions) -> TaglessResult<String>
where
    S: ByteSource,
    H: ContentHasher,
{
    options.validate()?;
    let tagged = TaggedFile::from_source(source)?;
    let (start, end) = tagged.music_limits();
    hash_range(source, start, options.limit(start, end), hasher, options.chunk_size)
}

/// Open `path` and hash its music payload.
///
/// Algorithm names are resolved before the file is opened.
pub fn hash_file<'a>(
    path: &Path,
    hasher: impl Into<HasherChoice<'a>>,
    registry: &AlgorithmRegistry,
) -> TaglessResult<String> {
    hash_file_with(path, hasher, registry, &HashOptions::default())
}

/// [`hash_file`] with explicit options.
pub fn hash_file_with<'a>(
    path: &Path,
    hasher: impl Into<HasherChoice<'a>>,
    registry: &AlgorithmRegistry,
    options: &HashOptions,
) -> TaglessResult<String> {
    let hasher = hasher.into().into_hasher(registry)?;
    options.validate()?;

    let mut file = File::open(path).map_err(|e| TaglessError::storage(path, e))?;
    hash_music_with(&mut file, hasher, options).map_err(|e| e.with_path(path))
}

/// Open `path` and read its tag layout.
pub fn inspect_file(path: &Path) -> TaglessResult<TaggedFile> {
    let mut file = File::open(path).map_err(|e| TaglessError::storage(path, e))?;
    TaggedFile::from_source(&mut file).map_err(|e| TaglessError::storage(path, e))
}
