//! tagless-hash: audio content hashing that ignores id3 metadata
//!
//! # Overview
//! - `boundary`: locate the music payload between leading and trailing tags
//! - `id3v1` / `id3v2` / `syncsafe`: the binary tag layouts
//! - `hasher` / `registry`: pluggable digest algorithms
//! - `stream`: bounded-chunk digest over the payload

pub mod boundary;
pub mod hasher;
pub mod id3v1;
pub mod id3v2;
pub mod registry;
pub mod source;
pub mod stream;
pub mod syncsafe;

// Convenience re-exports for the most common operations
pub use boundary::{compute_boundary, Boundary, TaggedFile};
pub use hasher::{Blake3Hasher, ContentHasher, Crc32Hasher, DigestHasher};
pub use registry::AlgorithmRegistry;
pub use source::ByteSource;
pub use stream::{
    hash_file, hash_file_with, hash_music, hash_music_with, hash_range, inspect_file,
    HashOptions, HasherChoice,
};
