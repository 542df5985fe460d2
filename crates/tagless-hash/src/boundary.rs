//! Music payload boundaries
//!
//! Combines the id3v2 probe at the start of a file with the id3v1 probe at
//! its end into the half-open byte range `[startbyte, endbyte)` that holds
//! the audio data.

use std::io;

use tagless_core::types::TagReport;
use tagless_core::TaglessError;
use tracing::{debug, warn};

use crate::id3v1::{self, Id3v1Info};
use crate::id3v2::{self, Id3v2Flags, Id3v2Tag};
use crate::source::ByteSource;

/// Tag layout of one file. Holds only derived offsets, never the handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedFile {
    filesize: u64,
    id3v1: Id3v1Info,
    id3v2: Option<Id3v2Tag>,
    startbyte: u64,
    endbyte: u64,
    clamped: bool,
}

/// The subset of [`TaggedFile`] most callers need
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    pub startbyte: u64,
    pub endbyte: u64,
    pub has_id3v1: bool,
    pub has_id3v2: bool,
    pub filesize: u64,
}

impl TaggedFile {
    /// Probe both ends of `source`. The cursor position afterwards is unspecified.
    pub fn from_source<S: ByteSource>(source: &mut S) -> io::Result<Self> {
        let filesize = source.size()?;
        let id3v1 = id3v1::probe(source, filesize)?;
        let id3v2 = id3v2::probe(source, filesize)?;

        let startbyte = id3v2.map_or(0, |tag| tag.total_size());
        let endbyte = filesize - id3v1.trailing_size();

        let (startbyte, endbyte, clamped) = if startbyte > endbyte {
            let err = TaglessError::MalformedTagSize {
                startbyte,
                endbyte,
                filesize,
            };
            warn!(error = %err, "hashing the whole file instead");
            (0, filesize, true)
        } else {
            (startbyte, endbyte, false)
        };

        let tagged = Self {
            filesize,
            id3v1,
            id3v2,
            startbyte,
            endbyte,
            clamped,
        };
        debug!(
            filesize,
            startbyte,
            endbyte,
            id3v1 = tagged.has_id3v1(),
            id3v1_extended = tagged.has_id3v1_extended(),
            id3v2 = ?tagged.id3v2_version(),
            "tag boundaries"
        );
        Ok(tagged)
    }

    pub fn filesize(&self) -> u64 {
        self.filesize
    }

    pub fn has_id3v1(&self) -> bool {
        self.id3v1.present
    }

    pub fn has_id3v1_extended(&self) -> bool {
        self.id3v1.extended
    }

    pub fn has_id3v2(&self) -> bool {
        self.id3v2.is_some()
    }

    pub fn id3v2_version(&self) -> Option<u8> {
        self.id3v2.map(|tag| tag.header.version)
    }

    pub fn id3v2_flags(&self) -> Option<Id3v2Flags> {
        self.id3v2.map(|tag| tag.header.flags)
    }

    pub fn id3v2_extended_header_size(&self) -> Option<u32> {
        self.id3v2.and_then(|tag| tag.extended_header_size)
    }

    pub fn startbyte(&self) -> u64 {
        self.startbyte
    }

    pub fn endbyte(&self) -> u64 {
        self.endbyte
    }

    /// `(startbyte, endbyte)`
    pub fn music_limits(&self) -> (u64, u64) {
        (self.startbyte, self.endbyte)
    }

    pub fn music_size(&self) -> u64 {
        self.endbyte - self.startbyte
    }

    /// True when corrupt size fields forced the whole-file fallback.
    pub fn clamped(&self) -> bool {
        self.clamped
    }

    pub fn boundary(&self) -> Boundary {
        Boundary {
            startbyte: self.startbyte,
            endbyte: self.endbyte,
            has_id3v1: self.has_id3v1(),
            has_id3v2: self.has_id3v2(),
            filesize: self.filesize,
        }
    }

    pub fn report(&self, path: impl Into<String>) -> TagReport {
        TagReport {
            path: path.into(),
            filesize: self.filesize,
            startbyte: self.startbyte,
            endbyte: self.endbyte,
            music_size: self.music_size(),
            has_id3v1: self.has_id3v1(),
            has_id3v1_extended: self.has_id3v1_extended(),
            has_id3v2: self.has_id3v2(),
            id3v2_version: self.id3v2_version(),
            id3v2_flags: self.id3v2_flags().map(Id3v2Flags::bits),
            clamped: self.clamped,
        }
    }
}

/// Locate the music payload in `source`.
pub fn compute_boundary<S: ByteSource>(source: &mut S) -> io::Result<Boundary> {
    Ok(TaggedFile::from_source(source)?.boundary())
}
