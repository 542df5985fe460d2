//! id3v1 trailing tags
//!
//! A standard tag is exactly 128 bytes at the end of the file and starts with
//! `TAG`. The extended ("enhanced") tag is 227 bytes placed right before the
//! standard one and starts with `TAG+`. It never appears on its own.

use std::io::{self, SeekFrom};

use crate::source::ByteSource;

/// Size of a standard id3v1 tag
pub const SIZE: u64 = 128;

/// Size of the extended block preceding the standard tag
pub const EXTENDED_SIZE: u64 = 227;

const MARKER: &[u8; 3] = b"TAG";
const EXTENDED_MARKER: &[u8; 4] = b"TAG+";

/// What was found at the end of the file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Id3v1Info {
    pub present: bool,
    pub extended: bool,
}

impl Id3v1Info {
    /// Bytes occupied by trailing tags: 0, 128 or 355.
    pub fn trailing_size(&self) -> u64 {
        match (self.present, self.extended) {
            (false, _) => 0,
            (true, false) => SIZE,
            (true, true) => SIZE + EXTENDED_SIZE,
        }
    }
}

/// Look for id3v1 tags at the end of a source of `filesize` bytes.
pub fn probe<S: ByteSource>(source: &mut S, filesize: u64) -> io::Result<Id3v1Info> {
    if filesize < SIZE {
        return Ok(Id3v1Info::default());
    }

    let marker: [u8; 3] = source.read_array_at(SeekFrom::Start(filesize - SIZE))?;
    if &marker != MARKER {
        return Ok(Id3v1Info::default());
    }

    let extended = if filesize >= SIZE + EXTENDED_SIZE {
        let marker: [u8; 4] =
            source.read_array_at(SeekFrom::Start(filesize - SIZE - EXTENDED_SIZE))?;
        &marker == EXTENDED_MARKER
    } else {
        false
    };

    Ok(Id3v1Info {
        present: true,
        extended,
    })
}
