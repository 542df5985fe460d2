//! id3v2 leading tags
//!
//! Layout of the 10-byte header at offset 0:
//! ```text
//! 0..3  "ID3"
//! 3     major version (2, 3 or 4)
//! 4     revision
//! 5     flags  %abcd0000
//! 6..10 tag size, syncsafe, excluding this header
//! ```
//! Flags: a = unsynchronisation, b = extended header (v2.3+),
//! c = experimental, d = footer present (v2.4 only).
//!
//! The size field already covers the extended header, frames and padding.
//! Only the header itself and the optional v2.4 footer sit outside it.

use std::io::{self, SeekFrom};

use crate::source::ByteSource;
use crate::syncsafe;

/// Size of the fixed header
pub const HEADER_SIZE: u64 = 10;

/// Size of the v2.4 footer
pub const FOOTER_SIZE: u64 = 10;

const MARKER: &[u8; 3] = b"ID3";

/// Raw id3v2 header flag byte
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Id3v2Flags(pub u8);

impl Id3v2Flags {
    /// Frames are unsynchronised
    pub const UNSYNCHRONISATION: u8 = 0x80;
    /// An extended header follows the fixed header (v2.3+)
    pub const EXTENDED_HEADER: u8 = 0x40;
    /// Tag is experimental
    pub const EXPERIMENTAL: u8 = 0x20;
    /// A 10-byte footer closes the tag (v2.4)
    pub const FOOTER: u8 = 0x10;

    /// Raw flag byte
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Whether the unsynchronisation bit is set
    pub fn unsynchronisation(self) -> bool {
        self.0 & Self::UNSYNCHRONISATION != 0
    }

    /// Whether the extended header bit is set
    pub fn extended_header(self) -> bool {
        self.0 & Self::EXTENDED_HEADER != 0
    }

    /// Whether the experimental bit is set
    pub fn experimental(self) -> bool {
        self.0 & Self::EXPERIMENTAL != 0
    }

    /// Whether the footer bit is set
    pub fn footer(self) -> bool {
        self.0 & Self::FOOTER != 0
    }
}

/// Parsed fixed header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Id3v2Header {
    pub version: u8,
    pub revision: u8,
    pub flags: Id3v2Flags,
    /// Tag size excluding the header (and footer)
    pub size: u32,
}

impl Id3v2Header {
    /// Parse the first 10 bytes of a file. `None` if there is no `ID3` marker.
    pub fn parse(bytes: &[u8; HEADER_SIZE as usize]) -> Option<Self> {
        if &bytes[..3] != MARKER {
            return None;
        }
        Some(Self {
            version: bytes[3],
            revision: bytes[4],
            flags: Id3v2Flags(bytes[5]),
            size: syncsafe::decode([bytes[6], bytes[7], bytes[8], bytes[9]]),
        })
    }

    /// The extended header flag means something else (compression) in v2.2.
    pub fn has_extended_header(&self) -> bool {
        self.version >= 3 && self.flags.extended_header()
    }

    /// Footers only exist in v2.4.
    pub fn has_footer(&self) -> bool {
        self.version == 4 && self.flags.footer()
    }

    /// Bytes from offset 0 to the first audio byte.
    pub fn total_size(&self) -> u64 {
        let footer = if self.has_footer() { FOOTER_SIZE } else { 0 };
        HEADER_SIZE + u64::from(self.size) + footer
    }
}

/// A leading tag found in a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Id3v2Tag {
    pub header: Id3v2Header,
    /// Full extended header length in bytes, when flagged and readable.
    /// Informational: it is already part of `header.size`.
    pub extended_header_size: Option<u32>,
}

impl Id3v2Tag {
    pub fn total_size(&self) -> u64 {
        self.header.total_size()
    }
}

/// Decode the size field that opens an extended header.
///
/// v2.3 stores a plain big-endian count of the bytes after the field, so the
/// field's own 4 bytes are added back. v2.4 stores a syncsafe count of the
/// whole extended header.
pub fn extended_header_size(version: u8, field: [u8; 4]) -> u32 {
    if version == 3 {
        u32::from_be_bytes(field).saturating_add(4)
    } else {
        syncsafe::decode(field)
    }
}

/// Look for an id3v2 tag at the start of a source of `filesize` bytes.
pub fn probe<S: ByteSource>(source: &mut S, filesize: u64) -> io::Result<Option<Id3v2Tag>> {
    if filesize < HEADER_SIZE {
        return Ok(None);
    }

    let bytes: [u8; HEADER_SIZE as usize] = source.read_array_at(SeekFrom::Start(0))?;
    let Some(header) = Id3v2Header::parse(&bytes) else {
        return Ok(None);
    };

    let extended_header_size = if header.has_extended_header() {
        match source.read_array_at::<4>(SeekFrom::Start(HEADER_SIZE)) {
            Ok(field) => Some(extended_header_size(header.version, field)),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                tracing::debug!("extended header flagged but file ends inside it");
                None
            }
            Err(e) => return Err(e),
        }
    } else {
        None
    };

    Ok(Some(Id3v2Tag {
        header,
        extended_header_size,
    }))
}
