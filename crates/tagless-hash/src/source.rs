//! Random-access byte storage the parser and the digest read from

use std::io::{self, Read, Seek, SeekFrom};

/// A seekable byte source of known length.
///
/// Implemented for every `Read + Seek`, so files and in-memory cursors work
/// without wrapping.
pub trait ByteSource: Read + Seek {
    /// Total length in bytes. Leaves the cursor at the start.
    fn size(&mut self) -> io::Result<u64> {
        let len = self.seek(SeekFrom::End(0))?;
        self.rewind()?;
        Ok(len)
    }

    /// Read exactly `N` bytes starting at `offset`.
    fn read_array_at<const N: usize>(&mut self, offset: SeekFrom) -> io::Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.seek(offset)?;
        self.read_exact(&mut buf)?;
        Ok(buf)
    }
}

impl<T: Read + Seek + ?Sized> ByteSource for T {}
