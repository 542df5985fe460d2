//! Syncsafe integers
//!
//! id3v2 stores sizes as 4 big-endian bytes carrying 7 significant bits each,
//! so a size field can never contain an MPEG frame sync pattern. The decoded
//! value is therefore at most 2^28 - 1 (256 MiB).

/// Largest value a 4-byte syncsafe integer can hold
pub const MAX: u32 = (1 << 28) - 1;

/// Decode a 4-byte syncsafe integer.
///
/// The high bit of every byte is masked off, so a tag writer that got the
/// encoding wrong yields a smaller size instead of a huge one.
pub fn decode(bytes: [u8; 4]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |acc, &b| (acc << 7) | u32::from(b & 0x7F))
}

/// Encode `value` as a 4-byte syncsafe integer. Bits above 28 are dropped.
pub fn encode(value: u32) -> [u8; 4] {
    [
        ((value >> 21) & 0x7F) as u8,
        ((value >> 14) & 0x7F) as u8,
        ((value >> 7) & 0x7F) as u8,
        (value & 0x7F) as u8,
    ]
}
