//! Incremental hashers
//!
//! [`ContentHasher`] is the only thing the streaming digest knows about a
//! hash function. Cryptographic digests, checksums and caller-supplied
//! implementations all plug in through it.

use sha2::Digest;

/// Incremental byte consumer producing a hex digest.
pub trait ContentHasher: Send {
    /// Feed the next run of bytes.
    fn update(&mut self, data: &[u8]);

    /// Digest of everything fed so far, as a lowercase hex string.
    fn hexdigest(&self) -> String;
}

impl<H: ContentHasher + ?Sized> ContentHasher for Box<H> {
    fn update(&mut self, data: &[u8]) {
        (**self).update(data)
    }

    fn hexdigest(&self) -> String {
        (**self).hexdigest()
    }
}

impl<H: ContentHasher + ?Sized> ContentHasher for &mut H {
    fn update(&mut self, data: &[u8]) {
        (**self).update(data)
    }

    fn hexdigest(&self) -> String {
        (**self).hexdigest()
    }
}

/// Adapter for any RustCrypto digest (md-5, sha1, sha2)
#[derive(Debug, Clone, Default)]
pub struct DigestHasher<D>(D);

impl<D: Digest> DigestHasher<D> {
    pub fn new() -> Self {
        Self(D::new())
    }
}

impl<D: Digest + Clone + Send> ContentHasher for DigestHasher<D> {
    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.0, data);
    }

    fn hexdigest(&self) -> String {
        hex::encode(self.0.clone().finalize())
    }
}

/// BLAKE3, 64 hex chars
#[derive(Debug, Clone, Default)]
pub struct Blake3Hasher(blake3::Hasher);

impl Blake3Hasher {
    pub fn new() -> Self {
        Self(blake3::Hasher::new())
    }
}

impl ContentHasher for Blake3Hasher {
    fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    fn hexdigest(&self) -> String {
        self.0.finalize().to_hex().to_string()
    }
}

/// CRC-32 (IEEE) checksum, 8 hex chars
#[derive(Debug, Clone, Default)]
pub struct Crc32Hasher(crc32fast::Hasher);

impl Crc32Hasher {
    pub fn new() -> Self {
        Self(crc32fast::Hasher::new())
    }
}

impl ContentHasher for Crc32Hasher {
    fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    fn hexdigest(&self) -> String {
        format!("{:08x}", self.0.clone().finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_of(mut hasher: impl ContentHasher, data: &[u8]) -> String {
        hasher.update(data);
        hasher.hexdigest()
    }

    #[test]
    fn empty_input_digests() {
        assert_eq!(
            DigestHasher::<sha1::Sha1>::new().hexdigest(),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
        assert_eq!(
            DigestHasher::<md5::Md5>::new().hexdigest(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
        assert_eq!(
            DigestHasher::<sha2::Sha256>::new().hexdigest(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            Blake3Hasher::new().hexdigest(),
            "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
        );
        assert_eq!(Crc32Hasher::new().hexdigest(), "00000000");
    }

    #[test]
    fn known_answers() {
        assert_eq!(
            hex_of(DigestHasher::<sha1::Sha1>::new(), b"abc"),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(
            hex_of(DigestHasher::<md5::Md5>::new(), b"abc"),
            "900150983cd24fb0d6963f7d28e17f72"
        );
        assert_eq!(hex_of(Crc32Hasher::new(), b"123456789"), "cbf43926");
    }

    #[test]
    fn hexdigest_does_not_consume_state() {
        let mut h = DigestHasher::<sha1::Sha1>::new();
        h.update(b"ab");
        let _ = h.hexdigest();
        h.update(b"c");
        assert_eq!(h.hexdigest(), "a9993e364706816aba3e25717850c26c9cd0d89d");
    }

    #[test]
    fn split_updates_match_one_shot() {
        let mut split = Blake3Hasher::new();
        split.update(b"hello ");
        split.update(b"tagless");
        assert_eq!(split.hexdigest(), hex_of(Blake3Hasher::new(), b"hello tagless"));
    }

    #[test]
    fn boxed_hashers_forward() {
        let mut boxed: Box<dyn ContentHasher> = Box::new(Crc32Hasher::new());
        boxed.update(b"123456789");
        assert_eq!(boxed.hexdigest(), "cbf43926");
    }
}
