//! Digest algorithms selectable by name

use std::collections::BTreeMap;

use tagless_core::{TaglessError, TaglessResult};

use crate::hasher::{Blake3Hasher, ContentHasher, Crc32Hasher, DigestHasher};

/// Builds a fresh hasher
pub type HasherFactory = fn() -> Box<dyn ContentHasher>;

/// Name → hasher factory table. Constructed explicitly and passed around.
#[derive(Debug, Clone, Default)]
pub struct AlgorithmRegistry {
    algorithms: BTreeMap<String, HasherFactory>,
}

impl AlgorithmRegistry {
    /// A registry with nothing in it.
    pub fn empty() -> Self {
        Self::default()
    }

    /// md5, the sha1/sha2 family, blake3 and crc32.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register("md5", || Box::new(DigestHasher::<md5::Md5>::new()));
        registry.register("sha1", || Box::new(DigestHasher::<sha1::Sha1>::new()));
        registry.register("sha224", || Box::new(DigestHasher::<sha2::Sha224>::new()));
        registry.register("sha256", || Box::new(DigestHasher::<sha2::Sha256>::new()));
        registry.register("sha384", || Box::new(DigestHasher::<sha2::Sha384>::new()));
        registry.register("sha512", || Box::new(DigestHasher::<sha2::Sha512>::new()));
        registry.register("blake3", || Box::new(Blake3Hasher::new()));
        registry.register("crc32", || Box::new(Crc32Hasher::new()));
        registry
    }

    /// Add or replace an algorithm. Names are matched case-insensitively.
    pub fn register(&mut self, name: &str, factory: HasherFactory) {
        self.algorithms.insert(name.to_ascii_lowercase(), factory);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.algorithms.contains_key(&name.to_ascii_lowercase())
    }

    /// A fresh hasher for `name`.
    pub fn resolve(&self, name: &str) -> TaglessResult<Box<dyn ContentHasher>> {
        self.algorithms
            .get(&name.to_ascii_lowercase())
            .map(|factory| factory())
            .ok_or_else(|| TaglessError::UnsupportedAlgorithm {
                name: name.to_string(),
                available: self.names().into_iter().map(String::from).collect(),
            })
    }

    /// Supported names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.algorithms.keys().map(String::as_str).collect()
    }
}
