//! XXH3 hash kernel (feature = `"xxhash"`).
//!
//! A drop-in alternative to FNV for long keys. XXH3 mixes both halves of its
//! 64-bit digest thoroughly, which suits the `(lower, upper)` split used by
//! double hashing.
//!
//! # Examples
//!
//! ```
//! # #[cfg(feature = "xxhash")]
//! # {
//! use bloomcount::hash::{BloomHasher, XxHasher};
//! use bloomcount::CountingBloomFilter;
//!
//! let mut filter = CountingBloomFilter::with_hasher(1000, 4, 0.01, XxHasher::new()).unwrap();
//! filter.add(b"hello");
//! assert!(filter.test(b"hello"));
//! # }
//! ```

#![allow(clippy::module_name_repetitions)]

use super::hasher::BloomHasher;

use xxhash_rust::xxh3::{xxh3_64, xxh3_64_with_seed};

/// XXH3-64 kernel wrapping the `xxhash-rust` crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct XxHasher {
    seed: u64,
}

impl XxHasher {
    /// Unseeded XXH3.
    #[must_use]
    pub const fn new() -> Self {
        Self { seed: 0 }
    }

    /// XXH3 with an explicit seed. Different seeds give independent families.
    #[must_use]
    pub const fn with_seed(seed: u64) -> Self {
        Self { seed }
    }
}

impl BloomHasher for XxHasher {
    #[inline]
    fn hash_bytes(&self, bytes: &[u8]) -> u64 {
        if self.seed == 0 {
            xxh3_64(bytes)
        } else {
            xxh3_64_with_seed(bytes, self.seed)
        }
    }

    fn name(&self) -> &'static str {
        "XXH3"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_crate() {
        let hasher = XxHasher::new();
        assert_eq!(hasher.hash_bytes(b"hello"), xxh3_64(b"hello"));
        assert_eq!(
            XxHasher::with_seed(9).hash_bytes(b"hello"),
            xxh3_64_with_seed(b"hello", 9)
        );
    }

    #[test]
    fn test_seeds_differ() {
        assert_ne!(
            XxHasher::with_seed(1).hash_bytes(b"test"),
            XxHasher::with_seed(2).hash_bytes(b"test")
        );
    }

    #[test]
    fn test_kernel_split() {
        let hasher = XxHasher::new();
        let digest = hasher.hash_bytes(b"split");
        assert_eq!(
            hasher.hash_kernel(b"split"),
            (digest as u32, (digest >> 32) as u32)
        );
    }

    #[test]
    fn test_name() {
        assert_eq!(XxHasher::new().name(), "XXH3");
    }
}
