//! Hash kernel trait and the FNV implementations.
//!
//! A filter hashes each element exactly once per operation. The 64-bit digest
//! is split into two 32-bit halves, `lower` and `upper`, and every one of the
//! k bucket indices is derived from that pair (see [`super::strategies`]).
//!
//! # Separation of Concerns
//!
//! - **`BloomHasher`**: bytes → 64-bit digest → `(lower, upper)`
//! - **`HashStrategy`**: `(lower, upper)` → k bucket indices
//! - **Filters**: compose hasher + strategy + bucket storage
//!
//! # Examples
//!
//! ```
//! use bloomcount::hash::{BloomHasher, FnvHasher};
//!
//! let hasher = FnvHasher::new();
//! let digest = hasher.hash_bytes(b"hello");
//! let (lower, upper) = hasher.hash_kernel(b"hello");
//! assert_eq!(u64::from(lower) | (u64::from(upper) << 32), digest);
//! ```

#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Source of 64-bit digests for a filter.
///
/// # Requirements
///
/// - **Determinism**: identical bytes give identical digests for the life of
///   the process. Nothing else is required for correctness.
/// - **Dispersion**: good bit mixing in both 32-bit halves keeps the observed
///   false positive rate close to the configured one.
pub trait BloomHasher: Send + Sync {
    /// Hash arbitrary bytes to a 64-bit digest.
    fn hash_bytes(&self, bytes: &[u8]) -> u64;

    /// Human-readable name used in logs and stats.
    fn name(&self) -> &'static str;

    /// Hash once and split the digest into `(lower, upper)` 32-bit halves.
    ///
    /// `lower` is the low 32 bits of the digest and `upper` the high 32 bits,
    /// i.e. bytes 4..8 and 0..4 of its big-endian encoding.
    #[inline]
    fn hash_kernel(&self, bytes: &[u8]) -> (u32, u32) {
        split_digest(self.hash_bytes(bytes))
    }
}

/// Split a digest into `(lower, upper)` 32-bit halves.
///
/// # Examples
///
/// ```
/// use bloomcount::hash::hasher::split_digest;
///
/// assert_eq!(split_digest(0x0123_4567_89ab_cdef), (0x89ab_cdef, 0x0123_4567));
/// ```
#[inline]
#[must_use]
pub const fn split_digest(digest: u64) -> (u32, u32) {
    (digest as u32, (digest >> 32) as u32)
}

/// 64-bit FNV-1: multiply by the prime, then XOR each byte.
///
/// This is the default kernel. It is cheap for the short keys filters usually
/// see and fully deterministic across runs and platforms.
///
/// An optional seed is mixed in ahead of the data, giving independent hash
/// families; seed `0` yields plain FNV-1.
///
/// # Examples
///
/// ```
/// use bloomcount::hash::{BloomHasher, FnvHasher};
///
/// let hasher = FnvHasher::new();
/// assert_eq!(hasher.hash_bytes(b""), 0xcbf2_9ce4_8422_2325);
/// assert_ne!(FnvHasher::with_seed(7).hash_bytes(b"x"), hasher.hash_bytes(b"x"));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FnvHasher {
    seed: u64,
}

impl FnvHasher {
    /// Plain, unseeded FNV-1.
    #[must_use]
    pub const fn new() -> Self {
        Self { seed: 0 }
    }

    /// FNV-1 with `seed` folded in before the data.
    #[must_use]
    pub const fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    /// The configured seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    fn fold(mut state: u64, bytes: &[u8]) -> u64 {
        for &byte in bytes {
            state = state.wrapping_mul(FNV_PRIME);
            state ^= u64::from(byte);
        }
        state
    }
}

impl BloomHasher for FnvHasher {
    #[inline]
    fn hash_bytes(&self, bytes: &[u8]) -> u64 {
        let mut state = FNV_OFFSET_BASIS;
        if self.seed != 0 {
            state = Self::fold(state, &self.seed.to_le_bytes());
        }
        Self::fold(state, bytes)
    }

    fn name(&self) -> &'static str {
        "FNV-1"
    }
}

/// 64-bit FNV-1a: XOR each byte, then multiply by the prime.
///
/// Slightly better avalanche on the final byte than FNV-1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fnv1aHasher {
    seed: u64,
}

impl Fnv1aHasher {
    /// Plain, unseeded FNV-1a.
    #[must_use]
    pub const fn new() -> Self {
        Self { seed: 0 }
    }

    /// FNV-1a with `seed` folded in before the data.
    #[must_use]
    pub const fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    #[inline]
    fn fold(mut state: u64, bytes: &[u8]) -> u64 {
        for &byte in bytes {
            state ^= u64::from(byte);
            state = state.wrapping_mul(FNV_PRIME);
        }
        state
    }
}

impl BloomHasher for Fnv1aHasher {
    #[inline]
    fn hash_bytes(&self, bytes: &[u8]) -> u64 {
        let mut state = FNV_OFFSET_BASIS;
        if self.seed != 0 {
            state = Self::fold(state, &self.seed.to_le_bytes());
        }
        Self::fold(state, bytes)
    }

    fn name(&self) -> &'static str {
        "FNV-1a"
    }
}
