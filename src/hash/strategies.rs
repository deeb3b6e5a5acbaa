//! Index derivation from the two 32-bit kernel halves.
//!
//! # Double Hashing (Kirsch & Mitzenmacher 2006)
//!
//! ```text
//! gᵢ(x) = (lower(x) + i·upper(x)) mod m,   i ∈ [0, k)
//! ```
//!
//! One hash evaluation yields all k indices and keeps the asymptotic false
//! positive rate of k independent hash functions. Arithmetic is done in 64
//! bits: with `i < 2³²`, `lower + upper·i` never exceeds `2⁶⁴ - 2³²`.
//!
//! # References
//!
//! - Kirsch, A., & Mitzenmacher, M. (2006). "Less Hashing, Same Performance: Building a Better Bloom Filter"

#![allow(clippy::cast_possible_truncation)]

/// Derives bucket indices from a `(lower, upper)` kernel pair.
///
/// # Examples
///
/// ```
/// use bloomcount::hash::{DoubleHashing, HashStrategy};
///
/// let indices = DoubleHashing.indices(12345, 67890, 7, 1000);
/// assert_eq!(indices.len(), 7);
/// assert!(indices.iter().all(|&idx| idx < 1000));
/// ```
pub trait HashStrategy: Send + Sync {
    /// Index for hash round `round`, in `[0, m)`.
    ///
    /// # Panics
    ///
    /// May panic if `m == 0`.
    fn index(&self, lower: u32, upper: u32, round: usize, m: usize) -> usize;

    /// Human-readable name for logs and stats.
    fn name(&self) -> &'static str;

    /// Write the indices for rounds `0..out.len()` into `out`.
    #[inline]
    fn fill_indices(&self, lower: u32, upper: u32, m: usize, out: &mut [usize]) {
        for (round, slot) in out.iter_mut().enumerate() {
            *slot = self.index(lower, upper, round, m);
        }
    }

    /// Allocate and return the k indices.
    #[must_use]
    fn indices(&self, lower: u32, upper: u32, k: usize, m: usize) -> Vec<usize> {
        let mut out = vec![0; k];
        self.fill_indices(lower, upper, m, &mut out);
        out
    }
}

/// Standard double hashing: `(lower + upper·i) mod m`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DoubleHashing;

impl HashStrategy for DoubleHashing {
    #[inline]
    fn index(&self, lower: u32, upper: u32, round: usize, m: usize) -> usize {
        let hash = u64::from(lower).wrapping_add(u64::from(upper).wrapping_mul(round as u64));
        (hash % m as u64) as usize
    }

    fn name(&self) -> &'static str {
        "DoubleHashing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_round_is_lower() {
        assert_eq!(DoubleHashing.index(17, 999, 0, 100), 17);
        assert_eq!(DoubleHashing.index(1234, 999, 0, 100), 34);
    }

    #[test]
    fn test_formula() {
        let (lower, upper, m) = (10u32, 7u32, 50usize);
        for round in 0..10 {
            let expected = (10 + 7 * round) % 50;
            assert_eq!(DoubleHashing.index(lower, upper, round, m), expected);
        }
    }

    #[test]
    fn test_no_wrap_with_max_halves() {
        // u32::MAX + u32::MAX * 31 fits comfortably in u64
        let m = 1_000_003usize;
        let expected = ((u64::from(u32::MAX) * 32) % m as u64) as usize;
        assert_eq!(DoubleHashing.index(u32::MAX, u32::MAX, 31, m), expected);

        let last_round = u32::MAX as usize - 1;
        let top = u64::from(u32::MAX) + u64::from(u32::MAX) * last_round as u64;
        assert_eq!(
            DoubleHashing.index(u32::MAX, u32::MAX, last_round, m),
            (top % m as u64) as usize
        );
    }

    #[test]
    fn test_fill_matches_index() {
        let mut out = [0usize; 9];
        DoubleHashing.fill_indices(0xdead_beef, 0x1234_5678, 9586, &mut out);
        for (round, &idx) in out.iter().enumerate() {
            assert_eq!(idx, DoubleHashing.index(0xdead_beef, 0x1234_5678, round, 9586));
            assert!(idx < 9586);
        }
        assert_eq!(
            DoubleHashing.indices(0xdead_beef, 0x1234_5678, 9, 9586),
            out.to_vec()
        );
    }

    #[test]
    fn test_single_bucket() {
        assert!(DoubleHashing.indices(5, 9, 4, 1).iter().all(|&idx| idx == 0));
    }

    #[test]
    fn test_name() {
        assert_eq!(DoubleHashing.name(), "DoubleHashing");
    }
}
