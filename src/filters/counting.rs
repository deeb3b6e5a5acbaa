//! Counting Bloom filter with removal support.
//!
//! Each position of a classic Bloom filter is widened from one bit to a small
//! `b`-bit saturating counter (a *bucket*), which makes removal possible:
//!
//! - Add: increment k buckets
//! - Remove: decrement k buckets, but only if all k are non-zero
//! - Test: all k buckets non-zero
//!
//! # Trade-offs
//!
//! | Aspect          | Classic Bloom      | Counting Bloom                      |
//! |-----------------|--------------------|-------------------------------------|
//! | Add / Test      | O(k)               | O(k)                                |
//! | Remove          | Not supported      | O(k)                                |
//! | Space           | 1 bit per position | `b` bits per position (default 4)   |
//! | False negatives | Never              | Possible after removals/saturation  |
//!
//! # Index Derivation
//!
//! Every operation hashes the element once. The 64-bit digest is split into
//! `(lower, upper)` and round `i` uses bucket `(lower + upper·i) mod m`.
//!
//! # Saturation
//!
//! A bucket at `2^b - 1` ignores further increments. Removing an element that
//! touches a saturated bucket then under-counts it, so later removals of other
//! elements may produce false negatives. [`CountingBloomFilter::saturation_events`]
//! reports how often that happened; the first event per filter lifetime is
//! logged at `warn` level.
//!
//! # Examples
//!
//! ```
//! use bloomcount::CountingBloomFilter;
//!
//! let mut filter = CountingBloomFilter::with_default_buckets(1000, 0.01).unwrap();
//!
//! filter.add(b"hello").add("world");
//! assert!(filter.test(b"hello"));
//!
//! assert!(filter.test_and_remove(b"hello"));
//! assert!(!filter.test(b"hello"));
//! assert!(filter.test("world"));
//! assert_eq!(filter.count(), 1);
//! ```
//!
//! # References
//!
//! - Fan, L., Cao, P., Almeida, J., & Broder, A. Z. (2000). "Summary cache: a scalable
//!   wide-area web cache sharing protocol". IEEE/ACM Transactions on Networking.
//! - Kirsch, A., & Mitzenmacher, M. (2006). "Less Hashing, Same Performance".

#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]

use crate::core::buckets::BucketArray;
use crate::core::filter::{BloomFilter, DeletableBloomFilter};
use crate::core::params::{calculate_filter_params, validate_params, DEFAULT_BUCKET_BITS};
use crate::error::Result;
use crate::hash::strategies::{DoubleHashing, HashStrategy};
use crate::hash::{BloomHasher, FnvHasher};
use std::fmt;
use tracing::{debug, trace, warn};

/// Counting Bloom filter over byte strings.
///
/// # Type Parameters
///
/// * `H` - Hash kernel (defaults to [`FnvHasher`], 64-bit FNV-1)
///
/// # Element Type
///
/// Operations accept anything that is `AsRef<[u8]>`: byte literals, `str`,
/// `String`, `Vec<u8>`, slices.
///
/// # Thread Safety
///
/// No internal synchronization. Every mutation takes `&mut self`; share the
/// filter behind a `Mutex`/`RwLock` if several threads need it.
#[derive(Debug, Clone)]
pub struct CountingBloomFilter<H = FnvHasher>
where
    H: BloomHasher,
{
    buckets: BucketArray,
    hasher: H,
    strategy: DoubleHashing,
    /// Hash rounds per element.
    k: usize,
    /// Successful adds minus successful removals.
    count: usize,
    /// Scratch space for staging indices in `test_and_remove`.
    index_buffer: Vec<usize>,
    /// Increments refused because the bucket was already saturated.
    saturation_events: usize,
    expected_items: usize,
    target_fpr: f64,
}

impl CountingBloomFilter<FnvHasher> {
    /// Create a filter for `expected_items` elements at target rate `fp_rate`,
    /// with `bucket_bits`-wide buckets.
    ///
    /// # Errors
    ///
    /// - [`InvalidItemCount`](crate::BloomCountError::InvalidItemCount) if `expected_items == 0`
    /// - [`FalsePositiveRateOutOfBounds`](crate::BloomCountError::FalsePositiveRateOutOfBounds)
    ///   if `fp_rate` is not in (0, 1)
    /// - [`InvalidBucketWidth`](crate::BloomCountError::InvalidBucketWidth) if
    ///   `bucket_bits` is not in 1..=8
    ///
    /// # Examples
    ///
    /// ```
    /// use bloomcount::CountingBloomFilter;
    ///
    /// let filter = CountingBloomFilter::new(1000, 8, 0.01).unwrap();
    /// assert_eq!(filter.bucket_bits(), 8);
    /// assert!(CountingBloomFilter::new(0, 4, 0.01).is_err());
    /// assert!(CountingBloomFilter::new(1000, 4, 1.5).is_err());
    /// ```
    pub fn new(expected_items: usize, bucket_bits: u8, fp_rate: f64) -> Result<Self> {
        Self::with_hasher(expected_items, bucket_bits, fp_rate, FnvHasher::new())
    }

    /// Same as [`new`](Self::new) with 4-bit buckets.
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    ///
    /// # Examples
    ///
    /// ```
    /// use bloomcount::CountingBloomFilter;
    ///
    /// let filter = CountingBloomFilter::with_default_buckets(1000, 0.01).unwrap();
    /// assert_eq!(filter.capacity(), 9586);
    /// assert_eq!(filter.k(), 7);
    /// assert_eq!(filter.bucket_bits(), 4);
    /// ```
    pub fn with_default_buckets(expected_items: usize, fp_rate: f64) -> Result<Self> {
        Self::new(expected_items, DEFAULT_BUCKET_BITS, fp_rate)
    }

    /// Create a filter with explicit geometry: `m` buckets, `k` hash rounds,
    /// `bucket_bits` bits per bucket.
    ///
    /// # Errors
    ///
    /// Returns an error if `m == 0`, `k == 0` or `bucket_bits`
    /// is outside 1..=8.
    pub fn with_params(m: usize, k: usize, bucket_bits: u8) -> Result<Self> {
        Self::with_params_and_hasher(m, k, bucket_bits, FnvHasher::new())
    }
}

impl<H> CountingBloomFilter<H>
where
    H: BloomHasher,
{
    /// Create a sized filter with a custom hash kernel.
    ///
    /// # Errors
    ///
    /// See [`CountingBloomFilter::new`].
    ///
    /// # Examples
    ///
    /// ```
    /// use bloomcount::hash::Fnv1aHasher;
    /// use bloomcount::CountingBloomFilter;
    ///
    /// let filter = CountingBloomFilter::with_hasher(500, 4, 0.05, Fnv1aHasher::new()).unwrap();
    /// assert_eq!(filter.expected_items(), 500);
    /// ```
    pub fn with_hasher(
        expected_items: usize,
        bucket_bits: u8,
        fp_rate: f64,
        hasher: H,
    ) -> Result<Self> {
        let (m, k) = calculate_filter_params(expected_items, fp_rate)?;
        let mut filter = Self::with_params_and_hasher(m, k, bucket_bits, hasher)?;
        filter.expected_items = expected_items;
        filter.target_fpr = fp_rate;
        Ok(filter)
    }

    /// Create a filter with explicit geometry and a custom hash kernel.
    ///
    /// `expected_items` and `target_false_positive_rate` report 0 for filters
    /// built this way.
    ///
    /// # Errors
    ///
    /// See [`CountingBloomFilter::with_params`].
    pub fn with_params_and_hasher(m: usize, k: usize, bucket_bits: u8, hasher: H) -> Result<Self> {
        validate_params(m, k, bucket_bits)?;
        let buckets = BucketArray::new(m, bucket_bits)?;

        debug!(
            buckets = m,
            hash_rounds = k,
            bucket_bits,
            hasher = hasher.name(),
            strategy = DoubleHashing.name(),
            memory_bytes = buckets.memory_usage(),
            "created counting bloom filter"
        );

        Ok(Self {
            buckets,
            hasher,
            strategy: DoubleHashing,
            k,
            count: 0,
            index_buffer: vec![0; k],
            saturation_events: 0,
            expected_items: 0,
            target_fpr: 0.0,
        })
    }

    /// Add an element: increment its k buckets (saturating) and bump `count`.
    ///
    /// Returns `&mut Self` so calls can be chained.
    #[inline]
    pub fn add<D>(&mut self, data: &D) -> &mut Self
    where
        D: AsRef<[u8]> + ?Sized,
    {
        let (lower, upper) = self.hasher.hash_kernel(data.as_ref());
        let m = self.buckets.len();
        for round in 0..self.k {
            let index = self.strategy.index(lower, upper, round, m);
            self.bump(index);
        }
        self.count += 1;
        self
    }

    /// `true` if all k buckets for `data` are non-zero. Never mutates.
    ///
    /// # Examples
    ///
    /// ```
    /// use bloomcount::CountingBloomFilter;
    ///
    /// let mut filter = CountingBloomFilter::with_default_buckets(1000, 0.01).unwrap();
    /// filter.add(b"present");
    /// assert!(filter.test(b"present"));
    /// assert!(!filter.test(b"absent"));
    /// ```
    #[must_use]
    #[inline]
    pub fn test<D>(&self, data: &D) -> bool
    where
        D: AsRef<[u8]> + ?Sized,
    {
        let (lower, upper) = self.hasher.hash_kernel(data.as_ref());
        let m = self.buckets.len();
        (0..self.k).all(|round| self.buckets.get(self.strategy.index(lower, upper, round, m)) > 0)
    }

    /// Test membership, then add, with a single hash evaluation.
    ///
    /// Returns what [`test`](Self::test) would have returned before the call.
    /// Every bucket is incremented whatever the outcome.
    ///
    /// # Examples
    ///
    /// ```
    /// use bloomcount::CountingBloomFilter;
    ///
    /// let mut filter = CountingBloomFilter::with_default_buckets(1000, 0.01).unwrap();
    /// assert!(!filter.test_and_add(b"x"));
    /// assert!(filter.test_and_add(b"x"));
    /// assert_eq!(filter.count(), 2);
    /// ```
    pub fn test_and_add<D>(&mut self, data: &D) -> bool
    where
        D: AsRef<[u8]> + ?Sized,
    {
        let (lower, upper) = self.hasher.hash_kernel(data.as_ref());
        let m = self.buckets.len();
        let mut member = true;
        for round in 0..self.k {
            let index = self.strategy.index(lower, upper, round, m);
            // A revisited bucket already holds this call's increment, but its
            // first visit saw the prior value, and that zero decides the AND.
            member &= self.bump(index);
        }
        self.count += 1;
        member
    }

    /// Remove an element if it tests as present.
    ///
    /// All k buckets are checked before any is modified: on `false` the
    /// filter is left exactly as it was.
    ///
    /// # Examples
    ///
    /// ```
    /// use bloomcount::CountingBloomFilter;
    ///
    /// let mut filter = CountingBloomFilter::with_default_buckets(1000, 0.01).unwrap();
    /// filter.add(b"a");
    /// assert!(filter.test_and_remove(b"a"));
    /// assert!(!filter.test_and_remove(b"a"));
    /// assert_eq!(filter.count(), 0);
    /// ```
    pub fn test_and_remove<D>(&mut self, data: &D) -> bool
    where
        D: AsRef<[u8]> + ?Sized,
    {
        let (lower, upper) = self.hasher.hash_kernel(data.as_ref());
        self.strategy
            .fill_indices(lower, upper, self.buckets.len(), &mut self.index_buffer);

        if self.index_buffer.iter().any(|&index| self.buckets.get(index) == 0) {
            trace!(count = self.count, "removal rejected: element not present");
            return false;
        }

        for &index in &self.index_buffer {
            self.buckets.increment(index, -1);
        }
        self.count = self.count.saturating_sub(1);
        true
    }

    /// Zero every bucket, `count` and the saturation counter.
    pub fn reset(&mut self) -> &mut Self {
        self.buckets.reset();
        self.count = 0;
        self.saturation_events = 0;
        debug!(buckets = self.buckets.len(), "counting bloom filter reset");
        self
    }

    /// Number of buckets (m).
    #[must_use]
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Number of hash rounds (k).
    #[must_use]
    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Successful adds minus successful removals. An estimate: duplicates are
    /// counted each time.
    #[must_use]
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Bucket width in bits (b).
    #[must_use]
    pub fn bucket_bits(&self) -> u8 {
        self.buckets.bucket_bits()
    }

    /// Item count the filter was sized for; 0 for explicit geometry.
    #[must_use]
    pub fn expected_items(&self) -> usize {
        self.expected_items
    }

    /// Rate the filter was sized for; 0.0 for explicit geometry.
    #[must_use]
    pub fn target_false_positive_rate(&self) -> f64 {
        self.target_fpr
    }

    /// `true` when `count` is zero.
    ///
    /// Buckets can still be non-zero if saturation prevented exact
    /// bookkeeping; use [`count_nonzero`](Self::count_nonzero) to inspect them.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Read-only view of the bucket storage.
    #[must_use]
    pub fn buckets(&self) -> &BucketArray {
        &self.buckets
    }

    /// The hash kernel in use.
    #[must_use]
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Add every element of `items`.
    pub fn add_batch<I>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        for item in items {
            self.add(&item);
        }
        self
    }

    /// Test every element of `items`, in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bloomcount::CountingBloomFilter;
    ///
    /// let mut filter = CountingBloomFilter::with_default_buckets(100, 0.01).unwrap();
    /// filter.add_batch(["a", "b"]);
    /// assert_eq!(filter.test_batch(["a", "b", "zzz"]), vec![true, true, false]);
    /// ```
    #[must_use]
    pub fn test_batch<I>(&self, items: I) -> Vec<bool>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        items.into_iter().map(|item| self.test(&item)).collect()
    }

    /// Remove every element of `items`; returns how many removals succeeded.
    pub fn remove_batch<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        items
            .into_iter()
            .filter(|item| self.test_and_remove(item))
            .count()
    }

    /// Number of non-zero buckets.
    #[must_use]
    pub fn count_nonzero(&self) -> usize {
        self.buckets.count_nonzero()
    }

    /// Fraction of non-zero buckets.
    #[must_use]
    pub fn fill_rate(&self) -> f64 {
        self.count_nonzero() as f64 / self.capacity() as f64
    }

    /// Current false positive estimate from the fill rate, `fill^k`.
    ///
    /// Equivalent to `(1 - e^(-kn/m))^k` with `n` inferred from how many
    /// buckets are occupied, so it stays meaningful after removals.
    #[must_use]
    pub fn estimate_fpr(&self) -> f64 {
        let fill = self.fill_rate();
        if fill <= 0.0 {
            return 0.0;
        }
        fill.powi(self.k as i32).min(1.0)
    }

    /// Largest bucket value currently stored.
    #[must_use]
    pub fn max_bucket_value(&self) -> u8 {
        self.buckets.iter().max().unwrap_or(0)
    }

    /// Number of buckets pinned at `2^b - 1`.
    #[must_use]
    pub fn saturated_bucket_count(&self) -> usize {
        self.buckets.count_saturated()
    }

    /// Increments dropped because their bucket was already saturated, since
    /// construction or the last reset.
    #[must_use]
    pub fn saturation_events(&self) -> usize {
        self.saturation_events
    }

    /// `true` if any increment has been dropped to saturation.
    #[must_use]
    pub fn has_saturated(&self) -> bool {
        self.saturation_events > 0
    }

    /// `histogram[v]` is the number of buckets holding value `v`, for
    /// `v` in `0..=2^b - 1`.
    #[must_use]
    pub fn bucket_histogram(&self) -> Vec<usize> {
        let mut histogram = vec![0; usize::from(self.buckets.max_value()) + 1];
        for value in self.buckets.iter() {
            histogram[usize::from(value)] += 1;
        }
        histogram
    }

    /// Heap bytes used: packed buckets plus the index scratch buffer.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.buckets.memory_usage() + self.index_buffer.capacity() * std::mem::size_of::<usize>()
    }

    /// Snapshot of the filter's health.
    #[must_use]
    pub fn stats(&self) -> FilterStats {
        FilterStats {
            capacity: self.capacity(),
            hash_count: self.k,
            bucket_bits: self.bucket_bits(),
            count: self.count,
            nonzero_buckets: self.count_nonzero(),
            saturated_buckets: self.saturated_bucket_count(),
            saturation_events: self.saturation_events,
            fill_rate: self.fill_rate(),
            estimated_fpr: self.estimate_fpr(),
            memory_bytes: self.memory_usage(),
            hasher: self.hasher.name(),
            strategy: self.strategy.name(),
        }
    }

    /// Increment one bucket, recording saturation instead of incrementing a
    /// full bucket. Returns whether the bucket was non-zero beforehand.
    #[inline]
    fn bump(&mut self, index: usize) -> bool {
        let before = self.buckets.get(index);
        if before == self.buckets.max_value() {
            self.note_saturation(index);
        } else {
            self.buckets.increment(index, 1);
        }
        before > 0
    }

    #[cold]
    fn note_saturation(&mut self, index: usize) {
        if self.saturation_events == 0 {
            warn!(
                bucket = index,
                max_value = self.buckets.max_value(),
                bucket_bits = self.buckets.bucket_bits(),
                "bucket saturated; removals may now produce false negatives"
            );
        }
        self.saturation_events += 1;
    }
}

impl<H> BloomFilter for CountingBloomFilter<H>
where
    H: BloomHasher,
{
    fn insert(&mut self, item: &[u8]) {
        self.add(item);
    }

    fn contains(&self, item: &[u8]) -> bool {
        self.test(item)
    }

    fn clear(&mut self) {
        self.reset();
    }

    fn len(&self) -> usize {
        self.count
    }

    fn false_positive_rate(&self) -> f64 {
        self.estimate_fpr()
    }

    fn expected_items(&self) -> usize {
        self.expected_items
    }

    fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn hash_count(&self) -> usize {
        self.k
    }
}

impl<H> DeletableBloomFilter for CountingBloomFilter<H>
where
    H: BloomHasher,
{
    fn remove(&mut self, item: &[u8]) -> bool {
        self.test_and_remove(item)
    }
}

/// Point-in-time health report for a [`CountingBloomFilter`].
#[derive(Debug, Clone, PartialEq)]
pub struct FilterStats {
    /// Number of buckets (m).
    pub capacity: usize,
    /// Hash rounds (k).
    pub hash_count: usize,
    /// Bucket width (b).
    pub bucket_bits: u8,
    /// Successful adds minus successful removals.
    pub count: usize,
    /// Buckets holding a non-zero value.
    pub nonzero_buckets: usize,
    /// Buckets pinned at their maximum.
    pub saturated_buckets: usize,
    /// Increments dropped to saturation.
    pub saturation_events: usize,
    /// `nonzero_buckets / capacity`.
    pub fill_rate: f64,
    /// See [`CountingBloomFilter::estimate_fpr`].
    pub estimated_fpr: f64,
    /// See [`CountingBloomFilter::memory_usage`].
    pub memory_bytes: usize,
    /// Hash kernel name.
    pub hasher: &'static str,
    /// Index derivation scheme.
    pub strategy: &'static str,
}

impl fmt::Display for FilterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "CountingBloomFilter(m={}, k={}, b={}, hasher={}, strategy={})",
            self.capacity, self.hash_count, self.bucket_bits, self.hasher, self.strategy
        )?;
        writeln!(f, "  count:             {}", self.count)?;
        writeln!(
            f,
            "  nonzero buckets:   {} ({:.2}%)",
            self.nonzero_buckets,
            self.fill_rate * 100.0
        )?;
        writeln!(f, "  saturated buckets: {}", self.saturated_buckets)?;
        writeln!(f, "  saturation events: {}", self.saturation_events)?;
        writeln!(f, "  estimated FPR:     {:.4}%", self.estimated_fpr * 100.0)?;
        write!(f, "  memory:            {} bytes", self.memory_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BloomCountError;
    use crate::hash::Fnv1aHasher;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Hasher returning a fixed digest, to force bucket collisions.
    #[derive(Debug, Clone, Copy)]
    struct FixedHasher(u64);

    impl BloomHasher for FixedHasher {
        fn hash_bytes(&self, _bytes: &[u8]) -> u64 {
            self.0
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    #[test]
    fn test_default_scenario() {
        let mut filter = CountingBloomFilter::with_default_buckets(1000, 0.01).unwrap();

        filter.add(b"a");
        assert!(filter.test(b"a"));
        assert_eq!(filter.count(), 1);

        assert!(filter.test_and_remove(b"a"));
        assert_eq!(filter.count(), 0);

        assert!(!filter.test_and_remove(b"a"));
        assert_eq!(filter.count(), 0);
    }

    #[test]
    fn test_new_sizing() {
        let filter = CountingBloomFilter::with_default_buckets(1000, 0.01).unwrap();
        assert_eq!(filter.capacity(), 9586);
        assert_eq!(filter.k(), 7);
        assert_eq!(filter.bucket_bits(), 4);
        assert_eq!(filter.expected_items(), 1000);
        assert_eq!(filter.target_false_positive_rate(), 0.01);
        assert!(filter.is_empty());
    }

    #[test]
    fn test_invalid_configuration() {
        assert!(matches!(
            CountingBloomFilter::new(0, 4, 0.01),
            Err(BloomCountError::InvalidItemCount { .. })
        ));
        assert!(matches!(
            CountingBloomFilter::new(100, 4, 0.0),
            Err(BloomCountError::FalsePositiveRateOutOfBounds { .. })
        ));
        assert!(matches!(
            CountingBloomFilter::new(100, 4, 1.0),
            Err(BloomCountError::FalsePositiveRateOutOfBounds { .. })
        ));
        assert!(matches!(
            CountingBloomFilter::new(100, 0, 0.01),
            Err(BloomCountError::InvalidBucketWidth { .. })
        ));
        assert!(matches!(
            CountingBloomFilter::with_params(0, 3, 4),
            Err(BloomCountError::InvalidFilterSize { .. })
        ));
        assert!(matches!(
            CountingBloomFilter::with_params(100, 0, 4),
            Err(BloomCountError::InvalidHashCount { .. })
        ));
    }

    #[test]
    fn test_with_params() {
        let filter = CountingBloomFilter::with_params(64, 3, 2).unwrap();
        assert_eq!(filter.capacity(), 64);
        assert_eq!(filter.k(), 3);
        assert_eq!(filter.bucket_bits(), 2);
        assert_eq!(filter.expected_items(), 0);
    }

    #[test]
    fn test_add_chains() {
        let mut filter = CountingBloomFilter::with_default_buckets(100, 0.01).unwrap();
        filter.add("x").add("y").add(&String::from("z"));
        assert_eq!(filter.count(), 3);
        assert!(filter.test("x") && filter.test("y") && filter.test("z"));
    }

    #[test]
    fn test_accepts_various_byte_sources() {
        let mut filter = CountingBloomFilter::with_default_buckets(100, 0.01).unwrap();
        filter.add(&vec![1u8, 2, 3]);
        assert!(filter.test(&[1u8, 2, 3][..]));
        assert!(filter.test(&[1u8, 2, 3]));
    }

    #[test]
    fn test_empty_element() {
        let mut filter = CountingBloomFilter::with_default_buckets(100, 0.01).unwrap();
        filter.add(b"");
        assert!(filter.test(b""));
        assert!(filter.test_and_remove(b""));
    }

    #[test]
    fn test_add_increments_k_buckets() {
        let mut filter = CountingBloomFilter::with_default_buckets(1000, 0.01).unwrap();
        filter.add(b"one");
        let total: usize = filter.buckets().iter().map(usize::from).sum();
        assert_eq!(total, filter.k());
    }

    #[test]
    fn test_test_and_add_matches_test_then_add() {
        let mut a = CountingBloomFilter::with_default_buckets(200, 0.05).unwrap();
        let mut b = a.clone();

        for i in 0..500u32 {
            let key = (i % 150).to_le_bytes();
            let expected = b.test(&key);
            b.add(&key);
            assert_eq!(a.test_and_add(&key), expected);
        }
        assert_eq!(a.buckets(), b.buckets());
        assert_eq!(a.count(), b.count());
    }

    #[test]
    fn test_test_and_add_with_repeated_bucket() {
        // lower = 5, upper = 0: every round lands on bucket 5
        let mut filter = CountingBloomFilter::with_params_and_hasher(16, 4, 4, FixedHasher(5)).unwrap();
        assert!(!filter.test_and_add(b"x"));
        assert_eq!(filter.buckets().get(5), 4);
        assert!(filter.test_and_add(b"x"));
    }

    #[test]
    fn test_failed_remove_leaves_filter_unchanged() {
        let mut filter = CountingBloomFilter::with_default_buckets(1000, 0.01).unwrap();
        for i in 0..100u32 {
            filter.add(&i.to_le_bytes());
        }
        let before = filter.buckets().clone();

        let mut rejected = 0;
        for i in 10_000..10_100u32 {
            if !filter.test_and_remove(&i.to_le_bytes()) {
                rejected += 1;
            }
        }
        // At 1% FPR nearly all of these are rejected
        assert!(rejected > 90);
        if rejected == 100 {
            assert_eq!(filter.buckets(), &before);
            assert_eq!(filter.count(), 100);
        }
    }

    #[test]
    fn test_partial_membership_does_not_decrement() {
        // Two rounds: buckets lower and lower + upper
        let digest = (3u64 << 32) | 1; // lower = 1, upper = 3
        let mut filter = CountingBloomFilter::with_params_and_hasher(16, 2, 4, FixedHasher(digest)).unwrap();

        filter.buckets.increment(1, 1);
        let before = filter.buckets().clone();

        assert!(!filter.test_and_remove(b"anything"));
        assert_eq!(filter.buckets(), &before);
        assert_eq!(filter.buckets().get(1), 1);
    }

    #[test]
    fn test_multiple_adds_and_removes() {
        let mut filter = CountingBloomFilter::with_default_buckets(1000, 0.01).unwrap();
        filter.add("item").add("item").add("item");

        assert!(filter.test_and_remove("item"));
        assert!(filter.test("item"));
        assert!(filter.test_and_remove("item"));
        assert!(filter.test("item"));
        assert!(filter.test_and_remove("item"));
        assert!(!filter.test("item"));
        assert_eq!(filter.count(), 0);
        assert_eq!(filter.count_nonzero(), 0);
    }

    #[test]
    fn test_reset() {
        let mut filter = CountingBloomFilter::with_default_buckets(100, 0.01).unwrap();
        filter.add("a").add("b").add("c");

        filter.reset();
        assert_eq!(filter.count(), 0);
        assert_eq!(filter.count_nonzero(), 0);
        assert!(!filter.test("a"));

        let snapshot = filter.buckets().clone();
        filter.reset().reset();
        assert_eq!(filter.buckets(), &snapshot);
        assert_eq!(filter.count(), 0);
    }

    #[test]
    fn test_saturation() {
        let mut filter = CountingBloomFilter::with_params_and_hasher(8, 1, 2, FixedHasher(3)).unwrap();

        for _ in 0..5 {
            filter.add(b"x");
        }
        assert_eq!(filter.buckets().get(3), 3);
        assert_eq!(filter.max_bucket_value(), 3);
        assert_eq!(filter.saturated_bucket_count(), 1);
        assert_eq!(filter.saturation_events(), 2);
        assert!(filter.has_saturated());
        assert_eq!(filter.count(), 5);

        // Saturated bucket under-counts: three removals empty it
        assert!(filter.test_and_remove(b"x"));
        assert!(filter.test_and_remove(b"x"));
        assert!(filter.test_and_remove(b"x"));
        assert!(!filter.test_and_remove(b"x"));
        assert_eq!(filter.count(), 2);

        filter.reset();
        assert_eq!(filter.saturation_events(), 0);
        assert!(!filter.has_saturated());
    }

    #[test]
    fn test_one_bit_buckets() {
        let mut filter = CountingBloomFilter::new(100, 1, 0.01).unwrap();
        filter.add(b"bit").add(b"bit");
        assert!(filter.has_saturated());
        assert!(filter.test_and_remove(b"bit"));
        assert!(!filter.test(b"bit"));
    }

    #[test]
    fn test_no_false_negatives_without_removal() {
        let mut filter = CountingBloomFilter::with_default_buckets(1000, 0.01).unwrap();
        for i in 0..1000u32 {
            filter.add(&i.to_be_bytes());
        }
        for i in 0..1000u32 {
            assert!(filter.test(&i.to_be_bytes()), "false negative for {i}");
        }
    }

    #[test]
    fn test_independent_items() {
        let mut filter = CountingBloomFilter::with_default_buckets(1000, 0.01).unwrap();
        filter.add("keep").add("drop");
        assert!(filter.test_and_remove("drop"));
        assert!(filter.test("keep"));
    }

    #[test]
    fn test_batches() {
        let mut filter = CountingBloomFilter::with_default_buckets(1000, 0.01).unwrap();
        filter.add_batch(["a", "b", "c"]);
        assert_eq!(filter.count(), 3);
        assert_eq!(filter.test_batch(["a", "b", "c"]), vec![true; 3]);

        assert_eq!(filter.remove_batch(["a", "b", "never"]), 2);
        assert_eq!(filter.count(), 1);
        assert!(filter.test("c"));
    }

    #[test]
    fn test_fill_rate_and_estimate() {
        let mut filter = CountingBloomFilter::with_default_buckets(1000, 0.01).unwrap();
        assert_eq!(filter.fill_rate(), 0.0);
        assert_eq!(filter.estimate_fpr(), 0.0);

        for i in 0..1000u32 {
            filter.add(&i.to_le_bytes());
        }
        let fill = filter.fill_rate();
        assert!(fill > 0.4 && fill < 0.6, "fill rate {fill}");
        let fpr = filter.estimate_fpr();
        assert!(fpr > 0.001 && fpr < 0.05, "estimated fpr {fpr}");
    }

    #[test]
    fn test_bucket_histogram() {
        let mut filter = CountingBloomFilter::with_params_and_hasher(8, 1, 4, FixedHasher(2)).unwrap();
        filter.add(b"x").add(b"x");

        let histogram = filter.bucket_histogram();
        assert_eq!(histogram.len(), 16);
        assert_eq!(histogram[0], 7);
        assert_eq!(histogram[2], 1);
        assert_eq!(histogram.iter().sum::<usize>(), 8);
    }

    #[test]
    fn test_memory_usage() {
        let filter = CountingBloomFilter::with_params(1000, 7, 4).unwrap();
        assert!(filter.memory_usage() >= 504);
        assert!(filter.memory_usage() < 1000);
    }

    #[test]
    fn test_stats() {
        let mut filter = CountingBloomFilter::with_default_buckets(1000, 0.01).unwrap();
        filter.add("a");
        let stats = filter.stats();
        assert_eq!(stats.capacity, 9586);
        assert_eq!(stats.hash_count, 7);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.nonzero_buckets, filter.count_nonzero());
        assert_eq!(stats.hasher, "FNV-1");

        let text = stats.to_string();
        assert!(text.contains("m=9586"));
        assert!(text.contains("count:"));
    }

    #[test]
    fn test_custom_hasher() {
        let mut filter = CountingBloomFilter::with_hasher(1000, 4, 0.01, Fnv1aHasher::new()).unwrap();
        filter.add("a");
        assert!(filter.test("a"));
        assert_eq!(filter.hasher().name(), "FNV-1a");
    }

    #[test]
    fn test_bloom_filter_traits() {
        fn exercise<F: DeletableBloomFilter>(filter: &mut F) {
            filter.insert(b"t");
            assert!(filter.contains(b"t"));
            assert_eq!(filter.len(), 1);
            assert!(filter.can_remove(b"t"));
            assert!(filter.remove(b"t"));
            assert!(filter.is_empty());
            filter.insert(b"u");
            filter.clear();
            assert!(!filter.contains(b"u"));
        }

        let mut filter = CountingBloomFilter::with_default_buckets(1000, 0.01).unwrap();
        exercise(&mut filter);
        assert_eq!(BloomFilter::bucket_count(&filter), 9586);
        assert_eq!(BloomFilter::hash_count(&filter), 7);
        assert_eq!(BloomFilter::expected_items(&filter), 1000);
    }

    /// FNV-1 kernel that counts its invocations.
    #[derive(Debug, Default)]
    struct CountingHasher {
        calls: AtomicUsize,
        inner: FnvHasher,
    }

    impl CountingHasher {
        fn take_calls(&self) -> usize {
            self.calls.swap(0, Ordering::Relaxed)
        }
    }

    impl BloomHasher for CountingHasher {
        fn hash_bytes(&self, bytes: &[u8]) -> u64 {
            self.calls.fetch_add(1, Ordering::Relaxed);
            self.inner.hash_bytes(bytes)
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    #[test]
    fn test_each_operation_hashes_once() {
        let mut filter =
            CountingBloomFilter::with_hasher(1000, 4, 0.01, CountingHasher::default()).unwrap();
        assert_eq!(filter.k(), 7);

        filter.add(b"a");
        assert_eq!(filter.hasher().take_calls(), 1);

        assert!(filter.test(b"a"));
        assert_eq!(filter.hasher().take_calls(), 1);

        assert!(filter.test_and_add(b"a"));
        assert_eq!(filter.hasher().take_calls(), 1);

        assert!(filter.test_and_remove(b"a"));
        assert_eq!(filter.hasher().take_calls(), 1);

        assert!(filter.test_and_remove(b"a"));
        assert!(!filter.test_and_remove(b"a"));
        assert_eq!(filter.hasher().take_calls(), 2);
    }

    #[test]
    fn test_tiny_fp_rate_is_not_capped() {
        let filter = CountingBloomFilter::with_default_buckets(1000, 1e-12).unwrap();
        assert_eq!(filter.capacity(), 57511);
        assert_eq!(filter.k(), 40);

        let mut filter = CountingBloomFilter::with_params(10_000, 40, 4).unwrap();
        filter.add(b"deep");
        assert!(filter.test(b"deep"));
        assert!(filter.test_and_remove(b"deep"));
        assert_eq!(filter.count_nonzero(), 0);
    }

    #[test]
    fn test_stats_report_strategy() {
        let filter = CountingBloomFilter::with_default_buckets(100, 0.01).unwrap();
        let stats = filter.stats();
        assert_eq!(stats.strategy, "DoubleHashing");
        assert!(stats.to_string().contains("strategy=DoubleHashing"));
    }
}
