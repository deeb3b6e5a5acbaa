//! Trait definitions for byte-oriented approximate membership filters.
//!
//! Elements are opaque byte strings. Callers choose how to turn their values
//! into bytes, which keeps hashing deterministic and independent of Rust's
//! `Hash` implementations.
//!
//! # Mutability Contract
//!
//! Every mutation takes `&mut self`. Filters carry no internal locking; wrap
//! them in `Mutex` or `RwLock` when they must be shared. `contains` only
//! needs `&self`, so a read lock is enough for concurrent queries.

/// Approximate set membership over byte strings.
///
/// # Guarantees
///
/// ## No False Negatives Before Removal
/// ```text
/// filter.insert(x);
/// assert!(filter.contains(x)); // true unless x (or a collision) was removed
/// ```
///
/// ## Determinism
/// The same sequence of operations with the same configuration produces the
/// same answers.
///
/// # Examples
///
/// ```
/// use bloomcount::core::BloomFilter;
/// use bloomcount::CountingBloomFilter;
///
/// fn admit<F: BloomFilter>(filter: &mut F, key: &[u8]) -> bool {
///     let seen = filter.contains(key);
///     filter.insert(key);
///     seen
/// }
///
/// let mut filter = CountingBloomFilter::with_default_buckets(1000, 0.01).unwrap();
/// assert!(!admit(&mut filter, b"k1"));
/// assert!(admit(&mut filter, b"k1"));
/// ```
pub trait BloomFilter {
    /// Insert an item. Afterwards `contains(item)` returns `true`.
    fn insert(&mut self, item: &[u8]);

    /// Check whether an item might be present.
    ///
    /// * `true` - item **might** be present (could be a false positive)
    /// * `false` - item is not present
    #[must_use]
    fn contains(&self, item: &[u8]) -> bool;

    /// Return the filter to its empty state.
    fn clear(&mut self);

    /// Number of items currently represented (an estimate for counting filters).
    #[must_use]
    fn len(&self) -> usize;

    /// `true` when nothing is represented.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current estimated false positive rate.
    #[must_use]
    fn false_positive_rate(&self) -> f64;

    /// Item count the filter was sized for (0 if built from explicit geometry).
    #[must_use]
    fn expected_items(&self) -> usize;

    /// Number of buckets (m).
    #[must_use]
    fn bucket_count(&self) -> usize;

    /// Number of hash rounds (k).
    #[must_use]
    fn hash_count(&self) -> usize;

    /// Insert every item yielded by `items`.
    fn insert_batch<'a, I>(&mut self, items: I)
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        for item in items {
            self.insert(item);
        }
    }

    /// `true` if every item might be present. Short-circuits on the first miss.
    #[must_use]
    fn contains_all<'a, I>(&self, items: I) -> bool
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        items.into_iter().all(|item| self.contains(item))
    }

    /// `true` if at least one item might be present.
    #[must_use]
    fn contains_any<'a, I>(&self, items: I) -> bool
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        items.into_iter().any(|item| self.contains(item))
    }
}

/// Extension trait for filters that support removal.
///
/// # Guarantees
///
/// * A failed `remove` leaves the filter exactly as it was.
/// * After a successful `remove(x)` of an item inserted once, `contains(x)`
///   is `false` unless other items cover all of `x`'s buckets.
///
/// # Examples
///
/// ```
/// use bloomcount::core::{BloomFilter, DeletableBloomFilter};
/// use bloomcount::CountingBloomFilter;
///
/// let mut filter = CountingBloomFilter::with_default_buckets(1000, 0.01).unwrap();
/// filter.insert(b"hello");
/// filter.insert(b"hello");
///
/// assert!(filter.remove(b"hello"));
/// assert!(filter.contains(b"hello"));
/// assert!(filter.remove(b"hello"));
/// assert!(!filter.contains(b"hello"));
/// assert!(!filter.remove(b"hello"));
/// ```
pub trait DeletableBloomFilter: BloomFilter {
    /// Remove an item if it tests as present.
    ///
    /// Returns `true` if the item was present and has been removed, `false`
    /// if it was absent (nothing changes).
    fn remove(&mut self, item: &[u8]) -> bool;

    /// Whether `remove(item)` would currently succeed. Subject to false
    /// positives like `contains`.
    #[must_use]
    fn can_remove(&self, item: &[u8]) -> bool {
        self.contains(item)
    }
}
