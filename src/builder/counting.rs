//! Builder for counting Bloom filters.
//!
//! # Type-State Pattern
//!
//! ```text
//! Initial ──.expected_items()──▶ WithItems ──.false_positive_rate()──▶ Complete ──.build()──▶ filter
//!    │
//!    └──────.explicit_params(m, k)──────────────────────────────────▶ Explicit ──.build()──▶ filter
//! ```
//!
//! `.bucket_bits()` and `.hasher()` may be called in any state.
//!
//! # Examples
//!
//! ## Minimal Configuration
//!
//! ```
//! use bloomcount::builder::CountingBloomFilterBuilder;
//!
//! let filter = CountingBloomFilterBuilder::new()
//!     .expected_items(10_000)
//!     .false_positive_rate(0.01)
//!     .build()
//!     .unwrap();
//! assert_eq!(filter.bucket_bits(), 4);
//! ```
//!
//! ## Full Configuration
//!
//! ```
//! use bloomcount::builder::CountingBloomFilterBuilder;
//! use bloomcount::hash::Fnv1aHasher;
//!
//! let filter = CountingBloomFilterBuilder::new()
//!     .expected_items(10_000)
//!     .false_positive_rate(0.01)
//!     .bucket_bits(8)
//!     .hasher(Fnv1aHasher::with_seed(7))
//!     .build()
//!     .unwrap();
//! assert_eq!(filter.buckets().max_value(), 255);
//! ```
//!
//! ## Explicit Geometry
//!
//! ```
//! use bloomcount::builder::CountingBloomFilterBuilder;
//!
//! let filter = CountingBloomFilterBuilder::new()
//!     .explicit_params(4096, 5)
//!     .build()
//!     .unwrap();
//! assert_eq!((filter.capacity(), filter.k()), (4096, 5));
//! ```

#![allow(clippy::cast_precision_loss)]

use super::validation;
use crate::core::params::{self, DEFAULT_BUCKET_BITS};
use crate::error::Result;
use crate::filters::counting::CountingBloomFilter;
use crate::hash::{BloomHasher, DefaultHasher};
use std::marker::PhantomData;

/// Type-state marker: nothing set yet.
#[derive(Debug, Clone, Copy)]
pub struct Initial;

/// Type-state marker: item count is set.
#[derive(Debug, Clone, Copy)]
pub struct WithItems;

/// Type-state marker: item count and false positive rate are set.
#[derive(Debug, Clone, Copy)]
pub struct Complete;

/// Type-state marker: bucket count and hash rounds given directly.
#[derive(Debug, Clone, Copy)]
pub struct Explicit;

/// Builder for [`CountingBloomFilter`] with type-state guarantees.
///
/// # Type Parameters
///
/// - `State`: current builder state
/// - `H`: hash kernel, [`DefaultHasher`] unless replaced with `.hasher()`
///
/// # Bucket Width
///
/// Buckets are 4 bits by default (saturate at 15). Anything from 1 to 8 bits
/// is accepted; memory grows linearly with the width.
#[derive(Debug, Clone)]
pub struct CountingBloomFilterBuilder<State, H = DefaultHasher> {
    expected_items: usize,
    fp_rate: f64,
    geometry: (usize, usize),
    bucket_bits: u8,
    hasher: H,
    _state: PhantomData<State>,
}

impl CountingBloomFilterBuilder<Initial, DefaultHasher> {
    /// Create a builder with 4-bit buckets and the FNV-1 kernel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            expected_items: 0,
            fp_rate: 0.0,
            geometry: (0, 0),
            bucket_bits: DEFAULT_BUCKET_BITS,
            hasher: DefaultHasher::new(),
            _state: PhantomData,
        }
    }
}

impl Default for CountingBloomFilterBuilder<Initial, DefaultHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<State, H> CountingBloomFilterBuilder<State, H> {
    /// Set the bucket width in bits (optional, 1..=8, default 4).
    #[must_use]
    pub fn bucket_bits(mut self, bucket_bits: u8) -> Self {
        self.bucket_bits = bucket_bits;
        self
    }

    /// Replace the hash kernel (optional).
    #[must_use]
    pub fn hasher<H2: BloomHasher>(self, hasher: H2) -> CountingBloomFilterBuilder<State, H2> {
        CountingBloomFilterBuilder {
            expected_items: self.expected_items,
            fp_rate: self.fp_rate,
            geometry: self.geometry,
            bucket_bits: self.bucket_bits,
            hasher,
            _state: PhantomData,
        }
    }

    fn transition<Next>(self) -> CountingBloomFilterBuilder<Next, H> {
        CountingBloomFilterBuilder {
            expected_items: self.expected_items,
            fp_rate: self.fp_rate,
            geometry: self.geometry,
            bucket_bits: self.bucket_bits,
            hasher: self.hasher,
            _state: PhantomData,
        }
    }
}

impl<H> CountingBloomFilterBuilder<Initial, H> {
    /// Set the expected number of items. Transitions to `WithItems`.
    #[must_use]
    pub fn expected_items(mut self, items: usize) -> CountingBloomFilterBuilder<WithItems, H> {
        self.expected_items = items;
        self.transition()
    }

    /// Skip sizing and use `m` buckets with `k` hash rounds. Transitions to
    /// `Explicit`.
    #[must_use]
    pub fn explicit_params(mut self, m: usize, k: usize) -> CountingBloomFilterBuilder<Explicit, H> {
        self.geometry = (m, k);
        self.transition()
    }
}

impl<H> CountingBloomFilterBuilder<WithItems, H> {
    /// Set the target false positive rate. Transitions to `Complete`.
    #[must_use]
    pub fn false_positive_rate(mut self, fp_rate: f64) -> CountingBloomFilterBuilder<Complete, H> {
        self.fp_rate = fp_rate;
        self.transition()
    }
}

impl<H: BloomHasher> CountingBloomFilterBuilder<Complete, H> {
    /// Validate the configuration and build the filter.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - `expected_items == 0`
    /// - `fp_rate` not in (0, 1)
    /// - `bucket_bits` not in 1..=8
    ///
    /// # Examples
    ///
    /// ```
    /// use bloomcount::builder::CountingBloomFilterBuilder;
    ///
    /// let mut filter = CountingBloomFilterBuilder::new()
    ///     .expected_items(1_000)
    ///     .false_positive_rate(0.01)
    ///     .build()
    ///     .unwrap();
    ///
    /// filter.add("hello");
    /// assert!(filter.test_and_remove("hello"));
    /// assert!(!filter.test("hello"));
    /// ```
    pub fn build(self) -> Result<CountingBloomFilter<H>> {
        self.build_with_metadata().map(|(filter, _)| filter)
    }

    /// Build the filter and report the derived sizing.
    ///
    /// # Errors
    ///
    /// See [`build`](Self::build).
    pub fn build_with_metadata(self) -> Result<(CountingBloomFilter<H>, CountingFilterMetadata)> {
        validation::validate_items(self.expected_items)?;
        validation::validate_fp_rate(self.fp_rate)?;
        validation::validate_bucket_bits(self.bucket_bits)?;

        let filter = CountingBloomFilter::with_hasher(
            self.expected_items,
            self.bucket_bits,
            self.fp_rate,
            self.hasher,
        )?;

        let metadata = CountingFilterMetadata::describe(&filter, self.expected_items, self.fp_rate)?;
        Ok((filter, metadata))
    }
}

impl<H: BloomHasher> CountingBloomFilterBuilder<Explicit, H> {
    /// Build a filter with the explicit geometry.
    ///
    /// # Errors
    ///
    /// Returns error if `m == 0`, `k == 0` or `bucket_bits` is outside 1..=8.
    pub fn build(self) -> Result<CountingBloomFilter<H>> {
        let (m, k) = self.geometry;
        CountingBloomFilter::with_params_and_hasher(m, k, self.bucket_bits, self.hasher)
    }
}

/// Sizing details of a filter produced by
/// [`build_with_metadata`](CountingBloomFilterBuilder::build_with_metadata).
#[derive(Debug, Clone, PartialEq)]
pub struct CountingFilterMetadata {
    /// Expected number of items
    pub expected_items: usize,
    /// Target false positive rate
    pub fp_rate: f64,
    /// Number of buckets (m)
    pub buckets: usize,
    /// Number of hash rounds (k)
    pub hash_count: usize,
    /// Bits per bucket (b)
    pub bucket_bits: u8,
    /// Saturation point, `2^b - 1`
    pub max_bucket_value: u8,
    /// `(1 - e^(-kn/m))^k` at `expected_items`
    pub expected_fp_rate: f64,
}

impl CountingFilterMetadata {
    fn describe<H: BloomHasher>(
        filter: &CountingBloomFilter<H>,
        expected_items: usize,
        fp_rate: f64,
    ) -> Result<Self> {
        Ok(Self {
            expected_items,
            fp_rate,
            buckets: filter.capacity(),
            hash_count: filter.k(),
            bucket_bits: filter.bucket_bits(),
            max_bucket_value: filter.buckets().max_value(),
            expected_fp_rate: params::expected_fp_rate(filter.capacity(), expected_items, filter.k())?,
        })
    }

    /// Packed bucket storage in bytes.
    #[must_use]
    pub fn memory_bytes(&self) -> usize {
        params::estimated_memory_bytes(self.buckets, self.bucket_bits)
    }

    /// Packed bucket storage in kilobytes.
    #[must_use]
    pub fn memory_kb(&self) -> f64 {
        self.memory_bytes() as f64 / 1024.0
    }

    /// Storage bytes per expected item.
    #[must_use]
    pub fn bytes_per_item(&self) -> f64 {
        self.memory_bytes() as f64 / self.expected_items as f64
    }
}
