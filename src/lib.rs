//! BloomCount: counting Bloom filters over packed saturating buckets.
//!
//! A counting Bloom filter is a compact approximate set that, unlike a classic
//! Bloom filter, supports removal. Each of its `m` positions is a small
//! `b`-bit counter instead of a single bit. It can produce:
//! - **False positives**: an element never added may test as present
//! - **False negatives**: only after removals or bucket saturation
//!
//! # Quick Start
//!
//! ```
//! use bloomcount::CountingBloomFilter;
//!
//! // 1,000 elements at 1% false positive rate, 4-bit buckets
//! let mut filter = CountingBloomFilter::with_default_buckets(1000, 0.01).unwrap();
//!
//! filter.add(b"a");
//! assert!(filter.test(b"a"));
//! assert_eq!(filter.count(), 1);
//!
//! assert!(filter.test_and_remove(b"a"));
//! assert_eq!(filter.count(), 0);
//! assert!(!filter.test_and_remove(b"a"));
//! ```
//!
//! # How It Works
//!
//! ```text
//! element bytes ──▶ hash kernel (one 64-bit digest)
//!                     │
//!                     ▼
//!               (lower, upper) 32-bit halves
//!                     │
//!                     ▼  i = 0..k
//!           (lower + upper·i) mod m ──▶ BucketArray get / increment
//! ```
//!
//! Every operation is O(k) and hashes the element exactly once.
//!
//! # Concurrency
//!
//! Filters are plain single-owner values: mutation takes `&mut self`, queries
//! take `&self`. Wrap a filter in a lock to share it:
//!
//! ```
//! use bloomcount::CountingBloomFilter;
//! use std::sync::{Arc, RwLock};
//!
//! let filter = Arc::new(RwLock::new(
//!     CountingBloomFilter::with_default_buckets(10_000, 0.01).unwrap(),
//! ));
//!
//! let writer = Arc::clone(&filter);
//! std::thread::spawn(move || {
//!     writer.write().unwrap().add("item");
//! })
//! .join()
//! .unwrap();
//!
//! assert!(filter.read().unwrap().test("item"));
//! ```
//!
//! # Using the Builder
//!
//! ```
//! use bloomcount::builder::CountingBloomFilterBuilder;
//!
//! let filter = CountingBloomFilterBuilder::new()
//!     .expected_items(10_000)
//!     .false_positive_rate(0.01)
//!     .bucket_bits(8)
//!     .build()
//!     .unwrap();
//! assert_eq!(filter.bucket_bits(), 8);
//! ```
//!
//! # Logging
//!
//! The crate emits [`tracing`] events (filter construction and reset at
//! `debug`, the first bucket saturation at `warn`, rejected removals at
//! `trace`). It never installs a subscriber.
//!
//! # Optional Features
//!
//! - `xxhash` - XXH3 hash kernel (`hash::XxHasher`)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::double_must_use)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc(html_root_url = "https://docs.rs/bloomcount/0.1.0")]

/// Core data structures and traits
pub mod core;

/// Error types and result aliases
pub mod error;

/// Filter implementations
pub mod filters;

/// Hash kernels and index strategies
pub mod hash;

/// Type-safe builders
pub mod builder;

// Re-export commonly used types at crate root
pub use error::{BloomCountError, Result};

pub use crate::core::buckets::BucketArray;
pub use crate::core::filter::{BloomFilter, DeletableBloomFilter};

pub use filters::{CountingBloomFilter, FilterStats};

pub use builder::CountingBloomFilterBuilder;

pub use hash::{BloomHasher, DefaultHasher, Fnv1aHasher, FnvHasher};

#[cfg(feature = "xxhash")]
pub use hash::XxHasher;

/// Prelude for convenient imports.
///
/// ```
/// use bloomcount::prelude::*;
///
/// let mut filter = CountingBloomFilter::with_default_buckets(100, 0.01).unwrap();
/// filter.insert(b"via trait");
/// assert!(filter.contains(b"via trait"));
/// ```
pub mod prelude {
    pub use crate::builder::CountingBloomFilterBuilder;
    pub use crate::core::{BloomFilter, DeletableBloomFilter};
    pub use crate::error::{BloomCountError, Result};
    pub use crate::filters::CountingBloomFilter;
    pub use crate::hash::{BloomHasher, FnvHasher};
}
