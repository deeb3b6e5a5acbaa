//! Filter implementations.
//!
//! - [`CountingBloomFilter`] - packed `b`-bit saturating buckets, supports removal
//!
//! # Examples
//!
//! ```
//! use bloomcount::filters::CountingBloomFilter;
//!
//! let mut filter = CountingBloomFilter::with_default_buckets(10_000, 0.01).unwrap();
//! filter.add("temporary");
//! assert!(filter.test("temporary"));
//!
//! filter.test_and_remove("temporary");
//! assert!(!filter.test("temporary"));
//! ```

pub mod counting;

pub use counting::{CountingBloomFilter, FilterStats};
