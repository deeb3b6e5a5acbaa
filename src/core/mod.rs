//! Core building blocks shared by the filter implementations.
//!
//! ```text
//! core/
//! ├── buckets.rs   - Packed saturating counter array
//! ├── filter.rs    - Trait definitions
//! ├── params.rs    - Sizing formulas
//! └── mod.rs       - This file
//! ```
//!
//! `BucketArray` knows nothing about hashing or set semantics; it only stores
//! small counters. Filters combine it with a hash kernel and the sizing
//! functions in [`params`].

pub mod buckets;
pub mod filter;
pub mod params;

pub use buckets::{BucketArray, MAX_BUCKET_BITS, MIN_BUCKET_BITS};
pub use filter::{BloomFilter, DeletableBloomFilter};
pub use params::{
    calculate_filter_params, expected_fp_rate, optimal_bucket_count, optimal_hash_count,
    DEFAULT_BUCKET_BITS,
};
