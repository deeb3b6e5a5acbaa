//! Builder pattern for counting filter construction.
//!
//! The builder is the configuration layer of the crate: required parameters
//! are enforced at compile time through type states, value ranges are
//! checked at `build()`.
//!
//! # Design Philosophy
//!
//! ## Type-State Pattern
//!
//! Each builder method that supplies a required parameter moves the builder
//! into a new state; `build()` only exists on complete states.
//!
//! ```compile_fail
//! use bloomcount::builder::CountingBloomFilterBuilder;
//!
//! // No false positive rate yet: `build` is not available.
//! let filter = CountingBloomFilterBuilder::new().expected_items(100).build();
//! ```
//!
//! ## Error Handling
//!
//! - **Compile-time errors**: missing required parameters
//! - **Runtime errors**: invalid parameter values (out of range)
//!
//! # Examples
//!
//! ```
//! use bloomcount::builder::CountingBloomFilterBuilder;
//!
//! let filter = CountingBloomFilterBuilder::new()
//!     .expected_items(10_000)
//!     .false_positive_rate(0.01)
//!     .bucket_bits(4)  // Optional, defaults to 4
//!     .build()
//!     .unwrap();
//! assert!(filter.is_empty());
//! ```

#![allow(clippy::module_name_repetitions)]

pub mod counting;

pub use counting::{CountingBloomFilterBuilder, CountingFilterMetadata};

/// Validation shared by builders.
mod validation {
    use crate::core::params;
    use crate::error::{BloomCountError, Result};

    /// Validate expected items count.
    ///
    /// # Errors
    ///
    /// Returns error if `items == 0`.
    #[inline]
    pub fn validate_items(items: usize) -> Result<()> {
        if items == 0 {
            return Err(BloomCountError::invalid_item_count(items));
        }
        Ok(())
    }

    /// Validate false positive rate.
    ///
    /// # Errors
    ///
    /// Returns error if `fp_rate` is not in (0, 1).
    #[inline]
    pub fn validate_fp_rate(fp_rate: f64) -> Result<()> {
        params::validate_fp_rate(fp_rate)
    }

    /// Validate bucket width.
    ///
    /// # Errors
    ///
    /// Returns error if `bucket_bits` is not in 1..=8.
    #[inline]
    pub fn validate_bucket_bits(bucket_bits: u8) -> Result<()> {
        params::validate_bucket_bits(bucket_bits)
    }
}

/// Prelude for convenient builder imports.
pub mod prelude {
    pub use super::CountingBloomFilterBuilder;
}
