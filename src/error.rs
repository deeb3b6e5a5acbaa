//! Error types for bloomcount operations.
//!
//! Errors only arise while configuring a filter. Once a filter exists, `add`,
//! `test`, `test_and_add`, `test_and_remove` and `reset` never fail for any
//! input bytes.
//!
//! # Error Propagation
//!
//! ```
//! use bloomcount::{Result, BloomCountError};
//! use bloomcount::core::params::{optimal_bucket_count, optimal_hash_count};
//!
//! fn size_filter(n: usize, fp: f64) -> Result<(usize, usize)> {
//!     let m = optimal_bucket_count(n, fp)?;
//!     let k = optimal_hash_count(m, n)?;
//!     Ok((m, k))
//! }
//! # assert!(size_filter(1000, 0.01).is_ok());
//! # assert!(size_filter(0, 0.01).is_err());
//! ```

#![allow(clippy::module_name_repetitions)]

use thiserror::Error;

/// Result type alias for bloomcount operations.
pub type Result<T> = std::result::Result<T, BloomCountError>;

/// Errors that can occur while constructing or inspecting a counting filter.
///
/// `Clone` + `PartialEq` keep errors easy to assert on in tests.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BloomCountError {
    /// Invalid filter parameters provided during construction.
    #[error("Invalid counting filter parameters: {message}.")]
    InvalidParameters {
        /// Human-readable description of what's invalid.
        message: String,
    },

    /// False positive rate outside the open interval (0, 1).
    #[error("False positive rate {fp_rate} is out of bounds. Must be in range (0, 1).")]
    FalsePositiveRateOutOfBounds {
        /// The rejected false positive rate.
        fp_rate: f64,
    },

    /// Expected item count of zero, which would size a degenerate filter.
    #[error("Invalid item count: {count}. Expected items must be greater than 0.")]
    InvalidItemCount {
        /// The rejected count.
        count: usize,
    },

    /// Number of hash rounds outside the supported range.
    #[error("Invalid hash function count: {count}. Must be in range [{min}, {max}].")]
    InvalidHashCount {
        /// The rejected hash count.
        count: usize,
        /// Minimum allowed value.
        min: usize,
        /// Maximum allowed value.
        max: usize,
    },

    /// Bucket count of zero or beyond addressable memory.
    #[error("Invalid filter size: {size} buckets. Must be positive and within memory limits.")]
    InvalidFilterSize {
        /// The rejected bucket count.
        size: usize,
    },

    /// Bucket width outside the supported bit range.
    #[error("Invalid bucket width: {bits} bits. Must be in range [{min}, {max}].")]
    InvalidBucketWidth {
        /// The rejected width in bits.
        bits: u8,
        /// Minimum allowed width.
        min: u8,
        /// Maximum allowed width.
        max: u8,
    },

    /// Bucket index at or beyond the bucket count.
    #[error("Index {index} out of bounds for bucket array of length {length}")]
    IndexOutOfBounds {
        /// The invalid index that was accessed.
        index: usize,
        /// Number of buckets in the array.
        length: usize,
    },
}

impl BloomCountError {
    /// Create an `InvalidParameters` error with a formatted message.
    ///
    /// # Examples
    /// ```
    /// use bloomcount::BloomCountError;
    ///
    /// let err = BloomCountError::invalid_parameters(
    ///     format!("m={} is smaller than k={}", 4, 7)
    /// );
    /// assert!(err.to_string().contains("m=4"));
    /// ```
    #[must_use]
    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Self::InvalidParameters {
            message: message.into(),
        }
    }

    /// Create a `FalsePositiveRateOutOfBounds` error.
    #[must_use]
    pub fn fp_rate_out_of_bounds(fp_rate: f64) -> Self {
        Self::FalsePositiveRateOutOfBounds { fp_rate }
    }

    /// Create an `InvalidItemCount` error.
    #[must_use]
    pub fn invalid_item_count(count: usize) -> Self {
        Self::InvalidItemCount { count }
    }

    /// Create an `InvalidHashCount` error.
    #[must_use]
    pub fn invalid_hash_count(count: usize, min: usize, max: usize) -> Self {
        Self::InvalidHashCount { count, min, max }
    }

    /// Create an `InvalidFilterSize` error.
    #[must_use]
    pub fn invalid_filter_size(size: usize) -> Self {
        Self::InvalidFilterSize { size }
    }

    /// Create an `InvalidBucketWidth` error.
    #[must_use]
    pub fn invalid_bucket_width(bits: u8, min: u8, max: u8) -> Self {
        Self::InvalidBucketWidth { bits, min, max }
    }

    /// Create an `IndexOutOfBounds` error.
    #[must_use]
    pub fn index_out_of_bounds(index: usize, length: usize) -> Self {
        Self::IndexOutOfBounds { index, length }
    }

    /// Whether this error describes a rejected configuration, as opposed to
    /// a checked bucket read out of range.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, Self::IndexOutOfBounds { .. })
    }
}
