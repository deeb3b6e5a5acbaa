//! Optimal parameter calculation for counting Bloom filters.
//!
//! A counting filter answers membership the same way a classic Bloom filter
//! does (all k buckets non-zero), so it is sized with the classic formulas;
//! each bit is simply replaced by a `b`-bit bucket.
//!
//! Given:
//! - `n`: Expected number of elements
//! - `ε`: Target false positive rate
//!
//! Optimal parameters:
//! - `m = ⌈-n × ln(ε) / (ln 2)²⌉` (buckets in filter)
//! - `k = max(1, round((m/n) × ln 2))` (hash rounds)
//!
//! Expected false positive rate:
//! - `p = (1 - e^(-kn/m))^k`
//!
//! # References
//!
//! - Bloom, Burton H. (1970). "Space/Time Trade-offs in Hash Coding with Allowable Errors"
//! - Fan, Cao, Almeida & Broder (2000). "Summary Cache: A Scalable Wide-Area Web Cache Sharing Protocol"

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

use crate::core::buckets::{MAX_BUCKET_BITS, MIN_BUCKET_BITS};
use crate::error::{BloomCountError, Result};
use std::f64::consts::LN_2;

/// (ln 2)² ≈ 0.4804530139182014
const LN2_SQUARED: f64 = LN_2 * LN_2;

/// Upper bound on hash rounds. Round numbers stay below 2³², which keeps
/// `lower + upper·i` inside 64 bits.
pub const MAX_HASH_FUNCTIONS: usize = u32::MAX as usize;

/// Minimum number of hash rounds.
pub const MIN_HASH_FUNCTIONS: usize = 1;

/// Bucket width used by the default constructors. Four bits count up to 15
/// before saturating, which comfortably covers properly sized filters.
pub const DEFAULT_BUCKET_BITS: u8 = 4;

/// Calculate the optimal number of buckets for `n` items at rate `fp_rate`.
///
/// Implements `m = ⌈-n × ln(ε) / (ln 2)²⌉`.
///
/// # Errors
///
/// - [`BloomCountError::InvalidItemCount`] if `n == 0`
/// - [`BloomCountError::FalsePositiveRateOutOfBounds`] if `fp_rate` is not in (0, 1)
/// - [`BloomCountError::InvalidParameters`] if the result exceeds addressable memory
///
/// # Examples
///
/// ```
/// use bloomcount::core::params::optimal_bucket_count;
///
/// let m = optimal_bucket_count(1000, 0.01).unwrap();
/// assert_eq!(m, 9586);
/// ```
pub fn optimal_bucket_count(n: usize, fp_rate: f64) -> Result<usize> {
    if n == 0 {
        return Err(BloomCountError::invalid_item_count(n));
    }

    validate_fp_rate(fp_rate)?;

    let m = (-(n as f64) * fp_rate.ln() / LN2_SQUARED).ceil();

    if !m.is_finite() || m >= (usize::MAX / 2) as f64 {
        return Err(BloomCountError::invalid_parameters(format!(
            "Calculated bucket count {m:.0} exceeds reasonable bounds. \
             Consider increasing false positive rate or reducing item count"
        )));
    }

    Ok((m as usize).max(1))
}

/// Calculate the optimal number of hash rounds for `m` buckets and `n` items.
///
/// Implements `k = max(1, round((m/n) × ln 2))`. The result is also capped at
/// [`MAX_HASH_FUNCTIONS`], which no real filter approaches.
///
/// # Errors
///
/// - [`BloomCountError::InvalidFilterSize`] if `m == 0`
/// - [`BloomCountError::InvalidItemCount`] if `n == 0`
///
/// # Examples
///
/// ```
/// use bloomcount::core::params::optimal_hash_count;
///
/// assert_eq!(optimal_hash_count(9586, 1000).unwrap(), 7);
/// assert_eq!(optimal_hash_count(10, 100_000).unwrap(), 1);
/// assert_eq!(optimal_hash_count(57511, 1000).unwrap(), 40);
/// ```
pub fn optimal_hash_count(m: usize, n: usize) -> Result<usize> {
    if m == 0 {
        return Err(BloomCountError::invalid_filter_size(m));
    }

    if n == 0 {
        return Err(BloomCountError::invalid_item_count(n));
    }

    let k = ((m as f64 / n as f64) * LN_2).round() as usize;

    Ok(k.clamp(MIN_HASH_FUNCTIONS, MAX_HASH_FUNCTIONS))
}

/// Compute `(m, k)` for `n` items at target rate `fp_rate`.
///
/// # Errors
///
/// See [`optimal_bucket_count`].
///
/// # Examples
///
/// ```
/// use bloomcount::core::params::calculate_filter_params;
///
/// let (m, k) = calculate_filter_params(1000, 0.01).unwrap();
/// assert_eq!((m, k), (9586, 7));
/// ```
pub fn calculate_filter_params(n: usize, fp_rate: f64) -> Result<(usize, usize)> {
    let m = optimal_bucket_count(n, fp_rate)?;
    let k = optimal_hash_count(m, n)?;
    Ok((m, k))
}

/// Theoretical false positive rate after `n` insertions into `m` buckets with
/// `k` hash rounds: `(1 - e^(-kn/m))^k`.
///
/// Assumes no bucket has saturated and nothing has been removed.
///
/// # Errors
///
/// - [`BloomCountError::InvalidFilterSize`] if `m == 0`
/// - [`BloomCountError::InvalidHashCount`] if `k` is outside valid bounds
pub fn expected_fp_rate(m: usize, n: usize, k: usize) -> Result<f64> {
    if m == 0 {
        return Err(BloomCountError::invalid_filter_size(m));
    }

    validate_hash_count(k)?;

    if n == 0 {
        return Ok(0.0);
    }

    let k_f64 = k as f64;
    let exponent = -(k_f64 * n as f64) / m as f64;
    let fp_rate = (1.0 - exponent.exp()).powf(k_f64);

    Ok(fp_rate.clamp(0.0, 1.0))
}

/// Buckets needed per element for a target false positive rate,
/// `-ln(ε) / (ln 2)²`.
///
/// # Errors
///
/// Returns an error if `fp_rate` is not in (0, 1).
///
/// # Examples
///
/// ```
/// use bloomcount::core::params::buckets_per_element;
///
/// let bpe = buckets_per_element(0.01).unwrap();
/// assert!((bpe - 9.6).abs() < 0.1);
/// ```
pub fn buckets_per_element(fp_rate: f64) -> Result<f64> {
    validate_fp_rate(fp_rate)?;
    Ok(-fp_rate.ln() / LN2_SQUARED)
}

/// Bytes of packed bucket storage for `m` buckets of `bucket_bits` bits.
///
/// # Examples
///
/// ```
/// use bloomcount::core::params::estimated_memory_bytes;
///
/// assert_eq!(estimated_memory_bytes(1000, 4), 504);
/// ```
#[must_use]
pub fn estimated_memory_bytes(m: usize, bucket_bits: u8) -> usize {
    let bits = m.saturating_mul(usize::from(bucket_bits));
    (bits / 64 + usize::from(bits % 64 != 0)) * 8
}

/// Validate an explicit `(m, k, b)` geometry.
///
/// # Validation Rules
///
/// 1. `m > 0`
/// 2. `1 ≤ k ≤ u32::MAX`
/// 3. `1 ≤ b ≤ 8`
///
/// `k > m` is allowed: rounds then revisit buckets, which only costs accuracy.
///
/// # Errors
///
/// Returns the first rule violated.
///
/// # Examples
///
/// ```
/// use bloomcount::core::params::validate_params;
///
/// assert!(validate_params(1000, 7, 4).is_ok());
/// assert!(validate_params(0, 7, 4).is_err());
/// assert!(validate_params(1000, 0, 4).is_err());
/// assert!(validate_params(1000, 7, 12).is_err());
/// ```
pub fn validate_params(m: usize, k: usize, bucket_bits: u8) -> Result<()> {
    if m == 0 {
        return Err(BloomCountError::invalid_filter_size(m));
    }

    validate_hash_count(k)?;
    validate_bucket_bits(bucket_bits)
}

/// Check that `fp_rate` lies strictly between 0 and 1 (NaN is rejected).
///
/// # Errors
///
/// Returns [`BloomCountError::FalsePositiveRateOutOfBounds`] otherwise.
pub fn validate_fp_rate(fp_rate: f64) -> Result<()> {
    if fp_rate > 0.0 && fp_rate < 1.0 {
        Ok(())
    } else {
        Err(BloomCountError::fp_rate_out_of_bounds(fp_rate))
    }
}

/// Check that `bucket_bits` is a supported width.
///
/// # Errors
///
/// Returns [`BloomCountError::InvalidBucketWidth`] otherwise.
pub fn validate_bucket_bits(bucket_bits: u8) -> Result<()> {
    if (MIN_BUCKET_BITS..=MAX_BUCKET_BITS).contains(&bucket_bits) {
        Ok(())
    } else {
        Err(BloomCountError::invalid_bucket_width(
            bucket_bits,
            MIN_BUCKET_BITS,
            MAX_BUCKET_BITS,
        ))
    }
}

fn validate_hash_count(k: usize) -> Result<()> {
    if (MIN_HASH_FUNCTIONS..=MAX_HASH_FUNCTIONS).contains(&k) {
        Ok(())
    } else {
        Err(BloomCountError::invalid_hash_count(
            k,
            MIN_HASH_FUNCTIONS,
            MAX_HASH_FUNCTIONS,
        ))
    }
}
