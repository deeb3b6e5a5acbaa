//! Packed array of fixed-width saturating counters.
//!
//! `BucketArray` stores `m` unsigned counters of `b` bits each (1 ≤ b ≤ 8)
//! back to back in a `Box<[u64]>`. Memory grows with `m · b` bits rather than
//! one machine word per counter.
//!
//! # Memory Layout
//!
//! Counters are packed LSB-first into 64-bit words. Counter `i` occupies bits
//! `[i·b, (i+1)·b)` of the concatenated words, so for widths that do not
//! divide 64 a counter can straddle two words:
//!
//! ```text
//! b = 5
//! Word 0: [c0: 0..5][c1: 5..10] ... [c11: 55..60][c12 low: 60..64]
//! Word 1: [c12 high: 0..1][c13: 1..6] ...
//! ```
//!
//! # Saturation Policy
//!
//! - Increments clamp at `2^b - 1` and never carry into the neighbouring counter.
//! - Decrements (negative deltas) clamp at 0. Underflow is never reported.
//!
//! # Examples
//!
//! ```
//! use bloomcount::core::buckets::BucketArray;
//!
//! let mut buckets = BucketArray::new(100, 4).unwrap();
//! assert_eq!(buckets.increment(7, 1), 1);
//! assert_eq!(buckets.increment(7, 20), 15); // saturates at 2^4 - 1
//! assert_eq!(buckets.increment(7, -100), 0); // clamps at zero
//! assert_eq!(buckets.get(8), 0);
//! ```

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use crate::error::{BloomCountError, Result};

/// Narrowest supported bucket width in bits.
pub const MIN_BUCKET_BITS: u8 = 1;

/// Widest supported bucket width in bits. Bucket values are returned as `u8`.
pub const MAX_BUCKET_BITS: u8 = 8;

const WORD_BITS: usize = 64;

/// Densely packed array of saturating `b`-bit counters.
///
/// `m` and `b` are fixed at construction. The only bulk mutation is
/// [`reset`](Self::reset), which zeroes every counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketArray {
    /// Packed counter storage.
    words: Box<[u64]>,

    /// Number of buckets (m).
    len: usize,

    /// Width of each bucket in bits (b).
    bucket_bits: u8,

    /// `2^b - 1`, doubles as the value mask.
    max_value: u8,
}

impl BucketArray {
    /// Create a zeroed array of `bucket_count` counters, each `bucket_bits` wide.
    ///
    /// # Errors
    ///
    /// - [`BloomCountError::InvalidFilterSize`] if `bucket_count == 0` or the
    ///   packed size overflows `usize`
    /// - [`BloomCountError::InvalidBucketWidth`] if `bucket_bits` is not in
    ///   `[MIN_BUCKET_BITS, MAX_BUCKET_BITS]`
    ///
    /// # Examples
    ///
    /// ```
    /// use bloomcount::core::buckets::BucketArray;
    ///
    /// let buckets = BucketArray::new(1000, 4).unwrap();
    /// assert_eq!(buckets.len(), 1000);
    /// assert_eq!(buckets.max_value(), 15);
    /// assert!(BucketArray::new(0, 4).is_err());
    /// assert!(BucketArray::new(10, 9).is_err());
    /// ```
    pub fn new(bucket_count: usize, bucket_bits: u8) -> Result<Self> {
        if bucket_count == 0 {
            return Err(BloomCountError::invalid_filter_size(bucket_count));
        }

        if !(MIN_BUCKET_BITS..=MAX_BUCKET_BITS).contains(&bucket_bits) {
            return Err(BloomCountError::invalid_bucket_width(
                bucket_bits,
                MIN_BUCKET_BITS,
                MAX_BUCKET_BITS,
            ));
        }

        let total_bits = bucket_count
            .checked_mul(usize::from(bucket_bits))
            .ok_or_else(|| BloomCountError::invalid_filter_size(bucket_count))?;
        let num_words = total_bits / WORD_BITS + usize::from(total_bits % WORD_BITS != 0);

        Ok(Self {
            words: vec![0u64; num_words].into_boxed_slice(),
            len: bucket_count,
            bucket_bits,
            max_value: ((1u16 << bucket_bits) - 1) as u8,
        })
    }

    /// Number of buckets (m).
    #[must_use]
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always `false` for a constructed array; `new` rejects zero buckets.
    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Width of each bucket in bits (b).
    #[must_use]
    #[inline]
    pub const fn bucket_bits(&self) -> u8 {
        self.bucket_bits
    }

    /// Largest value a bucket can hold, `2^b - 1`.
    #[must_use]
    #[inline]
    pub const fn max_value(&self) -> u8 {
        self.max_value
    }

    /// Read the counter at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`. Filters only produce indices reduced modulo
    /// `m`, so reaching this panic means internal state is corrupt.
    #[must_use]
    #[inline]
    pub fn get(&self, index: usize) -> u8 {
        self.check_index(index);
        self.read(index)
    }

    /// Read the counter at `index`, reporting out-of-range access as an error.
    ///
    /// # Errors
    ///
    /// Returns [`BloomCountError::IndexOutOfBounds`] if `index >= len`.
    pub fn try_get(&self, index: usize) -> Result<u8> {
        if index >= self.len {
            return Err(BloomCountError::index_out_of_bounds(index, self.len));
        }
        Ok(self.read(index))
    }

    /// Add `delta` to the counter at `index` and return the new value.
    ///
    /// The result is clamped to `[0, max_value()]`: positive deltas saturate
    /// at the maximum and negative deltas stop at zero.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bloomcount::core::buckets::BucketArray;
    ///
    /// let mut buckets = BucketArray::new(8, 2).unwrap();
    /// assert_eq!(buckets.increment(3, 2), 2);
    /// assert_eq!(buckets.increment(3, 2), 3);
    /// assert_eq!(buckets.increment(3, -1), 2);
    /// ```
    #[inline]
    pub fn increment(&mut self, index: usize, delta: i32) -> u8 {
        self.check_index(index);

        let current = i32::from(self.read(index));
        let value = current
            .saturating_add(delta)
            .clamp(0, i32::from(self.max_value)) as u8;

        self.write(index, value);
        value
    }

    /// Zero every counter. O(m·b/64).
    pub fn reset(&mut self) {
        self.words.fill(0);
    }

    /// Iterate over every counter value in index order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.len).map(move |index| self.read(index))
    }

    /// Number of counters holding a non-zero value.
    #[must_use]
    pub fn count_nonzero(&self) -> usize {
        self.iter().filter(|&value| value > 0).count()
    }

    /// Number of counters pinned at `max_value()`.
    #[must_use]
    pub fn count_saturated(&self) -> usize {
        self.iter().filter(|&value| value == self.max_value).count()
    }

    /// Bytes of packed counter storage.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.words.len() * std::mem::size_of::<u64>()
    }

    #[inline]
    fn check_index(&self, index: usize) {
        assert!(
            index < self.len,
            "BucketArray index out of bounds: index={} len={}",
            index,
            self.len
        );
    }

    #[inline]
    fn read(&self, index: usize) -> u8 {
        let width = usize::from(self.bucket_bits);
        let bit = index * width;
        let word = bit / WORD_BITS;
        let shift = bit % WORD_BITS;

        let mut raw = self.words[word] >> shift;
        if shift + width > WORD_BITS {
            raw |= self.words[word + 1] << (WORD_BITS - shift);
        }

        (raw & u64::from(self.max_value)) as u8
    }

    #[inline]
    fn write(&mut self, index: usize, value: u8) {
        let width = usize::from(self.bucket_bits);
        let bit = index * width;
        let word = bit / WORD_BITS;
        let shift = bit % WORD_BITS;
        let mask = u64::from(self.max_value);
        let value = u64::from(value) & mask;

        self.words[word] = (self.words[word] & !(mask << shift)) | (value << shift);

        if shift + width > WORD_BITS {
            // Upper part of a counter that straddles into the next word.
            let written = WORD_BITS - shift;
            let high_mask = mask >> written;
            self.words[word + 1] = (self.words[word + 1] & !high_mask) | (value >> written);
        }
    }
}
