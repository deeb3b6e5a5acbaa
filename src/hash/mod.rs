//! Hash kernels and index strategies.
//!
//! # Module Structure
//!
//! ```text
//! hash/
//! ├── hasher.rs      - BloomHasher trait, FNV-1 (default) and FNV-1a
//! ├── strategies.rs  - Double hashing index derivation
//! ├── xxhash.rs      - XXH3 kernel (optional, feature = "xxhash")
//! └── mod.rs         - This file (public API)
//! ```
//!
//! # Choosing a Hash Function
//!
//! | Hash Function   | Speed  | Use Case                               |
//! |-----------------|--------|----------------------------------------|
//! | [`FnvHasher`]   | Fast   | Default, short keys                    |
//! | [`Fnv1aHasher`] | Fast   | Short keys with shared suffixes        |
//! | `XxHasher`      | Fastest on long keys | Keys over ~64 bytes      |
//!
//! # Feature Flags
//!
//! | Feature   | Enables      |
//! |-----------|--------------|
//! | (default) | FNV kernels  |
//! | `xxhash`  | `XxHasher`   |
//!
//! # Examples
//!
//! ```
//! use bloomcount::hash::{BloomHasher, DoubleHashing, FnvHasher, HashStrategy};
//!
//! let (lower, upper) = FnvHasher::new().hash_kernel(b"test");
//! let indices = DoubleHashing.indices(lower, upper, 7, 1000);
//! assert_eq!(indices.len(), 7);
//! ```

pub mod hasher;
pub mod strategies;

#[cfg(feature = "xxhash")]
pub mod xxhash;

pub use hasher::{BloomHasher, Fnv1aHasher, FnvHasher};
pub use strategies::{DoubleHashing, HashStrategy};

#[cfg(feature = "xxhash")]
pub use xxhash::XxHasher;

/// Kernel used when none is specified.
pub type DefaultHasher = FnvHasher;
