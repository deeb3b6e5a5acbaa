//! Cache admission with a counting Bloom filter.
//!
//! A key is admitted to the cache only on its second request within the
//! current window ("one-hit wonders" never take a slot). When a key is
//! evicted its history is removed from the filter, and the filter is reset
//! between windows.
//!
//! Run with logging:
//!
//! ```text
//! RUST_LOG=bloomcount=debug cargo run --example cache_admission
//! ```

use bloomcount::builder::CountingBloomFilterBuilder;
use bloomcount::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use tracing::info;
use tracing_subscriber::EnvFilter;

const CACHE_SLOTS: usize = 500;
const WINDOW: usize = 20_000;
const WINDOWS: usize = 3;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let (mut history, metadata) = CountingBloomFilterBuilder::new()
        .expected_items(WINDOW)
        .false_positive_rate(0.01)
        .bucket_bits(4)
        .build_with_metadata()?;

    info!(
        buckets = metadata.buckets,
        hash_rounds = metadata.hash_count,
        memory_bytes = metadata.memory_bytes(),
        "admission filter ready"
    );

    let mut rng = StdRng::seed_from_u64(42);
    let mut cache: VecDeque<u64> = VecDeque::with_capacity(CACHE_SLOTS);
    let (mut hits, mut admitted, mut rejected) = (0usize, 0usize, 0usize);

    for window in 0..WINDOWS {
        for _ in 0..WINDOW {
            // Skewed workload: a small hot set plus a long cold tail
            let key: u64 = if rng.gen_bool(0.7) {
                rng.gen_range(0..1_000)
            } else {
                rng.gen_range(0..1_000_000)
            };

            if cache.contains(&key) {
                hits += 1;
                continue;
            }

            if history.test_and_add(&key.to_be_bytes()) {
                if cache.len() == CACHE_SLOTS {
                    if let Some(evicted) = cache.pop_front() {
                        history.test_and_remove(&evicted.to_be_bytes());
                    }
                }
                cache.push_back(key);
                admitted += 1;
            } else {
                rejected += 1;
            }
        }

        info!(window, hits, admitted, rejected, "window complete");
        println!("{}", history.stats());
        history.reset();
    }

    let requests = WINDOW * WINDOWS;
    println!(
        "hit ratio {:.2}% over {requests} requests ({admitted} admitted, {rejected} one-hit wonders turned away)",
        hits as f64 / requests as f64 * 100.0
    );

    Ok(())
}
