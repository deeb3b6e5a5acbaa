//! Counting filter operation benchmarks
//!
//! # Scenarios
//!
//! 1. **add / test / test_and_remove** across filter sizes
//! 2. **Bucket width**: 1, 4 and 8 bit buckets, to expose the cost of
//!    counters that straddle word boundaries
//! 3. **Hash kernel**: FNV-1 vs FNV-1a (and XXH3 with `--features xxhash`)
//!    on short and long keys
use bloomcount::hash::{BloomHasher, Fnv1aHasher, FnvHasher};
use bloomcount::CountingBloomFilter;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SIZES: &[usize] = &[1_000, 100_000, 1_000_000];

fn generate_keys(count: usize, len: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(len)
                .map(char::from)
                .collect()
        })
        .collect()
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");

    for &size in SIZES {
        let keys = generate_keys(1_000, 32, 1);
        group.throughput(Throughput::Elements(keys.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut filter = CountingBloomFilter::with_default_buckets(size, 0.01).unwrap();
            b.iter(|| {
                for key in &keys {
                    filter.add(black_box(key));
                }
                filter.reset();
            });
        });
    }

    group.finish();
}

fn bench_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("test");

    for &size in SIZES {
        let mut filter = CountingBloomFilter::with_default_buckets(size, 0.01).unwrap();
        filter.add_batch(generate_keys(size.min(100_000), 32, 2));
        let hits = generate_keys(1_000, 32, 2);
        let misses = generate_keys(1_000, 32, 3);

        group.throughput(Throughput::Elements(1_000));
        group.bench_with_input(BenchmarkId::new("hit", size), &hits, |b, keys| {
            b.iter(|| keys.iter().filter(|key| filter.test(black_box(*key))).count());
        });
        group.bench_with_input(BenchmarkId::new("miss", size), &misses, |b, keys| {
            b.iter(|| keys.iter().filter(|key| filter.test(black_box(*key))).count());
        });
    }

    group.finish();
}

fn bench_test_and_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("test_and_remove");
    let keys = generate_keys(1_000, 32, 4);

    for &size in SIZES {
        group.throughput(Throughput::Elements(keys.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut filter = CountingBloomFilter::with_default_buckets(size, 0.01).unwrap();
            b.iter(|| {
                filter.add_batch(&keys);
                black_box(filter.remove_batch(&keys))
            });
        });
    }

    group.finish();
}

fn bench_bucket_width(c: &mut Criterion) {
    let mut group = c.benchmark_group("bucket_width");
    let keys = generate_keys(1_000, 16, 5);

    for bits in [1u8, 4, 5, 8] {
        group.throughput(Throughput::Elements(keys.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(bits), &bits, |b, &bits| {
            let mut filter = CountingBloomFilter::new(100_000, bits, 0.01).unwrap();
            b.iter(|| {
                for key in &keys {
                    black_box(filter.test_and_add(key));
                }
                filter.reset();
            });
        });
    }

    group.finish();
}

fn bench_kernel<H: BloomHasher>(c: &mut Criterion, name: &str, hasher: H) {
    let mut group = c.benchmark_group(format!("kernel/{name}"));

    for len in [8usize, 64, 512] {
        let key = vec![0xa5u8; len];
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &key, |b, key| {
            b.iter(|| hasher.hash_kernel(black_box(key)));
        });
    }

    group.finish();
}

fn bench_kernels(c: &mut Criterion) {
    bench_kernel(c, "fnv1", FnvHasher::new());
    bench_kernel(c, "fnv1a", Fnv1aHasher::new());
    #[cfg(feature = "xxhash")]
    bench_kernel(c, "xxh3", bloomcount::hash::XxHasher::new());
}

criterion_group!(
    benches,
    bench_add,
    bench_test,
    bench_test_and_remove,
    bench_bucket_width,
    bench_kernels
);
criterion_main!(benches);
