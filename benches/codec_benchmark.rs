//! Benchmark suite for the `pforlib` compression codecs.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pforlib::{codec_by_name, CodecToSlice, Delta};
use rand::rngs::StdRng;
use rand::{Rng as _, SeedableRng};

const SIZES: &[usize; 2] = &[1024, 65536];
const SEED: u64 = 456;

type DataGeneratorFn = fn(usize) -> Vec<u32>;

/// Generate uniformly distributed values below 1000
fn generate_small_values(size: usize) -> Vec<u32> {
    let mut rng = StdRng::seed_from_u64(SEED);
    (0..size).map(|_| rng.random_range(0..1000)).collect()
}

/// Generate clustered data - values gather around changing base values
fn generate_clustered_data(size: usize) -> Vec<u32> {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut data = Vec::with_capacity(size);
    let mut base = 0u32;

    for _ in 0..size {
        // 10% chance to jump to a new cluster
        if rng.random_bool(0.1) {
            base = rng.random_range(0..1_000_000);
        }
        data.push(base + rng.random_range(0..10));
    }
    data
}

/// Generate a sorted sequence delta-encoded ahead of compression
fn generate_sorted_deltas(size: usize) -> Vec<u32> {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut acc = 0u32;
    let mut data: Vec<u32> = (0..size)
        .map(|_| {
            acc = acc.wrapping_add(rng.random_range(1..100));
            acc
        })
        .collect();
    Delta::forward1(&mut data);
    data
}

fn generators() -> Vec<(&'static str, DataGeneratorFn)> {
    vec![
        ("small", generate_small_values),
        ("clustered", generate_clustered_data),
        ("sorted_deltas", generate_sorted_deltas),
    ]
}

fn bench_codecs(c: &mut Criterion) {
    for codec_name in ["fastpfor256", "simdfastpfor256", "bp32", "vbyte"] {
        let mut group = c.benchmark_group(codec_name);
        for &size in SIZES {
            for (data_name, generator) in generators() {
                let data = generator(size);
                let mut codec = codec_by_name(codec_name).unwrap();
                let mut compressed = vec![0u32; codec.max_compressed_words(size)];
                let compressed_len = codec
                    .compress_to_slice(&data, &mut compressed)
                    .unwrap()
                    .len();
                let mut decoded = vec![0u32; size];

                group.throughput(Throughput::Elements(size as u64));
                group.bench_with_input(
                    BenchmarkId::new(format!("encode/{data_name}"), size),
                    &data,
                    |b, data| {
                        b.iter(|| {
                            black_box(
                                codec
                                    .compress_to_slice(black_box(data), &mut compressed)
                                    .unwrap()
                                    .len(),
                            )
                        });
                    },
                );
                group.bench_with_input(
                    BenchmarkId::new(format!("decode/{data_name}"), size),
                    &compressed_len,
                    |b, &compressed_len| {
                        b.iter(|| {
                            black_box(
                                codec
                                    .decompress_to_slice(
                                        black_box(&compressed[..compressed_len]),
                                        &mut decoded,
                                    )
                                    .unwrap()
                                    .len(),
                            )
                        });
                    },
                );
            }
        }
        group.finish();
    }
}

fn bench_delta(c: &mut Criterion) {
    let mut group = c.benchmark_group("delta");
    for &size in SIZES {
        let data = generate_clustered_data(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("forward1", size), &data, |b, data| {
            b.iter(|| {
                let mut buf = data.clone();
                Delta::forward1(&mut buf);
                black_box(buf)
            });
        });
        group.bench_with_input(BenchmarkId::new("inverse1", size), &data, |b, data| {
            b.iter(|| {
                let mut buf = data.clone();
                Delta::inverse1(&mut buf);
                black_box(buf)
            });
        });
        group.bench_with_input(BenchmarkId::new("inverse4", size), &data, |b, data| {
            b.iter(|| {
                let mut buf = data.clone();
                Delta::inverse4(&mut buf);
                black_box(buf)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_codecs, bench_delta);
criterion_main!(benches);
