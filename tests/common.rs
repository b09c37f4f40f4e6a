#![allow(dead_code)]

use pforlib::{all_names, codec_by_name, Codec};
use rand::rngs::StdRng;
use rand::{Rng as _, SeedableRng as _};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One freshly constructed instance of every registered codec.
pub fn all_codecs() -> Vec<(&'static str, Codec)> {
    all_names()
        .iter()
        .map(|name| (*name, codec_by_name(name).expect("registered codec")))
        .collect()
}

pub fn random_data(n: usize, seed: u64) -> Vec<u32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.random()).collect()
}

pub fn get_test_cases(n: usize) -> Vec<Vec<u32>> {
    let mut rng = StdRng::seed_from_u64(14);

    vec![
        // Zeroes
        vec![0u32; n],
        // Same non-zero
        vec![14u32; n],
        // Ascending values
        (0..n).map(|i| i as u32).collect::<Vec<u32>>(),
        // Descending values
        (0..n).rev().map(|i| i as u32).collect::<Vec<u32>>(),
        // Bit-flipping pattern
        (0..n)
            .map(|i| ((i as u32) * 32) ^ ((i as u32) >> 1))
            .collect::<Vec<u32>>(),
        // Alternating large and small values
        (0..n)
            .map(|i| {
                let ui = i as u32;
                if ui % 2 == 0 {
                    1 << 30
                } else {
                    3
                }
            })
            .collect::<Vec<u32>>(),
        // Random u32 values
        (0..n)
            .map(|_| rng.random_range(0..(1u32 << 31)))
            .collect::<Vec<u32>>(),
        // Spike in the middle
        (0..n)
            .map(|i| if i == n / 2 { u32::MAX } else { 1 })
            .collect::<Vec<u32>>(),
        // An empty vector
        Vec::new(),
    ]
}
