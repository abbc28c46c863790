// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::hint::black_box;
use stream_sketches::*;

const N: usize = 1 << 14;
const MASK: usize = N - 1;

fn gaussian_data() -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(42);
    let normal = Normal::new(0.0, 1.0).unwrap();
    (0..N).map(|_| normal.sample(&mut rng)).collect()
}

fn random_bytes() -> Vec<[u8; 8]> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..N).map(|_| rng.gen()).collect()
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("Add");
    let samples = gaussian_data();
    let items = random_bytes();

    group.bench_function("MomentStats", |bencher| {
        let mut stats = MomentStats::new();
        let mut i = 0;
        bencher.iter(|| {
            stats.add(black_box(samples[i & MASK]));
            i += 1;
        })
    });

    group.bench_function("P2Quantile", |bencher| {
        let mut q = P2Quantile::new(0.5);
        let mut i = 0;
        bencher.iter(|| {
            q.add(black_box(samples[i & MASK]));
            i += 1;
        })
    });

    group.bench_function("HyperLogLog P10", |bencher| {
        let mut hll = HyperLogLog::new(10, Fnv64::new());
        let mut i = 0;
        bencher.iter(|| {
            hll.add(black_box(&items[i & MASK]));
            i += 1;
        })
    });

    group.bench_function("LinearCounting P10", |bencher| {
        let mut lc = LinearCounting::new(10, Fnv64::new());
        let mut i = 0;
        bencher.iter(|| {
            lc.add(black_box(&items[i & MASK]));
            i += 1;
        })
    });

    group.bench_function("BloomFilter", |bencher| {
        let mut bf = BloomFilter::new(N as u64, 0.01, Fnv64::new());
        let mut i = 0;
        bencher.iter(|| {
            bf.add(black_box(&items[i & MASK]));
            i += 1;
        })
    });

    group.finish();
}

fn bench_query_and_combine(c: &mut Criterion) {
    let mut group = c.benchmark_group("Query and Combine");
    let items = random_bytes();

    let mut hll_a = HyperLogLog::new(10, Fnv64::new());
    let mut hll_b = HyperLogLog::new(10, Fnv64::new());
    for (i, item) in items.iter().enumerate() {
        if i % 2 == 0 {
            hll_a.add(item);
        } else {
            hll_b.add(item);
        }
    }

    group.bench_function("HyperLogLog P10 Distinct", |bencher| {
        bencher.iter(|| black_box(&hll_a).distinct())
    });

    group.bench_function("HyperLogLog P10 Union", |bencher| {
        bencher.iter(|| black_box(&hll_a).union(black_box(&hll_b)).unwrap())
    });

    let mut bf = BloomFilter::new(N as u64, 0.01, Fnv64::new());
    for item in &items {
        bf.add(item);
    }
    group.bench_function("BloomFilter Check", |bencher| {
        let mut i = 0;
        bencher.iter(|| {
            let hit = bf.check(black_box(&items[i & MASK]));
            i += 1;
            hit
        })
    });

    let samples = gaussian_data();
    let mut stats_a = MomentStats::new();
    let mut stats_b = MomentStats::new();
    for (i, &x) in samples.iter().enumerate() {
        if i % 2 == 0 {
            stats_a.add(x);
        } else {
            stats_b.add(x);
        }
    }
    group.bench_function("MomentStats Combine", |bencher| {
        bencher.iter(|| black_box(&stats_a).combine(black_box(&stats_b)))
    });

    group.finish();
}

criterion_group!(benches, bench_add, bench_query_and_combine);
criterion_main!(benches);
