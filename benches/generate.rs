//! Benchmarks for CPU-side galaxy generation.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use galaxy::{generate, ParameterSet};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn bench_generate_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for count in [1_000u32, 50_000, 240_000] {
        let params = ParameterSet {
            count,
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::new("points", count), &params, |b, params| {
            let mut rng = SmallRng::seed_from_u64(42);
            b.iter(|| black_box(generate(params, &mut rng)))
        });
    }

    group.finish();
}

fn bench_generate_shapes(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_shape");
    let base = ParameterSet {
        count: 50_000,
        ..Default::default()
    };

    group.bench_function("no_jitter", |b| {
        let params = ParameterSet {
            randomness: 0.0,
            ..base.clone()
        };
        let mut rng = SmallRng::seed_from_u64(42);
        b.iter(|| black_box(generate(&params, &mut rng)))
    });

    group.bench_function("many_arms", |b| {
        let params = ParameterSet {
            branches: 20,
            ..base.clone()
        };
        let mut rng = SmallRng::seed_from_u64(42);
        b.iter(|| black_box(generate(&params, &mut rng)))
    });

    group.bench_function("sharp_falloff", |b| {
        let params = ParameterSet {
            randomness_pow: 10.0,
            ..base.clone()
        };
        let mut rng = SmallRng::seed_from_u64(42);
        b.iter(|| black_box(generate(&params, &mut rng)))
    });

    group.finish();
}

fn bench_sanitize(c: &mut Criterion) {
    let params = ParameterSet {
        count: 9_999_999,
        radius: -4.0,
        branches: 500,
        ..Default::default()
    };
    c.bench_function("sanitize", |b| b.iter(|| black_box(params.sanitized())));
}

criterion_group!(benches, bench_generate_counts, bench_generate_shapes, bench_sanitize);
criterion_main!(benches);
