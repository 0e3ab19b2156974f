//! Benchmarks for the per-frame CPU path.
//!
//! Run with: `cargo bench`

use billboard_particles::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn full_pool(capacity_seconds: f32, rate: u32) -> ParticlePool {
    let template = ParticleTemplate::new()
        .with_rate(rate)
        .with_duration(capacity_seconds);
    let mut pool = ParticlePool::seeded(template, Transform::IDENTITY, 1);
    pool.advance(capacity_seconds, &CameraBasis::IDENTITY);
    pool
}

fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance");
    let camera = OrbitCamera::new().basis();

    for rate in [80u32, 800, 8000] {
        let mut pool = full_pool(8.0, rate);
        group.bench_with_input(BenchmarkId::from_parameter(pool.len()), &rate, |b, _| {
            b.iter(|| black_box(pool.advance(black_box(GATHER_STEP), &camera)))
        });
    }

    group.finish();
}

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("rebuild");

    for rate in [80u32, 800, 8000] {
        let pool = full_pool(8.0, rate);
        let mut builder = GeometryBuilder::new();

        group.bench_with_input(BenchmarkId::new("color", pool.len()), &pool, |b, pool| {
            b.iter(|| black_box(builder.rebuild(pool, Capabilities::new(false, true)).index_count()))
        });
        group.bench_with_input(BenchmarkId::new("color_texture", pool.len()), &pool, |b, pool| {
            b.iter(|| black_box(builder.rebuild(pool, Capabilities::new(true, true)).index_count()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_advance, bench_rebuild);
criterion_main!(benches);
