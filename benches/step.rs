//! Benchmarks for shape generation and the per-frame step.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use handmorph::{Engine, ForcePolicy, Shape};
use rand::rngs::SmallRng;
use rand::SeedableRng;

const COUNT: usize = 15_000;
const DT: f32 = 1.0 / 60.0;

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for shape in Shape::CATALOG {
        group.bench_with_input(
            BenchmarkId::from_parameter(shape.display_name()),
            &shape,
            |b, &shape| {
                let mut rng = SmallRng::seed_from_u64(42);
                b.iter(|| black_box(shape.generate(COUNT, &mut rng)))
            },
        );
    }

    group.finish();
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");

    group.bench_function("closed_fist", |b| {
        let mut engine = Engine::builder()
            .with_particle_count(COUNT)
            .with_seed(42)
            .build()
            .unwrap();
        b.iter(|| black_box(engine.step(DT)))
    });

    group.bench_function("radius_blend", |b| {
        let mut engine = Engine::builder()
            .with_particle_count(COUNT)
            .with_seed(42)
            .with_force_policy(ForcePolicy::RadiusBlend)
            .build()
            .unwrap();
        b.iter(|| black_box(engine.step(DT)))
    });

    group.finish();
}

criterion_group!(benches, bench_generate, bench_step);
criterion_main!(benches);
