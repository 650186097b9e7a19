//! Benchmarks for the simulation step and emission.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Vec2, Vec3};
use pointswarm::{Emitter, Swarm, SwarmConfig, Vector, World};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// A swarm of `count` points scattered over the world.
fn scattered<V: Vector>(world: &World<V>, count: usize) -> Swarm<V> {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut emitter = Emitter::new(world.center(), 120.0).with_velocity_jitter(V::from_fn(|_| 20.0));
    let mut swarm = Swarm::with_capacity(count);
    for _ in 0..count {
        let mut point = emitter.generate(&mut rng);
        point.position = V::from_fn(|axis| rng.gen_range(0.0..world.extent.axis(axis)));
        swarm.insert(point);
    }
    swarm
}

fn bench_swarm_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("swarm_step");

    let flat = World::new(Vec2::new(1024.0, 700.0))
        .with_viscosity(0.00001)
        .with_attraction(150.0);
    let boxed = World::new(Vec3::new(1024.0, 700.0, 60.0))
        .with_viscosity(0.00001)
        .with_attraction(150.0);

    for count in [50, 200, 400] {
        group.bench_with_input(BenchmarkId::new("2d", count), &count, |b, &count| {
            let swarm = scattered(&flat, count);
            b.iter(|| {
                let mut swarm = swarm.clone();
                black_box(swarm.step(&flat))
            })
        });

        group.bench_with_input(BenchmarkId::new("3d", count), &count, |b, &count| {
            let swarm = scattered(&boxed, count);
            b.iter(|| {
                let mut swarm = swarm.clone();
                black_box(swarm.step(&boxed))
            })
        });
    }

    group.finish();
}

fn bench_emitter(c: &mut Criterion) {
    let mut group = c.benchmark_group("emitter");

    group.bench_function("generate", |b| {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut emitter = Emitter::new(Vec2::new(170.0, 350.0), 120.0)
            .with_velocity_jitter(Vec2::new(20.0, 5.0));
        b.iter(|| black_box(emitter.generate(&mut rng)))
    });

    group.finish();
}

fn bench_driver(c: &mut Criterion) {
    let mut group = c.benchmark_group("driver");

    group.bench_function("default_config_300_frames", |b| {
        let config = SwarmConfig {
            seed: Some(3),
            emit_every: 1,
            ..Default::default()
        };
        b.iter(|| {
            let mut driver = config.build::<Vec2>().unwrap();
            for _ in 0..300 {
                black_box(driver.frame(None));
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_swarm_step, bench_emitter, bench_driver);
criterion_main!(benches);
