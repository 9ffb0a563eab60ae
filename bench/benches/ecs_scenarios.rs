//! Scenario benchmarks using Criterion.
//!
//! These benchmarks measure frame-shaped workloads:
//! - Particle system (high entity count, constant churn)
//! - Skirmish (event fan-out, lookups by handle, removals)

use std::time::{Duration, Instant};

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rusty_bench::scenarios::{
    ParticleConfig, ParticleScenario, Scenario, SkirmishConfig, SkirmishScenario,
};

// =============================================================================
// Particle System Benchmarks
// =============================================================================

fn bench_particles(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenario/particles");

    for count in [10_000, 50_000, 100_000] {
        group.throughput(Throughput::Elements(count as u64));

        // Full frame update
        group.bench_with_input(BenchmarkId::new("frame", count), &count, |b, &n| {
            let mut scenario = ParticleScenario::with_config(ParticleConfig {
                particle_count: n,
                ..Default::default()
            });
            scenario.setup();

            b.iter(|| {
                scenario.update();
            });
        });

        group.bench_with_input(BenchmarkId::new("movement", count), &count, |b, &n| {
            let mut scenario = ParticleScenario::with_config(ParticleConfig {
                particle_count: n,
                ..Default::default()
            });
            scenario.setup();

            b.iter(|| {
                scenario.movement();
            });
        });
    }

    group.finish();
}

// =============================================================================
// Skirmish Benchmarks
// =============================================================================

fn bench_skirmish(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenario/skirmish");

    let configs = [
        (
            "small",
            SkirmishConfig {
                team_size: 100,
                listeners: 2,
                ..Default::default()
            },
        ),
        (
            "medium",
            SkirmishConfig {
                team_size: 1_000,
                listeners: 8,
                ..Default::default()
            },
        ),
        (
            "noisy",
            SkirmishConfig {
                team_size: 1_000,
                listeners: 64,
                ..Default::default()
            },
        ),
    ];

    for (name, config) in configs {
        let hits = config.team_size * 2;
        group.throughput(Throughput::Elements(hits as u64));

        // The opening frame, before any fighter has fallen.
        group.bench_with_input(BenchmarkId::new("opening_frame", name), &config, |b, config| {
            b.iter_batched(
                || {
                    let mut scenario = SkirmishScenario::with_config(config.clone());
                    scenario.setup();
                    scenario
                },
                |mut scenario| {
                    scenario.update();
                    scenario
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// Frame Time Benchmarks (longer running, statistical)
// =============================================================================

fn bench_frame_times(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_times");
    group.sample_size(20); // Fewer samples since each runs many frames

    // Particle scenario: 1000 frames
    group.bench_function("particles_1000_frames", |b| {
        b.iter_custom(|iters| {
            let mut total = Duration::ZERO;

            for _ in 0..iters {
                let mut scenario = ParticleScenario::with_config(ParticleConfig {
                    particle_count: 50_000,
                    ..Default::default()
                });
                scenario.setup();

                let start = Instant::now();
                for _ in 0..1000 {
                    scenario.update();
                }
                total += start.elapsed();
            }

            total
        });
    });

    // Skirmish scenario: fight to the end
    group.bench_function("skirmish_to_the_end", |b| {
        b.iter_custom(|iters| {
            let mut total = Duration::ZERO;

            for _ in 0..iters {
                let mut scenario = SkirmishScenario::with_config(SkirmishConfig::default());
                scenario.setup();

                let start = Instant::now();
                while !scenario.is_over() {
                    scenario.update();
                }
                total += start.elapsed();
            }

            total
        });
    });

    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(benches, bench_particles, bench_skirmish, bench_frame_times);

criterion_main!(benches);
