//! Criterion benchmarks for u-archipelago.
//!
//! Measures a single island generation and complete archipelago runs on
//! the Rastrigin and Sphere benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_archipelago::island::{
    Archipelago, Island, IslandConfig, Neighbors, NullReporter, Population,
};
use u_archipelago::objective::{Rastrigin, Sphere};
use u_archipelago::random::create_rng;

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_island_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("island_step");
    group.sample_size(10);

    for (dims, capacity, offspring) in [(2usize, 20usize, 10usize), (10, 50, 25), (30, 100, 50)] {
        let config = IslandConfig::default()
            .with_dimensions(dims)
            .with_offspring(offspring);
        let mut rng = create_rng(42);
        let population = Population::random(capacity, &config, &Rastrigin, &mut rng);
        let neighbors = Neighbors {
            predecessor: 0,
            successor: 0,
        };

        group.bench_with_input(
            BenchmarkId::new(format!("d{}_p{}_o{}", dims, capacity, offspring), dims),
            &(population, config),
            |b, (pop, cfg)| {
                let mut island = Island::new(0, neighbors, pop.clone());
                let mut rng = create_rng(7);
                b.iter(|| black_box(island.step(black_box(cfg), &Rastrigin, &mut rng)))
            },
        );
    }
    group.finish();
}

fn bench_archipelago_rastrigin(c: &mut Criterion) {
    let mut group = c.benchmark_group("archipelago_rastrigin");
    group.sample_size(10);

    for &islands in &[1usize, 3, 6] {
        let config = IslandConfig::default()
            .with_islands(islands)
            .with_total_population(60)
            .with_generations(50)
            .with_runs(1)
            .with_seed(42);
        group.bench_with_input(BenchmarkId::from_parameter(islands), &config, |b, cfg| {
            b.iter(|| {
                let result =
                    Archipelago::run_with_reporter(&Rastrigin, black_box(cfg), &NullReporter);
                black_box(result)
            })
        });
    }
    group.finish();
}

fn bench_archipelago_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("archipelago_sphere");
    group.sample_size(10);

    for &interval in &[1usize, 5, 25] {
        let config = IslandConfig::default()
            .with_dimensions(10)
            .with_generations(50)
            .with_runs(1)
            .with_migration_interval(interval)
            .with_seed(42);
        group.bench_with_input(BenchmarkId::from_parameter(interval), &config, |b, cfg| {
            b.iter(|| {
                let result = Archipelago::run_with_reporter(&Sphere, black_box(cfg), &NullReporter);
                black_box(result)
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_island_step,
    bench_archipelago_rastrigin,
    bench_archipelago_sphere
);
criterion_main!(benches);
