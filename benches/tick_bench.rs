//! Full-tick throughput for a default village and a crowded night

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use village_sim::core::config::SimulationConfig;
use village_sim::ecs::world::SimulationWorld;
use village_sim::entity::villager::Job;

const DT: f32 = 1.0 / 60.0;

fn bench_default_village(c: &mut Criterion) {
    c.bench_function("tick_default_village", |b| {
        let mut world = SimulationWorld::new(SimulationConfig::default()).unwrap();
        b.iter(|| black_box(world.tick(DT)));
    });
}

fn bench_crowded_night(c: &mut Criterion) {
    let jobs = [Job::Lumber, Job::Miner, Job::Forager, Job::Soldier, Job::Idle];
    let config = SimulationConfig {
        starting_jobs: jobs.iter().cycle().take(100).copied().collect(),
        starting_max_population: 100,
        initial_resource_count: 600,
        start_time_fraction: 0.7,
        base_spawn_rate: 5.0,
        ..SimulationConfig::default()
    };

    c.bench_function("tick_crowded_night_x60", |b| {
        b.iter_batched(
            || SimulationWorld::new(config.clone()).unwrap(),
            |mut world| {
                for _ in 0..60 {
                    black_box(world.tick(DT));
                }
                world
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_default_village, bench_crowded_night);
criterion_main!(benches);
