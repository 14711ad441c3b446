//! Benchmarks for dungeon generation, pathfinding and autonomous rounds.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dungeon_tactics::{
    find_path, generate_dungeon, reachable_tiles, GameState, GenerationConfig, Grid, Position,
    SimulationConfig,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");
    for size in [16_u32, 48, 96] {
        let config = GenerationConfig {
            width: size,
            height: size,
            ..GenerationConfig::new(7)
        };
        group.bench_function(format!("bsp_{size}x{size}"), |b| {
            b.iter(|| {
                let mut rng = StdRng::seed_from_u64(config.seed);
                generate_dungeon(black_box(&config), &mut rng)
            })
        });
    }
    group.finish();
}

fn bench_pathfinding(c: &mut Criterion) {
    let grid = Grid::open(64, 64);
    let start = Position::new(0, 0);

    c.bench_function("find_path_budget_20", |b| {
        b.iter(|| find_path(&grid, black_box(start), black_box(Position::new(10, 10)), 20))
    });
    c.bench_function("reachable_tiles_budget_6", |b| {
        b.iter(|| reachable_tiles(&grid, black_box(Position::new(32, 32)), 6))
    });
}

fn bench_autonomous_rounds(c: &mut Criterion) {
    let config = SimulationConfig {
        generation: GenerationConfig::for_testing(21),
        enemy_count: 6,
        autonomous_player: true,
        ..SimulationConfig::default()
    };

    c.bench_function("ten_autonomous_rounds", |b| {
        b.iter(|| {
            let mut state = GameState::from_config(&config).expect("config is valid");
            state.start();
            for _ in 0..9 {
                state.advance_turn();
            }
            black_box(state.turn_number)
        })
    });
}

criterion_group!(
    benches,
    bench_generation,
    bench_pathfinding,
    bench_autonomous_rounds
);
criterion_main!(benches);
