//! Benchmarks for complete scripted games.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use workload_sim::{play_game, GameConfig, Strategy};

fn bench_balanced_game(c: &mut Criterion) {
    let config = GameConfig::default();

    c.bench_function("balanced_game", |b| {
        b.iter(|| {
            let result = play_game(config.clone(), black_box(42), Strategy::Balanced);
            black_box(result)
        });
    });
}

fn bench_random_batch(c: &mut Criterion) {
    let config = GameConfig::default();

    c.bench_function("10_random_games", |b| {
        b.iter(|| {
            for seed in 0..10u64 {
                let result = play_game(config.clone(), black_box(seed), Strategy::Random);
                black_box(result);
            }
        });
    });
}

criterion_group!(benches, bench_balanced_game, bench_random_batch);
criterion_main!(benches);
