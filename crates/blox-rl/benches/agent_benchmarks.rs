//! Agent Benchmarks
//!
//! Benchmarks for the hot paths of training:
//! - Block transition and validity check
//! - Valid-action enumeration
//! - Action selection (epsilon-greedy with novelty tie-break)
//! - Full learning episodes on the built-in levels
//!
//! ## Performance Targets
//! - Transition + validity: < 50ns
//! - Action selection: < 2µs per decision
//! - Learning episode (level1): < 100µs

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use blox_core::levels::{LEVEL_ONE, LEVEL_TWO};
use blox_core::{BlockState, Direction, Environment, Orientation};
use blox_rl::{AgentConfig, RLAgent};

fn seeded() -> AgentConfig {
    AgentConfig {
        seed: Some(42),
        ..AgentConfig::default()
    }
}

fn bench_transition(c: &mut Criterion) {
    let grid = LEVEL_ONE.grid().unwrap();
    let states = [
        BlockState::standing(1, 1),
        BlockState::new(Orientation::Horizontal, 2, 3),
        BlockState::new(Orientation::Vertical, 2, 6),
    ];

    c.bench_function("block/transition_and_validate", |b| {
        b.iter(|| {
            let mut valid = 0;
            for state in &states {
                for direction in Direction::ALL {
                    if black_box(state).transition(direction).is_valid(&grid) {
                        valid += 1;
                    }
                }
            }
            black_box(valid)
        });
    });
}

fn bench_valid_actions(c: &mut Criterion) {
    let env = Environment::new(LEVEL_ONE.grid().unwrap());
    let state = BlockState::new(Orientation::Vertical, 2, 5);

    c.bench_function("environment/valid_actions", |b| {
        b.iter(|| black_box(env.valid_actions(black_box(state))));
    });
}

fn bench_choose_action(c: &mut Criterion) {
    let mut agent = RLAgent::new(LEVEL_ONE.grid().unwrap(), seeded()).unwrap();
    for _ in 0..200 {
        agent.run_episode();
    }
    agent.begin_episode();

    c.bench_function("agent/choose_action_trained", |b| {
        b.iter(|| black_box(agent.choose_action()));
    });
}

fn bench_learning_episodes(c: &mut Criterion) {
    let mut group = c.benchmark_group("agent/episodes");

    for level in [LEVEL_ONE, LEVEL_TWO] {
        group.throughput(Throughput::Elements(100));
        group.bench_with_input(BenchmarkId::from_parameter(level.name), &level, |b, level| {
            b.iter(|| {
                let mut agent = RLAgent::new(level.grid().unwrap(), seeded()).unwrap();
                for _ in 0..100 {
                    black_box(agent.run_episode());
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_transition,
    bench_valid_actions,
    bench_choose_action,
    bench_learning_episodes
);
criterion_main!(benches);
