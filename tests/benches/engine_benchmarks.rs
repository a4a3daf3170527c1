//! Criterion benchmarks for the staking core's hot paths: delegation into
//! a busy pool and the full epoch transition at a representative set size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sc_02_stake_pool::StakePool;
use sc_04_validator_lifecycle::{Commission, RegistrationParams};
use sc_runtime::{EngineConfig, ManualTimeSource, StakeEngine, StaticAuthorizer};
use shared_types::{AccountAddress, ConsensusKey, NetworkKey, StakePoolId};
use std::sync::Arc;

const INTERVAL: u64 = 1_000;

fn addr(n: u8) -> AccountAddress {
    AccountAddress::new([n; 32])
}

fn bench_pool_delegate(c: &mut Criterion) {
    let pool = StakePool::new(StakePoolId::derive(&addr(1)));
    for n in 0..64u8 {
        pool.delegate(addr(n), 10_000, false).unwrap();
    }

    c.bench_function("pool_delegate", |b| {
        b.iter(|| {
            pool.delegate(black_box(addr(7)), black_box(100), false)
                .unwrap()
        })
    });
}

fn bench_pool_reward_distribution(c: &mut Criterion) {
    let pool = StakePool::new(StakePoolId::derive(&addr(2)));
    for n in 0..64u8 {
        pool.delegate(addr(n), 10_000, false).unwrap();
    }

    c.bench_function("pool_distribute_reward", |b| {
        b.iter(|| {
            pool.distribute_reward(black_box(1_000), 1_000, addr(0xBE))
                .unwrap()
        })
    });
}

fn build_engine(
    validators: u8,
) -> (
    StakeEngine<ManualTimeSource, StaticAuthorizer>,
    Arc<ManualTimeSource>,
) {
    let time = Arc::new(ManualTimeSource::new(0));
    let engine = StakeEngine::new(
        EngineConfig {
            epoch_interval_micros: INTERVAL,
            min_stake: 100,
            max_stake: 10_000_000,
            voting_power_increase_limit_bps: 10_000,
            ..EngineConfig::default()
        },
        time.clone(),
        Arc::new(StaticAuthorizer::allow_all()),
    );
    for n in 1..=validators {
        engine
            .register_validator(
                RegistrationParams {
                    operator: addr(n),
                    name: format!("validator-{n}"),
                    consensus_key: ConsensusKey::new([n; 48]),
                    network_key: NetworkKey::new([n; 32]),
                    beneficiary: addr(n),
                    commission: Commission {
                        rate_bps: 1_000,
                        max_rate_bps: 2_000,
                        max_change_rate_bps: 500,
                    },
                },
                10_000,
            )
            .unwrap();
        engine.join_validator_set(addr(n)).unwrap();
    }
    (engine, time)
}

fn bench_epoch_transition(c: &mut Criterion) {
    let mut group = c.benchmark_group("epoch_transition");
    for set_size in [8u8, 32, 64] {
        group.bench_with_input(
            BenchmarkId::from_parameter(set_size),
            &set_size,
            |b, &set_size| {
                let (engine, time) = build_engine(set_size);
                engine.add_rewards(100_000).unwrap();
                b.iter(|| {
                    time.advance(INTERVAL);
                    black_box(engine.trigger_epoch(&addr(0xFF)).unwrap())
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_pool_delegate,
    bench_pool_reward_distribution,
    bench_epoch_transition
);
criterion_main!(benches);
