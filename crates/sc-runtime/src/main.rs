//! Deterministic staking-engine simulation.
//!
//! Drives the full epoch choreography with a manual clock: registration,
//! joins, block production, reward accrual, an unlock, and the resulting
//! transitions. Useful as a smoke run and as a worked example of the
//! wiring.

use anyhow::Result;
use sc_04_validator_lifecycle::{Commission, RegistrationParams};
use sc_runtime::{EngineConfig, ManualTimeSource, StakeEngine, StaticAuthorizer};
use shared_types::{AccountAddress, ConsensusKey, NetworkKey};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const EPOCH_INTERVAL: u64 = 1_000_000;

fn operator(n: u8) -> AccountAddress {
    AccountAddress::new([n; 32])
}

fn registration(n: u8, commission_bps: u64) -> RegistrationParams {
    RegistrationParams {
        operator: operator(n),
        name: format!("validator-{n}"),
        consensus_key: ConsensusKey::new([n; 48]),
        network_key: NetworkKey::new([n; 32]),
        beneficiary: operator(n),
        commission: Commission {
            rate_bps: commission_bps,
            max_rate_bps: 2_000,
            max_change_rate_bps: 500,
        },
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let heartbeat = operator(0xFF);
    let time = Arc::new(ManualTimeSource::new(0));
    let engine = StakeEngine::new(
        EngineConfig {
            epoch_interval_micros: EPOCH_INTERVAL,
            min_stake: 1_000,
            max_stake: 10_000_000,
            voting_power_increase_limit_bps: 10_000,
            ..EngineConfig::default()
        },
        time.clone(),
        Arc::new(StaticAuthorizer::allow(vec![heartbeat])),
    );

    info!("registering validators");
    engine.register_validator(registration(1, 1_000), 600_000)?;
    engine.register_validator(registration(2, 500), 300_000)?;
    engine.register_validator(registration(3, 0), 100_000)?;
    for n in 1..=3 {
        engine.join_validator_set(operator(n))?;
    }

    time.advance(EPOCH_INTERVAL);
    let outcome = engine.trigger_epoch(&heartbeat)?;
    info!(
        epoch = outcome.epoch,
        active = engine.active_validators().len(),
        total_voting_power = engine.total_voting_power(),
        "validator set activated"
    );

    // One epoch of block production: validator 3's slot keeps failing.
    for round in 0..10usize {
        let proposer = round % 2;
        engine.record_block(Some(proposer), &[2]);
    }
    engine.add_rewards(50_000)?;

    // A delegator pulls part of validator 2's stake before the boundary.
    engine.unlock(operator(2), operator(2), 50_000)?;

    time.advance(EPOCH_INTERVAL);
    let outcome = engine.trigger_epoch(&heartbeat)?;
    info!(
        epoch = outcome.epoch,
        failed_notifications = outcome.failed_count(),
        sink_balance = engine.sink_balance(),
        "rewards distributed"
    );

    for n in 1..=3u8 {
        let op = operator(n);
        info!(
            operator = %op,
            status = %engine.validator_status(&op)?,
            stake = engine.stake_credit_of(&op)?,
            "validator state"
        );
    }

    time.advance(EPOCH_INTERVAL);
    engine.trigger_epoch(&heartbeat)?;
    info!(
        epoch = engine.current_epoch(),
        total_voting_power = engine.total_voting_power(),
        "simulation complete"
    );
    Ok(())
}
