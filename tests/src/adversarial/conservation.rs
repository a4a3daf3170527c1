//! # Conservation Sweeps
//!
//! Seeded-random hostile operation sequences hammering invariant I1: for
//! every interleaving of delegate/unlock/withdraw/reactivate/reward/epoch,
//! the four buckets must always hold exactly what flowed in minus what
//! flowed out, and no participant's claim may shrink because of someone
//! else's action.

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use sc_02_stake_pool::{StakePool, StakePoolError};
    use sc_04_validator_lifecycle::{Commission, RegistrationParams};
    use sc_runtime::{EngineConfig, ManualTimeSource, StakeEngine, StaticAuthorizer};
    use shared_types::{AccountAddress, Amount, ConsensusKey, NetworkKey, StakePoolId};
    use std::sync::Arc;

    fn addr(n: u8) -> AccountAddress {
        AccountAddress::new([n; 32])
    }

    /// External value flows tracked alongside the pool under test.
    #[derive(Default)]
    struct Flows {
        deposited: Amount,
        rewarded: Amount,
        withdrawn: Amount,
    }

    impl Flows {
        fn expected_held(&self) -> Amount {
            self.deposited + self.rewarded - self.withdrawn
        }
    }

    fn assert_conserved(pool: &StakePool, flows: &Flows) {
        assert_eq!(
            pool.total_stake(),
            flows.expected_held(),
            "bucket totals diverged from external flows"
        );
        assert!(!pool.is_halted(), "pool tripped its own conservation check");
    }

    #[test]
    fn test_random_operation_sweep_conserves_value() {
        let mut rng = StdRng::seed_from_u64(0x5EED_0001);
        let pool = StakePool::new(StakePoolId::derive(&addr(0xA0)));
        let delegators: Vec<AccountAddress> = (1..=8).map(addr).collect();
        let mut flows = Flows::default();
        let mut now = 1u64;

        for step in 0..2_000u32 {
            now += 7;
            let delegator = delegators[rng.gen_range(0..delegators.len())];
            match rng.gen_range(0..6) {
                0 => {
                    let amount = rng.gen_range(1..5_000u128);
                    match pool.delegate(delegator, amount, rng.gen_bool(0.5)) {
                        Ok(_) => flows.deposited += amount,
                        Err(StakePoolError::DepositTooSmall { .. }) => {}
                        Err(err) => panic!("unexpected delegate error at step {step}: {err}"),
                    }
                }
                1 => {
                    let shares = rng.gen_range(1..3_000u128);
                    match pool.unlock(delegator, shares, now) {
                        Ok(_) => {}
                        Err(StakePoolError::InsufficientShares { .. })
                        | Err(StakePoolError::DepositTooSmall { .. }) => {}
                        Err(err) => panic!("unexpected unlock error at step {step}: {err}"),
                    }
                }
                2 => match pool.withdraw(delegator, rng.gen_range(0..2_000u128)) {
                    Ok(paid) => flows.withdrawn += paid,
                    Err(StakePoolError::NoInactiveStake) => {}
                    Err(err) => panic!("unexpected withdraw error at step {step}: {err}"),
                },
                3 => {
                    let shares = rng.gen_range(1..1_000u128);
                    match pool.reactivate(delegator, shares) {
                        Ok(_) => {}
                        Err(StakePoolError::InsufficientShares { .. })
                        | Err(StakePoolError::DepositTooSmall { .. }) => {}
                        Err(err) => panic!("unexpected reactivate error at step {step}: {err}"),
                    }
                }
                4 => {
                    let amount = rng.gen_range(1..500u128);
                    let commission = rng.gen_range(0..10_000u64);
                    let outcome = pool
                        .distribute_reward(amount, commission, addr(0xBE))
                        .unwrap();
                    flows.rewarded += amount - outcome.undistributed;
                }
                _ => {
                    pool.on_new_epoch().unwrap();
                }
            }
            assert_conserved(&pool, &flows);
        }
    }

    #[test]
    fn test_bystander_claim_never_shrinks() {
        let mut rng = StdRng::seed_from_u64(0x5EED_0002);
        let pool = StakePool::new(StakePoolId::derive(&addr(0xA1)));
        let bystander = addr(1);
        pool.delegate(bystander, 10_000, false).unwrap();

        let others: Vec<AccountAddress> = (2..=6).map(addr).collect();
        let mut floor = pool.delegator_view(&bystander).total();
        let mut now = 1u64;

        for _ in 0..1_500u32 {
            now += 3;
            let other = others[rng.gen_range(0..others.len())];
            match rng.gen_range(0..5) {
                0 => {
                    let _ = pool.delegate(other, rng.gen_range(1..4_000u128), false);
                }
                1 => {
                    let _ = pool.unlock(other, rng.gen_range(1..2_000u128), now);
                }
                2 => {
                    let _ = pool.withdraw(other, 0);
                }
                3 => {
                    let outcome = pool
                        .distribute_reward(rng.gen_range(1..300u128), 500, addr(0xBE))
                        .unwrap();
                    let _ = outcome;
                }
                _ => {
                    pool.on_new_epoch().unwrap();
                }
            }

            let claim = pool.delegator_view(&bystander).total();
            assert!(
                claim >= floor,
                "bystander claim shrank from {floor} to {claim}"
            );
            floor = claim;
        }
    }

    #[test]
    fn test_pending_inactive_never_matures_without_unlock() {
        let mut rng = StdRng::seed_from_u64(0x5EED_0003);
        let pool = StakePool::new(StakePoolId::derive(&addr(0xA2)));
        pool.delegate(addr(1), 50_000, false).unwrap();

        for round in 0..200u32 {
            let unlocked = if rng.gen_bool(0.4) {
                pool.unlock(addr(1), rng.gen_range(1..100u128), round as u64 + 1)
                    .is_ok()
            } else {
                false
            };
            let before = pool.snapshot();
            let applied = pool.on_new_epoch().unwrap();

            if unlocked || before.unlock_pending.is_some() {
                assert_eq!(applied.matured, before.pending_inactive);
            } else {
                assert_eq!(applied.matured, 0);
                assert_eq!(pool.snapshot().pending_inactive, before.pending_inactive);
            }
        }
    }

    /// Whole-engine conservation: across epochs with rewards, every unit
    /// deposited or earned is in a pool, the sink, or a delegator's pocket.
    #[test]
    fn test_global_conservation_across_epochs() {
        const INTERVAL: u64 = 1_000;
        let mut rng = StdRng::seed_from_u64(0x5EED_0004);
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

        let operators: Vec<AccountAddress> = (1..=4).map(addr).collect();
        let mut deposited: Amount = 0;
        let mut rewarded: Amount = 0;
        let mut withdrawn: Amount = 0;

        for (i, operator) in operators.iter().enumerate() {
            let bonded = 10_000 + i as u128 * 1_000;
            engine
                .register_validator(
                    RegistrationParams {
                        operator: *operator,
                        name: format!("validator-{i}"),
                        consensus_key: ConsensusKey::new([i as u8 + 1; 48]),
                        network_key: NetworkKey::new([i as u8 + 1; 32]),
                        beneficiary: *operator,
                        commission: Commission {
                            rate_bps: 1_000,
                            max_rate_bps: 2_000,
                            max_change_rate_bps: 500,
                        },
                    },
                    bonded,
                )
                .unwrap();
            engine.join_validator_set(*operator).unwrap();
            deposited += bonded;
        }

        for epoch in 1..=20u64 {
            // Random epoch activity.
            for _ in 0..rng.gen_range(0..10u32) {
                let operator = operators[rng.gen_range(0..operators.len())];
                let delegator = addr(rng.gen_range(10..20u8));
                match rng.gen_range(0..4) {
                    0 => {
                        let amount = rng.gen_range(100..2_000u128);
                        if engine.delegate(operator, delegator, amount).is_ok() {
                            deposited += amount;
                        }
                    }
                    1 => {
                        let _ = engine.unlock(operator, delegator, rng.gen_range(1..500u128));
                    }
                    2 => {
                        if let Ok(paid) = engine.withdraw(operator, delegator, 0) {
                            withdrawn += paid;
                        }
                    }
                    _ => {
                        let slot = rng.gen_range(0..4usize);
                        engine.record_block(Some(slot), &[]);
                    }
                }
            }
            let fees = rng.gen_range(0..1_000u128);
            engine.add_rewards(fees).unwrap();
            rewarded += fees;

            time.advance(INTERVAL);
            engine.trigger_epoch(&addr(0xFF)).unwrap();
            assert_eq!(engine.current_epoch(), epoch);

            let held: Amount = operators
                .iter()
                .map(|op| engine.stake_credit_of(op).unwrap())
                .sum();
            assert_eq!(
                held + engine.sink_balance() + engine.pending_rewards() + withdrawn,
                deposited + rewarded,
                "global conservation failed at epoch {epoch}"
            );
        }
    }
}
