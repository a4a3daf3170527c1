//! # Ledger Scenario Tests
//!
//! The canonical accounting scenarios, driven through the engine facade so
//! every path crosses the real lifecycle -> pool wiring.

#[cfg(test)]
mod tests {
    use sc_02_stake_pool::StakePool;
    use sc_04_validator_lifecycle::{Commission, RegistrationParams, ValidatorStatus};
    use sc_runtime::{EngineConfig, ManualTimeSource, StakeEngine, StaticAuthorizer};
    use shared_types::{AccountAddress, ConsensusKey, NetworkKey, StakePoolId};
    use std::sync::Arc;

    const INTERVAL: u64 = 1_000;

    fn addr(n: u8) -> AccountAddress {
        AccountAddress::new([n; 32])
    }

    fn registration(n: u8, commission_bps: u64) -> RegistrationParams {
        RegistrationParams {
            operator: addr(n),
            name: format!("validator-{n}"),
            consensus_key: ConsensusKey::new([n; 48]),
            network_key: NetworkKey::new([n; 32]),
            beneficiary: addr(n),
            commission: Commission {
                rate_bps: commission_bps,
                max_rate_bps: 5_000,
                max_change_rate_bps: 500,
            },
        }
    }

    fn engine() -> (
        StakeEngine<ManualTimeSource, StaticAuthorizer>,
        Arc<ManualTimeSource>,
    ) {
        let time = Arc::new(ManualTimeSource::new(0));
        let engine = StakeEngine::new(
            EngineConfig {
                epoch_interval_micros: INTERVAL,
                min_stake: 100,
                max_stake: 1_000_000,
                voting_power_increase_limit_bps: 10_000,
                ..EngineConfig::default()
            },
            time.clone(),
            Arc::new(StaticAuthorizer::allow_all()),
        );
        (engine, time)
    }

    fn tick(engine: &StakeEngine<ManualTimeSource, StaticAuthorizer>, time: &ManualTimeSource) {
        time.advance(INTERVAL);
        engine.trigger_epoch(&addr(0xFF)).unwrap();
    }

    /// Scenario A: empty pool, 100 in. The bucket depends on whether the
    /// owner is in the consensus set.
    #[test]
    fn test_scenario_a_first_delegation_bucket_selection() {
        let (engine, time) = engine();

        // Inactive owner: straight to active.
        engine.register_validator(registration(1, 0), 100).unwrap();
        let view = engine.delegator_view(&addr(1), &addr(1)).unwrap();
        assert_eq!(view.active, 100);
        assert_eq!(view.pending_active, 0);

        // Active owner: deposits queue in pending_active.
        engine.join_validator_set(addr(1)).unwrap();
        tick(&engine, &time);
        engine.delegate(addr(1), addr(7), 100).unwrap();
        let view = engine.delegator_view(&addr(1), &addr(7)).unwrap();
        assert_eq!(view.pending_active, 100);
        assert_eq!(view.active, 0);
    }

    /// Scenario B: 100 shares over 100 pooled; 50 in mints 50 shares.
    #[test]
    fn test_scenario_b_par_price_mint() {
        let pool = StakePool::new(StakePoolId::derive(&addr(1)));
        pool.delegate(addr(1), 100, false).unwrap();

        let minted = pool.delegate(addr(2), 50, false).unwrap();
        assert_eq!(minted, 50);
        assert_eq!(pool.snapshot().active, 150);
    }

    /// Scenario C: 10 shares of 100 unlocked; active 90, pending_inactive
    /// 10, flag set.
    #[test]
    fn test_scenario_c_unlock_moves_and_flags() {
        let pool = StakePool::new(StakePoolId::derive(&addr(1)));
        pool.delegate(addr(1), 10, false).unwrap();
        pool.delegate(addr(2), 90, false).unwrap();

        pool.unlock(addr(1), 10, 12_345).unwrap();
        let snap = pool.snapshot();
        assert_eq!(snap.active, 90);
        assert_eq!(snap.pending_inactive, 10);
        assert_eq!(snap.unlock_pending, Some(12_345));
    }

    /// Scenario D: the first boundary after the unlock matures the queue;
    /// a boundary without a fresh unlock does not.
    #[test]
    fn test_scenario_d_maturity_requires_unlock_flag() {
        let pool = StakePool::new(StakePoolId::derive(&addr(1)));
        pool.delegate(addr(1), 100, false).unwrap();
        pool.unlock(addr(1), 10, 1).unwrap();

        let applied = pool.on_new_epoch().unwrap();
        assert_eq!(applied.matured, 10);
        assert!(applied.unlock_flag_cleared);
        assert_eq!(pool.snapshot().inactive, 10);

        let applied = pool.on_new_epoch().unwrap();
        assert_eq!(applied.matured, 0);
        assert!(!applied.unlock_flag_cleared);
    }

    /// Scenario E: 100 reward at 10% commission over active=900,
    /// pending_inactive=100: commission 10 minted to the beneficiary,
    /// remainder split 81/9.
    #[test]
    fn test_scenario_e_reward_split() {
        let pool = StakePool::new(StakePoolId::derive(&addr(1)));
        pool.delegate(addr(1), 900, false).unwrap();
        pool.delegate(addr(2), 100, false).unwrap();
        pool.unlock(addr(2), 100, 1).unwrap();

        let outcome = pool.distribute_reward(100, 1_000, addr(9)).unwrap();
        assert_eq!(outcome.commission_amount, 10);
        assert!(outcome.commission_shares > 0);
        assert_eq!(outcome.active_accrued, 81);
        assert_eq!(outcome.pending_inactive_accrued, 9);

        let snap = pool.snapshot();
        assert_eq!(snap.active, 991);
        assert_eq!(snap.pending_inactive, 109);
    }

    /// Scenario F: an ACTIVE validator under the minimum after an unlock is
    /// demoted by the next shortfall check, before any boundary.
    #[test]
    fn test_scenario_f_shortfall_demotion_before_boundary() {
        let (engine, time) = engine();
        engine.register_validator(registration(1, 0), 1_000).unwrap();
        engine.register_validator(registration(2, 0), 150).unwrap();
        engine.join_validator_set(addr(1)).unwrap();
        engine.join_validator_set(addr(2)).unwrap();
        tick(&engine, &time);
        assert_eq!(engine.current_epoch(), 1);

        engine.unlock(addr(2), addr(2), 100).unwrap();

        // No boundary has passed; the demotion already happened.
        assert_eq!(engine.current_epoch(), 1);
        assert_eq!(
            engine.validator_status(&addr(2)).unwrap(),
            ValidatorStatus::PendingInactive
        );
    }

    /// Idempotence: a boundary over a pool holding only active stake is a
    /// no-op.
    #[test]
    fn test_epoch_noop_on_active_only_pool() {
        let pool = StakePool::new(StakePoolId::derive(&addr(1)));
        pool.delegate(addr(1), 1_000, false).unwrap();

        let before = pool.snapshot();
        for _ in 0..3 {
            pool.on_new_epoch().unwrap();
            assert_eq!(pool.snapshot(), before);
        }
    }
}
