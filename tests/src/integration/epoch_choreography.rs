//! # Epoch Choreography Tests
//!
//! Exercises the full trigger chain across all five subsystems:
//!
//! ```text
//! heartbeat -> EpochDriver -> ValidatorLifecycle -> every StakePool
//!                          -> RewardDistributor -> PerformanceTracker
//! ```
//!
//! Verified here: the documented subscriber ordering, per-subscriber
//! failure isolation, epoch monotonicity through the whole stack, and the
//! performance reset landing after reward distribution.

#[cfg(test)]
mod tests {
    use sc_01_epoch_driver::{
        EpochApi, EpochDriver, EpochDriverConfig, ReconfigurationSubscriber, SubscriberError,
    };
    use sc_04_validator_lifecycle::{Commission, RegistrationParams, ValidatorStatus};
    use sc_runtime::adapters::stake_config::StakeParams;
    use sc_runtime::wiring::LifecycleSubscriber;
    use sc_runtime::{
        EngineConfig, GovernedStakeConfig, ManualTimeSource, StakeEngine, StaticAuthorizer,
    };
    use sc_04_validator_lifecycle::ValidatorLifecycle;
    use shared_types::{AccountAddress, ConsensusKey, EpochNumber, NetworkKey};
    use std::sync::Arc;

    const INTERVAL: u64 = 1_000;

    fn addr(n: u8) -> AccountAddress {
        AccountAddress::new([n; 32])
    }

    fn registration(n: u8) -> RegistrationParams {
        RegistrationParams {
            operator: addr(n),
            name: format!("validator-{n}"),
            consensus_key: ConsensusKey::new([n; 48]),
            network_key: NetworkKey::new([n; 32]),
            beneficiary: addr(n),
            commission: Commission {
                rate_bps: 0,
                max_rate_bps: 1_000,
                max_change_rate_bps: 100,
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

    fn tick(
        engine: &StakeEngine<ManualTimeSource, StaticAuthorizer>,
        time: &ManualTimeSource,
    ) -> sc_01_epoch_driver::EpochOutcome {
        time.advance(INTERVAL);
        engine.trigger_epoch(&addr(0xFF)).unwrap()
    }

    #[test]
    fn test_subscribers_run_in_documented_order() {
        let (engine, time) = engine();
        let outcome = tick(&engine, &time);

        let order: Vec<&str> = outcome
            .notifications
            .iter()
            .map(|n| n.subscriber.as_str())
            .collect();
        assert_eq!(
            order,
            vec!["validator-lifecycle", "reward-distributor", "performance-tracker"]
        );
    }

    #[test]
    fn test_epoch_strictly_monotonic_through_the_stack() {
        let (engine, time) = engine();
        for expected in 1..=5u64 {
            // Early trigger always fails without mutating anything.
            assert!(engine.trigger_epoch(&addr(0xFF)).is_err());
            assert_eq!(engine.current_epoch(), expected - 1);

            let outcome = tick(&engine, &time);
            assert_eq!(outcome.epoch, expected);
            assert_eq!(engine.current_epoch(), expected);
        }
    }

    #[test]
    fn test_failing_subscriber_does_not_abort_the_chain() {
        struct FailingSubscriber;

        impl ReconfigurationSubscriber for FailingSubscriber {
            fn name(&self) -> &str {
                "failing-module"
            }

            fn on_new_epoch(&self, _epoch: EpochNumber) -> Result<(), SubscriberError> {
                Err(SubscriberError::new("induced failure"))
            }
        }

        let time = Arc::new(ManualTimeSource::new(0));
        let stake_config = Arc::new(GovernedStakeConfig::new(StakeParams::from(
            &EngineConfig::default(),
        )));
        let lifecycle = Arc::new(ValidatorLifecycle::new(stake_config, time.clone()));
        let driver = EpochDriver::new(
            EpochDriverConfig {
                interval_micros: INTERVAL,
            },
            time.clone(),
            Arc::new(StaticAuthorizer::allow_all()),
        );
        driver.register_subscriber(Arc::new(FailingSubscriber));
        driver.register_subscriber(Arc::new(LifecycleSubscriber::new(lifecycle.clone())));

        time.advance(INTERVAL);
        let outcome = driver.trigger(&addr(1)).unwrap();

        // Epoch advanced, the failure was recorded, and the lifecycle still
        // ran (it produced a transition report for this epoch).
        assert_eq!(outcome.epoch, 1);
        assert_eq!(outcome.failed_count(), 1);
        assert!(outcome.notifications[0].result.is_err());
        assert!(outcome.notifications[1].result.is_ok());
        assert_eq!(lifecycle.last_transition_report().unwrap().epoch, 1);
    }

    #[test]
    fn test_rewards_flow_before_performance_reset() {
        let (engine, time) = engine();
        engine.register_validator(registration(1), 1_000).unwrap();
        engine.join_validator_set(addr(1)).unwrap();
        tick(&engine, &time);

        // The closing epoch's counters must still be visible to the reward
        // pass; afterwards the tracker is zeroed for the new epoch.
        engine.record_block(Some(0), &[]);
        engine.add_rewards(100).unwrap();
        tick(&engine, &time);

        assert_eq!(engine.stake_credit_of(&addr(1)).unwrap(), 1_100);
        let fresh = engine.performance_of_slot(0).unwrap();
        assert_eq!(fresh.total_proposals(), 0);
    }

    #[test]
    fn test_full_membership_lifecycle_end_to_end() {
        let (engine, time) = engine();

        // Epoch 1: two validators activate.
        engine.register_validator(registration(1), 1_000).unwrap();
        engine.register_validator(registration(2), 800).unwrap();
        engine.join_validator_set(addr(1)).unwrap();
        engine.join_validator_set(addr(2)).unwrap();
        tick(&engine, &time);
        assert_eq!(engine.active_validators().len(), 2);
        assert_eq!(engine.total_voting_power(), 1_800);

        // Epoch 2: a third joins while the second leaves.
        engine.register_validator(registration(3), 500).unwrap();
        engine.join_validator_set(addr(3)).unwrap();
        engine.leave_validator_set(addr(2)).unwrap();
        assert_eq!(engine.total_voting_power(), 1_000); // immediate removal
        tick(&engine, &time);

        assert_eq!(engine.active_validators(), vec![addr(1), addr(3)]);
        assert_eq!(
            engine.validator_status(&addr(2)).unwrap(),
            ValidatorStatus::Inactive
        );
        assert_eq!(engine.total_voting_power(), 1_500);

        // Epoch 3: validator 2's delegator exits fully through the queue.
        engine.unlock(addr(2), addr(2), 800).unwrap();
        tick(&engine, &time);
        let paid = engine.withdraw(addr(2), addr(2), 0).unwrap();
        assert_eq!(paid, 800);
        assert_eq!(engine.stake_credit_of(&addr(2)).unwrap(), 0);
    }

    #[test]
    fn test_interval_change_applies_to_next_epoch() {
        let (engine, time) = engine();
        engine.set_epoch_interval(&addr(1), INTERVAL * 10).unwrap();

        time.advance(INTERVAL);
        assert!(engine.trigger_epoch(&addr(0xFF)).is_err());

        time.advance(INTERVAL * 9);
        assert_eq!(engine.trigger_epoch(&addr(0xFF)).unwrap().epoch, 1);
    }
}
