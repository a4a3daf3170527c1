//! Reconfiguration subscriber wiring
//!
//! The epoch driver fans out to exactly three subscribers, registered in
//! this order (the documented fixed order of the epoch call chain):
//!
//! 1. `validator-lifecycle` - applies every pool's transition, then the
//!    set's promote/demote/evict/re-index pass
//! 2. `reward-distributor` - pays the closing epoch's rewards using the
//!    fresh transition report and the still-unreset performance counters
//! 3. `performance-tracker` - archives the closing epoch's counters and
//!    re-derives the slot table from the new active set
//!
//! Each subscriber failure is isolated by the driver; the epoch advances
//! regardless.

use crate::adapters::{AccruingRewardSink, GovernedStakeConfig};
use sc_01_epoch_driver::{ReconfigurationSubscriber, SubscriberError};
use sc_03_performance::PerformanceTracker;
use sc_04_validator_lifecycle::ValidatorLifecycle;
use sc_05_reward_distributor::{RewardDistributor, RewardableValidator};
use shared_types::{EpochNumber, TimeSource};
use std::sync::Arc;
use tracing::debug;

type Lifecycle<T> = ValidatorLifecycle<GovernedStakeConfig, T>;

/// Subscriber 1: the validator-set epoch transition.
pub struct LifecycleSubscriber<T: TimeSource> {
    lifecycle: Arc<Lifecycle<T>>,
}

impl<T: TimeSource> LifecycleSubscriber<T> {
    pub fn new(lifecycle: Arc<Lifecycle<T>>) -> Self {
        Self { lifecycle }
    }
}

impl<T: TimeSource> ReconfigurationSubscriber for LifecycleSubscriber<T> {
    fn name(&self) -> &str {
        "validator-lifecycle"
    }

    fn on_new_epoch(&self, epoch: EpochNumber) -> Result<(), SubscriberError> {
        let report = self.lifecycle.on_new_epoch(epoch);
        debug!(
            epoch,
            active = report.entries.len(),
            skipped_pools = report.skipped_pools.len(),
            "lifecycle transition applied"
        );
        Ok(())
    }
}

/// Subscriber 2: reward distribution for the closing epoch.
pub struct RewardSubscriber<T: TimeSource> {
    lifecycle: Arc<Lifecycle<T>>,
    tracker: Arc<PerformanceTracker>,
    distributor: Arc<RewardDistributor<AccruingRewardSink>>,
}

impl<T: TimeSource> RewardSubscriber<T> {
    pub fn new(
        lifecycle: Arc<Lifecycle<T>>,
        tracker: Arc<PerformanceTracker>,
        distributor: Arc<RewardDistributor<AccruingRewardSink>>,
    ) -> Self {
        Self {
            lifecycle,
            tracker,
            distributor,
        }
    }
}

impl<T: TimeSource> ReconfigurationSubscriber for RewardSubscriber<T> {
    fn name(&self) -> &str {
        "reward-distributor"
    }

    fn on_new_epoch(&self, epoch: EpochNumber) -> Result<(), SubscriberError> {
        let report = self
            .lifecycle
            .last_transition_report()
            .filter(|r| r.epoch == epoch)
            .ok_or_else(|| SubscriberError::new("no transition report for this epoch"))?;

        // The tracker has not rotated yet, so `previous_index` still keys
        // into the closing epoch's counters.
        let rewardables: Vec<RewardableValidator> = report
            .entries
            .iter()
            .filter_map(|entry| {
                let pool = self.lifecycle.pool_of(&entry.operator)?;
                Some(RewardableValidator {
                    operator: entry.operator,
                    stake: entry.voting_power,
                    performance: entry
                        .previous_index
                        .and_then(|slot| self.tracker.current(slot as usize)),
                    commission_rate_bps: entry.commission_rate_bps,
                    beneficiary: entry.beneficiary,
                    pool,
                })
            })
            .collect();

        self.distributor
            .distribute(&rewardables)
            .map_err(|err| SubscriberError::new(err.to_string()))?;
        Ok(())
    }
}

/// Subscriber 3: performance archive and reset.
pub struct PerformanceSubscriber<T: TimeSource> {
    lifecycle: Arc<Lifecycle<T>>,
    tracker: Arc<PerformanceTracker>,
}

impl<T: TimeSource> PerformanceSubscriber<T> {
    pub fn new(lifecycle: Arc<Lifecycle<T>>, tracker: Arc<PerformanceTracker>) -> Self {
        Self { lifecycle, tracker }
    }
}

impl<T: TimeSource> ReconfigurationSubscriber for PerformanceSubscriber<T> {
    fn name(&self) -> &str {
        "performance-tracker"
    }

    fn on_new_epoch(&self, epoch: EpochNumber) -> Result<(), SubscriberError> {
        self.tracker.rotate(epoch, self.lifecycle.active_count());
        Ok(())
    }
}
