//! # sc-runtime
//!
//! Dependency-injection container for the staking core.
//!
//! ## Wiring
//!
//! ```text
//! heartbeat ──trigger──→ EpochDriver (1)
//!                            │ fixed order
//!                            ├─→ ValidatorLifecycle (4) ──→ StakePool (2) per validator
//!                            ├─→ RewardDistributor (5) ──→ StakePool (2) + PerformanceTracker (3)
//!                            └─→ PerformanceTracker (3)
//! ```
//!
//! `StakeEngine` constructs every component once at startup and hands each
//! its collaborators as interface handles; no component ever looks another
//! up by a fixed address. The engine facade then forwards external calls
//! (registration, staking, block prologue, heartbeat) to the right
//! subsystem.

pub mod adapters;
pub mod config;
pub mod wiring;

pub use adapters::stake_config::StakeParams;
pub use adapters::{
    AccruingRewardSink, GovernedStakeConfig, ManualTimeSource, StaticAuthorizer, SystemTimeSource,
};
pub use config::EngineConfig;
use sc_01_epoch_driver::{EpochApi, EpochDriver, EpochDriverConfig, EpochOutcome, EpochResult};
use sc_02_stake_pool::DelegatorStakeView;
use sc_03_performance::{PerformanceRecord, PerformanceTracker, TrackerConfig};
use sc_04_validator_lifecycle::{
    EpochTransitionReport, LifecycleResult, RegistrationParams, ValidatorLifecycle,
    ValidatorRecord, ValidatorStatus,
};
use sc_05_reward_distributor::{DistributorResult, RewardDistributor};
use shared_types::{
    AccountAddress, Amount, BasisPoints, CallerAuthorizer, ConsensusKey, EpochNumber, Shares,
    StakePoolId, TimeSource,
};
use std::sync::Arc;
use tracing::debug;
use wiring::{LifecycleSubscriber, PerformanceSubscriber, RewardSubscriber};

/// The fully wired staking engine.
pub struct StakeEngine<T, A>
where
    T: TimeSource + 'static,
    A: CallerAuthorizer + 'static,
{
    stake_config: Arc<GovernedStakeConfig>,
    authorizer: Arc<A>,
    driver: Arc<EpochDriver<T, A>>,
    lifecycle: Arc<ValidatorLifecycle<GovernedStakeConfig, T>>,
    tracker: Arc<PerformanceTracker>,
    distributor: Arc<RewardDistributor<AccruingRewardSink>>,
    sink: Arc<AccruingRewardSink>,
}

impl<T, A> StakeEngine<T, A>
where
    T: TimeSource + 'static,
    A: CallerAuthorizer + 'static,
{
    /// Construct and wire every component. Subscriber registration order is
    /// the documented epoch call chain: lifecycle, rewards, performance.
    pub fn new(config: EngineConfig, time: Arc<T>, authorizer: Arc<A>) -> Self {
        let stake_config = Arc::new(GovernedStakeConfig::new(StakeParams::from(&config)));
        let lifecycle = Arc::new(ValidatorLifecycle::new(stake_config.clone(), time.clone()));
        let tracker = Arc::new(PerformanceTracker::new(
            TrackerConfig {
                history_retention_epochs: config.performance_retention_epochs,
            },
            0,
        ));
        let sink = Arc::new(AccruingRewardSink::new());
        let distributor = Arc::new(RewardDistributor::new(sink.clone()));

        let driver = Arc::new(EpochDriver::new(
            EpochDriverConfig {
                interval_micros: config.epoch_interval_micros,
            },
            time,
            authorizer.clone(),
        ));
        driver.register_subscriber(Arc::new(LifecycleSubscriber::new(lifecycle.clone())));
        driver.register_subscriber(Arc::new(RewardSubscriber::new(
            lifecycle.clone(),
            tracker.clone(),
            distributor.clone(),
        )));
        driver.register_subscriber(Arc::new(PerformanceSubscriber::new(
            lifecycle.clone(),
            tracker.clone(),
        )));

        Self {
            stake_config,
            authorizer,
            driver,
            lifecycle,
            tracker,
            distributor,
            sink,
        }
    }

    // ---------------------------------------------------------------------
    // Epoch heartbeat
    // ---------------------------------------------------------------------

    pub fn can_trigger_epoch(&self) -> bool {
        self.driver.can_trigger()
    }

    /// The external heartbeat: advance the epoch and run the whole
    /// reconfiguration chain.
    pub fn trigger_epoch(&self, caller: &AccountAddress) -> EpochResult<EpochOutcome> {
        self.driver.trigger(caller)
    }

    pub fn set_epoch_interval(
        &self,
        caller: &AccountAddress,
        interval_micros: u64,
    ) -> EpochResult<()> {
        self.driver.set_interval(caller, interval_micros)
    }

    pub fn current_epoch(&self) -> EpochNumber {
        self.driver.current_epoch()
    }

    // ---------------------------------------------------------------------
    // Governance
    // ---------------------------------------------------------------------

    /// Governance: swap the stake parameter set. Takes effect for the next
    /// operation, never retroactively.
    pub fn update_stake_params(
        &self,
        caller: &AccountAddress,
        params: StakeParams,
    ) -> Result<(), sc_01_epoch_driver::EpochError> {
        if !self.authorizer.is_authorized(caller) {
            return Err(sc_01_epoch_driver::EpochError::UnauthorizedCaller { caller: *caller });
        }
        self.stake_config.update(params);
        Ok(())
    }

    pub fn stake_params(&self) -> StakeParams {
        self.stake_config.current()
    }

    // ---------------------------------------------------------------------
    // Validator lifecycle
    // ---------------------------------------------------------------------

    pub fn register_validator(
        &self,
        params: RegistrationParams,
        bonded: Amount,
    ) -> LifecycleResult<StakePoolId> {
        self.lifecycle.register(params, bonded)
    }

    pub fn join_validator_set(&self, operator: AccountAddress) -> LifecycleResult<()> {
        self.lifecycle.join(operator)
    }

    pub fn leave_validator_set(&self, operator: AccountAddress) -> LifecycleResult<()> {
        self.lifecycle.leave(operator)
    }

    pub fn check_min_stake(&self, operator: AccountAddress) -> LifecycleResult<bool> {
        self.lifecycle.check_min_stake(operator)
    }

    pub fn update_commission(
        &self,
        operator: AccountAddress,
        new_rate_bps: BasisPoints,
    ) -> LifecycleResult<()> {
        self.lifecycle.update_commission(operator, new_rate_bps)
    }

    pub fn rotate_consensus_key(
        &self,
        operator: AccountAddress,
        new_key: ConsensusKey,
    ) -> LifecycleResult<()> {
        self.lifecycle.rotate_consensus_key(operator, new_key)
    }

    // ---------------------------------------------------------------------
    // Staking
    // ---------------------------------------------------------------------

    pub fn delegate(
        &self,
        operator: AccountAddress,
        delegator: AccountAddress,
        amount: Amount,
    ) -> LifecycleResult<Shares> {
        self.lifecycle.delegate(operator, delegator, amount)
    }

    /// Unlock queues stake for withdrawal, then opportunistically checks
    /// whether the validator dropped under the minimum stake.
    pub fn unlock(
        &self,
        operator: AccountAddress,
        delegator: AccountAddress,
        shares: Shares,
    ) -> LifecycleResult<Amount> {
        let moved = self.lifecycle.unlock(operator, delegator, shares)?;
        match self.lifecycle.check_min_stake(operator) {
            Ok(demoted) => {
                if demoted {
                    debug!(%operator, "unlock dropped validator under minimum stake");
                }
            }
            Err(err) => {
                // The liveness guard can veto the demotion; the unlock
                // itself stands either way.
                debug!(%operator, error = %err, "post-unlock shortfall check declined");
            }
        }
        Ok(moved)
    }

    pub fn withdraw(
        &self,
        operator: AccountAddress,
        delegator: AccountAddress,
        amount: Amount,
    ) -> LifecycleResult<Amount> {
        self.lifecycle.withdraw(operator, delegator, amount)
    }

    pub fn reactivate(
        &self,
        operator: AccountAddress,
        delegator: AccountAddress,
        shares: Shares,
    ) -> LifecycleResult<Amount> {
        self.lifecycle.reactivate(operator, delegator, shares)
    }

    pub fn redelegate(
        &self,
        delegator: AccountAddress,
        from: AccountAddress,
        to: AccountAddress,
        shares: Shares,
    ) -> LifecycleResult<Amount> {
        self.lifecycle.redelegate(delegator, from, to, shares)
    }

    // ---------------------------------------------------------------------
    // Block prologue and rewards
    // ---------------------------------------------------------------------

    /// Block prologue hook: record this block's proposer outcome.
    pub fn record_block(&self, proposer: Option<usize>, failed: &[usize]) {
        self.tracker.record_block(proposer, failed);
    }

    /// Accumulate reward income (e.g. block fees) for the next boundary.
    pub fn add_rewards(&self, amount: Amount) -> DistributorResult<()> {
        self.distributor.add_rewards(amount)
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn active_validators(&self) -> Vec<AccountAddress> {
        self.lifecycle.active_validators()
    }

    pub fn validator(&self, operator: &AccountAddress) -> Option<ValidatorRecord> {
        self.lifecycle.validator(operator)
    }

    pub fn validator_status(&self, operator: &AccountAddress) -> LifecycleResult<ValidatorStatus> {
        self.lifecycle.validator_status(operator)
    }

    pub fn stake_credit_of(&self, operator: &AccountAddress) -> LifecycleResult<Amount> {
        self.lifecycle.stake_credit_of(operator)
    }

    pub fn delegator_view(
        &self,
        operator: &AccountAddress,
        delegator: &AccountAddress,
    ) -> Option<DelegatorStakeView> {
        self.lifecycle
            .pool_of(operator)
            .map(|pool| pool.delegator_view(delegator))
    }

    pub fn total_voting_power(&self) -> Amount {
        self.lifecycle.total_voting_power()
    }

    pub fn last_transition_report(&self) -> Option<EpochTransitionReport> {
        self.lifecycle.last_transition_report()
    }

    pub fn performance_of_slot(&self, slot: usize) -> Option<PerformanceRecord> {
        self.tracker.current(slot)
    }

    pub fn pending_rewards(&self) -> Amount {
        self.distributor.pending_rewards()
    }

    /// Balance accumulated by the fallback sink.
    pub fn sink_balance(&self) -> Amount {
        self.sink.balance()
    }
}
