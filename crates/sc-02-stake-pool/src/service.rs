//! Stake Pool service - guarded, conservation-checked pool operations

use crate::domain::guard::PoolGuard;
use crate::error::PoolResult;
use crate::events::{DelegatorStakeView, EpochApplied, PoolSnapshot, RewardOutcome};
use crate::metrics;
use crate::state::PoolState;
use parking_lot::RwLock;
use shared_types::{
    AccountAddress, Amount, BasisPoints, Shares, StakePoolId, TimestampMicros,
};
use tracing::{debug, error, info};

/// One validator's stake pool.
///
/// Every mutating call: acquires the single-writer guard, checks
/// conservation on entry, applies the operation to a copy of the state,
/// re-checks conservation, then commits the copy. A failed operation
/// therefore leaves no trace, and a conservation breach halts the pool
/// before the corrupt state can be observed by anyone else.
pub struct StakePool {
    id: StakePoolId,
    guard: PoolGuard,
    state: RwLock<PoolState>,
}

impl StakePool {
    pub fn new(id: StakePoolId) -> Self {
        Self {
            id,
            guard: PoolGuard::new(),
            state: RwLock::new(PoolState::new()),
        }
    }

    pub fn id(&self) -> StakePoolId {
        self.id
    }

    fn mutate<R>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut PoolState) -> PoolResult<R>,
    ) -> PoolResult<R> {
        let _busy = self.guard.acquire()?;

        let mut next = {
            let current = self.state.read();
            if let Err(violation) = current.check_conservation(self.id) {
                self.halt_on(operation, &violation);
                return Err(violation.into());
            }
            current.clone()
        };

        let result = f(&mut next)?;

        if let Err(violation) = next.check_conservation(self.id) {
            self.halt_on(operation, &violation);
            return Err(violation.into());
        }
        *self.state.write() = next;
        Ok(result)
    }

    fn halt_on(&self, operation: &'static str, violation: &shared_types::InvariantViolation) {
        error!(
            pool = %self.id,
            operation,
            violation = %violation,
            "conservation breach; halting pool"
        );
        metrics::record_pool_halted();
        self.guard.halt(violation.to_string());
    }

    // ---------------------------------------------------------------------
    // Mutating operations
    // ---------------------------------------------------------------------

    pub fn delegate(
        &self,
        delegator: AccountAddress,
        amount: Amount,
        owner_in_consensus: bool,
    ) -> PoolResult<Shares> {
        let minted = self.mutate("delegate", |state| {
            state.delegate(delegator, amount, owner_in_consensus)
        })?;
        debug!(pool = %self.id, %delegator, amount, minted, "stake delegated");
        metrics::record_delegation(amount);
        Ok(minted)
    }

    pub fn unlock(
        &self,
        delegator: AccountAddress,
        shares: Shares,
        now: TimestampMicros,
    ) -> PoolResult<Amount> {
        let moved = self.mutate("unlock", |state| state.unlock(delegator, shares, now))?;
        debug!(pool = %self.id, %delegator, shares, moved, "stake unlocked");
        metrics::record_unlock(moved);
        Ok(moved)
    }

    pub fn withdraw(&self, delegator: AccountAddress, amount: Amount) -> PoolResult<Amount> {
        let paid = self.mutate("withdraw", |state| state.withdraw(delegator, amount))?;
        info!(pool = %self.id, %delegator, paid, "inactive stake withdrawn");
        metrics::record_withdrawal(paid);
        Ok(paid)
    }

    pub fn reactivate(&self, delegator: AccountAddress, shares: Shares) -> PoolResult<Amount> {
        let moved = self.mutate("reactivate", |state| state.reactivate(delegator, shares))?;
        debug!(pool = %self.id, %delegator, moved, "pending-inactive stake reactivated");
        Ok(moved)
    }

    pub fn unbond(&self, delegator: AccountAddress, shares: Shares) -> PoolResult<Amount> {
        let paid = self.mutate("unbond", |state| state.unbond(delegator, shares))?;
        info!(pool = %self.id, %delegator, paid, "stake unbonded");
        metrics::record_withdrawal(paid);
        Ok(paid)
    }

    pub fn distribute_reward(
        &self,
        amount: Amount,
        commission_rate_bps: BasisPoints,
        beneficiary: AccountAddress,
    ) -> PoolResult<RewardOutcome> {
        let outcome = self.mutate("distribute_reward", |state| {
            state.distribute_reward(amount, commission_rate_bps, beneficiary)
        })?;
        debug!(
            pool = %self.id,
            amount,
            commission = outcome.commission_amount,
            undistributed = outcome.undistributed,
            "reward distributed"
        );
        metrics::record_reward(amount - outcome.undistributed);
        Ok(outcome)
    }

    pub fn on_new_epoch(&self) -> PoolResult<EpochApplied> {
        let applied = self.mutate("on_new_epoch", |state| state.on_new_epoch())?;
        debug!(
            pool = %self.id,
            activated = applied.activated,
            matured = applied.matured,
            "pool epoch applied"
        );
        Ok(applied)
    }

    // ---------------------------------------------------------------------
    // Halt management
    // ---------------------------------------------------------------------

    /// Operator-only: halt the pool ahead of an investigation.
    pub fn halt(&self, reason: impl Into<String>) {
        let reason = reason.into();
        error!(pool = %self.id, reason, "pool halted by operator");
        metrics::record_pool_halted();
        self.guard.halt(reason);
    }

    pub fn is_halted(&self) -> bool {
        self.guard.is_halted()
    }

    pub fn halt_reason(&self) -> Option<String> {
        self.guard.halt_reason()
    }

    /// Operator-only: resume a halted pool after intervention.
    pub fn resume(&self) {
        info!(pool = %self.id, "pool resumed by operator");
        self.guard.resume();
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn snapshot(&self) -> PoolSnapshot {
        self.state.read().snapshot()
    }

    pub fn total_stake(&self) -> Amount {
        self.state.read().total_stake()
    }

    pub fn next_epoch_voting_power(&self) -> Amount {
        self.state.read().next_epoch_voting_power()
    }

    pub fn current_voting_power(&self) -> Amount {
        self.state.read().current_voting_power()
    }

    pub fn delegator_view(&self, delegator: &AccountAddress) -> DelegatorStakeView {
        self.state.read().delegator_view(delegator)
    }

    pub fn share_balance(&self, delegator: &AccountAddress) -> Shares {
        let state = self.state.read();
        state
            .active
            .share_balance(delegator)
            .saturating_add(state.pending_active.share_balance(delegator))
    }
}
