//! Pool state and bucket transitions
//!
//! `PoolState` is a value type: the service clones it, applies one
//! operation, re-checks conservation, and only then swaps it in. Any error
//! mid-operation therefore unwinds the whole operation's effects.

use crate::domain::bucket::{Bucket, BucketKind};
use crate::domain::shares;
use crate::error::{PoolResult, StakePoolError};
use crate::events::{DelegatorStakeView, EpochApplied, PoolSnapshot, RewardOutcome};
use serde::{Deserialize, Serialize};
use shared_types::{
    AccountAddress, Amount, BasisPoints, InvariantViolation, Shares, StakePoolId,
    TimestampMicros, BPS_DENOMINATOR,
};

/// The four-bucket ledger of one validator's pool.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PoolState {
    pub active: Bucket,
    pub inactive: Bucket,
    pub pending_active: Bucket,
    pub pending_inactive: Bucket,
    /// Set on the first unlock of an epoch; consumed at the next boundary.
    /// Pending-inactive only matures on a boundary that observes this flag.
    pub unlock_pending: Option<TimestampMicros>,
    /// Lifetime external value in.
    pub total_deposited: Amount,
    /// Lifetime rewards absorbed.
    pub total_rewarded: Amount,
    /// Lifetime value paid out.
    pub total_withdrawn: Amount,
}

impl PoolState {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------
    // Operations
    // ---------------------------------------------------------------------

    /// Add stake for `delegator`. An owner in the active consensus set
    /// routes new stake to `pending_active` (it must not count until the
    /// next epoch); otherwise it lands in `active` directly.
    pub fn delegate(
        &mut self,
        delegator: AccountAddress,
        amount: Amount,
        owner_in_consensus: bool,
    ) -> PoolResult<Shares> {
        if amount == 0 {
            return Err(StakePoolError::ZeroAmount);
        }
        let bucket = if owner_in_consensus {
            &mut self.pending_active
        } else {
            &mut self.active
        };
        let minted = bucket.credit(delegator, amount, false)?;
        self.total_deposited = self.total_deposited.checked_add(amount).ok_or(
            InvariantViolation::ArithmeticOverflow {
                context: "lifetime deposit counter",
            },
        )?;
        Ok(minted)
    }

    /// Queue `shares` for withdrawal: burn from `active` first, then
    /// `pending_active`, converting the proceeds into `pending_inactive`.
    pub fn unlock(
        &mut self,
        delegator: AccountAddress,
        requested: Shares,
        now: TimestampMicros,
    ) -> PoolResult<Amount> {
        if requested == 0 {
            return Err(StakePoolError::ZeroAmount);
        }
        let active_held = self.active.share_balance(&delegator);
        let pending_held = self.pending_active.share_balance(&delegator);
        let have = active_held.saturating_add(pending_held);
        if have < requested {
            return Err(StakePoolError::InsufficientShares {
                have,
                need: requested,
            });
        }

        let from_active = requested.min(active_held);
        let from_pending = requested - from_active;
        let mut moved = 0u128;
        if from_active > 0 {
            moved += self.active.debit(&delegator, from_active)?;
        }
        if from_pending > 0 {
            moved += self.pending_active.debit(&delegator, from_pending)?;
        }

        // Rejects when the drawn amount floors to zero shares (or to zero
        // value outright): burning claims for nothing is never allowed.
        self.pending_inactive.credit(delegator, moved, false)?;

        if self.unlock_pending.is_none() {
            self.unlock_pending = Some(now);
        }
        Ok(moved)
    }

    /// Pay out from `inactive` only. `amount == 0` means the caller's whole
    /// inactive claim; a non-zero request is capped at that claim.
    pub fn withdraw(&mut self, delegator: AccountAddress, amount: Amount) -> PoolResult<Amount> {
        let held = self.inactive.share_balance(&delegator);
        if held == 0 {
            return Err(StakePoolError::NoInactiveStake);
        }
        let to_burn = if amount == 0 {
            held
        } else {
            let needed = shares::shares_for_amount_ceil(
                amount,
                self.inactive.total_shares(),
                self.inactive.amount,
            )
            .ok_or(InvariantViolation::ArithmeticOverflow {
                context: "withdraw share conversion",
            })?;
            needed.min(held)
        };
        let paid = self.inactive.debit(&delegator, to_burn)?;
        if paid == 0 {
            return Err(StakePoolError::NoInactiveStake);
        }
        self.total_withdrawn = self.total_withdrawn.checked_add(paid).ok_or(
            InvariantViolation::ArithmeticOverflow {
                context: "lifetime withdraw counter",
            },
        )?;
        Ok(paid)
    }

    /// Escape hatch: move `shares` worth of `pending_inactive` back to
    /// `active` before the unlock matures.
    pub fn reactivate(&mut self, delegator: AccountAddress, requested: Shares) -> PoolResult<Amount> {
        if requested == 0 {
            return Err(StakePoolError::ZeroAmount);
        }
        let moved = self.pending_inactive.debit(&delegator, requested)?;
        self.active.credit(delegator, moved, false)?;
        Ok(moved)
    }

    /// Immediate, no-queue payout used by the redelegation flow: burns from
    /// `active` then `pending_active` and pays out synchronously, skipping
    /// `pending_inactive` entirely.
    pub fn unbond(&mut self, delegator: AccountAddress, requested: Shares) -> PoolResult<Amount> {
        if requested == 0 {
            return Err(StakePoolError::ZeroAmount);
        }
        let active_held = self.active.share_balance(&delegator);
        let pending_held = self.pending_active.share_balance(&delegator);
        let have = active_held.saturating_add(pending_held);
        if have < requested {
            return Err(StakePoolError::InsufficientShares {
                have,
                need: requested,
            });
        }

        let from_active = requested.min(active_held);
        let from_pending = requested - from_active;
        let mut paid = 0u128;
        if from_active > 0 {
            paid += self.active.debit(&delegator, from_active)?;
        }
        if from_pending > 0 {
            paid += self.pending_active.debit(&delegator, from_pending)?;
        }
        if paid == 0 {
            return Err(StakePoolError::DepositTooSmall { amount: 0 });
        }
        self.total_withdrawn = self.total_withdrawn.checked_add(paid).ok_or(
            InvariantViolation::ArithmeticOverflow {
                context: "lifetime withdraw counter",
            },
        )?;
        Ok(paid)
    }

    /// Split `amount` into commission (minted to the beneficiary at the
    /// current share price) and pro-rata accrual across the two
    /// reward-eligible buckets, `active` and `pending_inactive`.
    /// `pending_active` and `inactive` earn nothing this epoch.
    pub fn distribute_reward(
        &mut self,
        amount: Amount,
        commission_rate_bps: BasisPoints,
        beneficiary: AccountAddress,
    ) -> PoolResult<RewardOutcome> {
        if commission_rate_bps > BPS_DENOMINATOR {
            return Err(StakePoolError::CommissionRateOutOfRange {
                rate_bps: commission_rate_bps,
            });
        }
        if amount == 0 {
            return Ok(RewardOutcome::default());
        }

        let eligible = self.active.amount.checked_add(self.pending_inactive.amount).ok_or(
            InvariantViolation::ArithmeticOverflow {
                context: "reward eligibility sum",
            },
        )?;
        if eligible == 0 {
            return Ok(RewardOutcome::undistributable(amount));
        }

        let commission = shares::mul_div(amount, commission_rate_bps as u128, BPS_DENOMINATOR as u128)
            .ok_or(InvariantViolation::ArithmeticOverflow {
                context: "commission split",
            })?;
        let remainder = amount - commission;
        let active_part = shares::mul_div(remainder, self.active.amount, eligible).ok_or(
            InvariantViolation::ArithmeticOverflow {
                context: "reward pro-rata split",
            },
        )?;
        let pending_inactive_part = remainder - active_part;

        self.active.accrue(active_part)?;
        self.pending_inactive.accrue(pending_inactive_part)?;

        let mut outcome = RewardOutcome {
            commission_amount: commission,
            active_accrued: active_part,
            pending_inactive_accrued: pending_inactive_part,
            ..RewardOutcome::default()
        };
        if commission > 0 {
            match self.active.credit(beneficiary, commission, false) {
                Ok(minted) => outcome.commission_shares = minted,
                // Commission too small to price a share at the current rate:
                // hand it back for the fallback sink instead of destroying it.
                Err(StakePoolError::DepositTooSmall { .. }) => {
                    outcome.commission_amount = 0;
                    outcome.undistributed = commission;
                }
                Err(e) => return Err(e),
            }
        }

        self.total_rewarded = self
            .total_rewarded
            .checked_add(amount - outcome.undistributed)
            .ok_or(InvariantViolation::ArithmeticOverflow {
                context: "lifetime reward counter",
            })?;
        Ok(outcome)
    }

    /// Apply the epoch boundary: promote `pending_active`, and mature
    /// `pending_inactive` only if an unlock was requested since the last
    /// boundary.
    pub fn on_new_epoch(&mut self) -> PoolResult<EpochApplied> {
        let activated = self.pending_active.amount;
        let mut src = std::mem::take(&mut self.pending_active);
        src.drain_into(&mut self.active)?;

        let mut applied = EpochApplied {
            activated,
            ..EpochApplied::default()
        };
        if self.unlock_pending.is_some() {
            applied.matured = self.pending_inactive.amount;
            let mut maturing = std::mem::take(&mut self.pending_inactive);
            maturing.drain_into(&mut self.inactive)?;
            self.unlock_pending = None;
            applied.unlock_flag_cleared = true;
        }
        Ok(applied)
    }

    // ---------------------------------------------------------------------
    // Invariant I1
    // ---------------------------------------------------------------------

    /// Conservation: bucket totals must equal lifetime deposits plus
    /// rewards minus withdrawals, and each bucket's share supply must equal
    /// the sum of its delegator claims.
    pub fn check_conservation(&self, pool: StakePoolId) -> Result<(), InvariantViolation> {
        let held = self
            .active
            .amount
            .checked_add(self.inactive.amount)
            .and_then(|v| v.checked_add(self.pending_active.amount))
            .and_then(|v| v.checked_add(self.pending_inactive.amount))
            .ok_or(InvariantViolation::ArithmeticOverflow {
                context: "bucket sum",
            })?;
        let expected = self
            .total_deposited
            .checked_add(self.total_rewarded)
            .and_then(|v| v.checked_sub(self.total_withdrawn))
            .ok_or(InvariantViolation::ConservationBreach {
                pool,
                held,
                expected: 0,
            })?;
        if held != expected {
            return Err(InvariantViolation::ConservationBreach {
                pool,
                held,
                expected,
            });
        }

        for (kind, bucket) in self.buckets() {
            let supply = bucket.total_shares();
            let claims = bucket.ledger.claims_total();
            if supply != claims {
                return Err(InvariantViolation::ShareSupplyBreach {
                    pool,
                    bucket: kind.as_str(),
                    supply,
                    claims,
                });
            }
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    fn buckets(&self) -> [(BucketKind, &Bucket); 4] {
        [
            (BucketKind::Active, &self.active),
            (BucketKind::Inactive, &self.inactive),
            (BucketKind::PendingActive, &self.pending_active),
            (BucketKind::PendingInactive, &self.pending_inactive),
        ]
    }

    pub fn total_stake(&self) -> Amount {
        self.active
            .amount
            .saturating_add(self.inactive.amount)
            .saturating_add(self.pending_active.amount)
            .saturating_add(self.pending_inactive.amount)
    }

    /// Stake that will count for consensus next epoch.
    pub fn next_epoch_voting_power(&self) -> Amount {
        self.active.amount.saturating_add(self.pending_active.amount)
    }

    /// Stake counting for consensus this epoch (reward-eligible).
    pub fn current_voting_power(&self) -> Amount {
        self.active
            .amount
            .saturating_add(self.pending_inactive.amount)
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            active: self.active.amount,
            inactive: self.inactive.amount,
            pending_active: self.pending_active.amount,
            pending_inactive: self.pending_inactive.amount,
            unlock_pending: self.unlock_pending,
        }
    }

    pub fn delegator_view(&self, delegator: &AccountAddress) -> DelegatorStakeView {
        DelegatorStakeView {
            active: self.active.claim_of(delegator),
            inactive: self.inactive.claim_of(delegator),
            pending_active: self.pending_active.claim_of(delegator),
            pending_inactive: self.pending_inactive.claim_of(delegator),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> AccountAddress {
        AccountAddress::new([n; 32])
    }

    fn pool_id() -> StakePoolId {
        StakePoolId::derive(&addr(0xEE))
    }

    fn checked(state: &PoolState) {
        state.check_conservation(pool_id()).unwrap();
    }

    #[test]
    fn test_delegate_to_active_when_owner_not_in_consensus() {
        let mut state = PoolState::new();
        let minted = state.delegate(addr(1), 100, false).unwrap();
        assert_eq!(minted, 100);
        assert_eq!(state.active.amount, 100);
        assert_eq!(state.pending_active.amount, 0);
        checked(&state);
    }

    #[test]
    fn test_delegate_to_pending_active_when_owner_in_consensus() {
        let mut state = PoolState::new();
        let minted = state.delegate(addr(1), 100, true).unwrap();
        assert_eq!(minted, 100);
        assert_eq!(state.pending_active.amount, 100);
        assert_eq!(state.active.amount, 0);
        checked(&state);
    }

    #[test]
    fn test_delegate_at_existing_price() {
        let mut state = PoolState::new();
        state.delegate(addr(1), 100, false).unwrap();
        let minted = state.delegate(addr(2), 50, false).unwrap();
        assert_eq!(minted, 50);
        assert_eq!(state.active.amount, 150);
        assert_eq!(state.active.total_shares(), 150);
        checked(&state);
    }

    #[test]
    fn test_unlock_moves_to_pending_inactive_and_sets_flag() {
        let mut state = PoolState::new();
        state.delegate(addr(1), 100, false).unwrap();
        let moved = state.unlock(addr(1), 10, 777).unwrap();
        assert_eq!(moved, 10);
        assert_eq!(state.active.amount, 90);
        assert_eq!(state.pending_inactive.amount, 10);
        assert_eq!(state.unlock_pending, Some(777));
        checked(&state);
    }

    #[test]
    fn test_unlock_flag_timestamp_keeps_first() {
        let mut state = PoolState::new();
        state.delegate(addr(1), 100, false).unwrap();
        state.unlock(addr(1), 10, 100).unwrap();
        state.unlock(addr(1), 10, 200).unwrap();
        assert_eq!(state.unlock_pending, Some(100));
    }

    #[test]
    fn test_unlock_draws_active_then_pending_active() {
        let mut state = PoolState::new();
        state.delegate(addr(1), 60, false).unwrap();
        state.delegate(addr(1), 40, true).unwrap();
        let moved = state.unlock(addr(1), 80, 1).unwrap();
        assert_eq!(moved, 80);
        assert_eq!(state.active.amount, 0);
        assert_eq!(state.pending_active.amount, 20);
        assert_eq!(state.pending_inactive.amount, 80);
        checked(&state);
    }

    #[test]
    fn test_unlock_insufficient_shares() {
        let mut state = PoolState::new();
        state.delegate(addr(1), 50, false).unwrap();
        let err = state.unlock(addr(1), 51, 1).unwrap_err();
        assert_eq!(err, StakePoolError::InsufficientShares { have: 50, need: 51 });
        checked(&state);
    }

    #[test]
    fn test_epoch_without_unlock_keeps_pending_inactive() {
        let mut state = PoolState::new();
        state.delegate(addr(1), 100, false).unwrap();
        state.unlock(addr(1), 10, 5).unwrap();
        // Simulate maturity flag already consumed.
        state.unlock_pending = None;
        let applied = state.on_new_epoch().unwrap();
        assert_eq!(applied.matured, 0);
        assert_eq!(state.pending_inactive.amount, 10);
        assert_eq!(state.inactive.amount, 0);
        checked(&state);
    }

    #[test]
    fn test_epoch_with_unlock_flag_matures_pending_inactive() {
        let mut state = PoolState::new();
        state.delegate(addr(1), 100, false).unwrap();
        state.unlock(addr(1), 10, 5).unwrap();
        let applied = state.on_new_epoch().unwrap();
        assert_eq!(applied.matured, 10);
        assert!(applied.unlock_flag_cleared);
        assert_eq!(state.pending_inactive.amount, 0);
        assert_eq!(state.inactive.amount, 10);
        assert_eq!(state.unlock_pending, None);
        checked(&state);
    }

    #[test]
    fn test_epoch_promotes_pending_active() {
        let mut state = PoolState::new();
        state.delegate(addr(1), 100, true).unwrap();
        let applied = state.on_new_epoch().unwrap();
        assert_eq!(applied.activated, 100);
        assert_eq!(state.active.amount, 100);
        assert_eq!(state.pending_active.amount, 0);
        checked(&state);
    }

    #[test]
    fn test_epoch_is_noop_with_only_active_stake() {
        let mut state = PoolState::new();
        state.delegate(addr(1), 100, false).unwrap();
        let before = state.clone();
        let applied = state.on_new_epoch().unwrap();
        assert_eq!(applied, EpochApplied::default());
        assert_eq!(state, before);
    }

    #[test]
    fn test_withdraw_all_inactive() {
        let mut state = PoolState::new();
        state.delegate(addr(1), 100, false).unwrap();
        state.unlock(addr(1), 30, 1).unwrap();
        state.on_new_epoch().unwrap();
        let paid = state.withdraw(addr(1), 0).unwrap();
        assert_eq!(paid, 30);
        assert_eq!(state.inactive.amount, 0);
        assert_eq!(state.total_withdrawn, 30);
        checked(&state);
    }

    #[test]
    fn test_withdraw_partial_capped_at_claim() {
        let mut state = PoolState::new();
        state.delegate(addr(1), 100, false).unwrap();
        state.unlock(addr(1), 30, 1).unwrap();
        state.on_new_epoch().unwrap();
        let paid = state.withdraw(addr(1), 500).unwrap();
        assert_eq!(paid, 30);
        checked(&state);
    }

    #[test]
    fn test_withdraw_without_claim_fails() {
        let mut state = PoolState::new();
        state.delegate(addr(1), 100, false).unwrap();
        assert_eq!(
            state.withdraw(addr(1), 0).unwrap_err(),
            StakePoolError::NoInactiveStake
        );
        assert_eq!(
            state.withdraw(addr(2), 0).unwrap_err(),
            StakePoolError::NoInactiveStake
        );
    }

    #[test]
    fn test_reactivate_returns_stake_to_active() {
        let mut state = PoolState::new();
        state.delegate(addr(1), 100, false).unwrap();
        state.unlock(addr(1), 40, 1).unwrap();
        let moved = state.reactivate(addr(1), 40).unwrap();
        assert_eq!(moved, 40);
        assert_eq!(state.active.amount, 100);
        assert_eq!(state.pending_inactive.amount, 0);
        checked(&state);
    }

    #[test]
    fn test_unbond_pays_out_synchronously() {
        let mut state = PoolState::new();
        state.delegate(addr(1), 100, false).unwrap();
        let paid = state.unbond(addr(1), 25).unwrap();
        assert_eq!(paid, 25);
        assert_eq!(state.active.amount, 75);
        assert_eq!(state.pending_inactive.amount, 0);
        assert_eq!(state.total_withdrawn, 25);
        checked(&state);
    }

    #[test]
    fn test_reward_split_with_commission() {
        // Scenario: active=900, pending_inactive=100, reward 100 at 10%.
        let mut state = PoolState::new();
        state.delegate(addr(1), 900, false).unwrap();
        state.delegate(addr(2), 100, false).unwrap();
        state.unlock(addr(2), 100, 1).unwrap();
        assert_eq!(state.active.amount, 900);
        assert_eq!(state.pending_inactive.amount, 100);

        let outcome = state
            .distribute_reward(100, 1_000, addr(9))
            .unwrap();
        assert_eq!(outcome.commission_amount, 10);
        assert!(outcome.commission_shares > 0);
        assert_eq!(outcome.active_accrued, 81);
        assert_eq!(outcome.pending_inactive_accrued, 9);
        assert_eq!(outcome.undistributed, 0);
        assert_eq!(state.active.amount, 900 + 81 + 10);
        assert_eq!(state.pending_inactive.amount, 109);
        checked(&state);
    }

    #[test]
    fn test_reward_with_no_eligible_stake_is_returned() {
        let mut state = PoolState::new();
        state.delegate(addr(1), 100, true).unwrap(); // pending_active only
        let outcome = state.distribute_reward(50, 0, addr(9)).unwrap();
        assert_eq!(outcome.undistributed, 50);
        assert_eq!(state.total_rewarded, 0);
        checked(&state);
    }

    #[test]
    fn test_reward_rate_out_of_range_rejected() {
        let mut state = PoolState::new();
        assert_eq!(
            state.distribute_reward(50, 10_001, addr(9)).unwrap_err(),
            StakePoolError::CommissionRateOutOfRange { rate_bps: 10_001 }
        );
    }

    #[test]
    fn test_reward_accrual_raises_share_price_not_supply() {
        let mut state = PoolState::new();
        state.delegate(addr(1), 100, false).unwrap();
        let shares_before = state.active.total_shares();
        state.distribute_reward(100, 0, addr(9)).unwrap();
        assert_eq!(state.active.total_shares(), shares_before);
        assert_eq!(state.active.claim_of(&addr(1)), 200);
        checked(&state);
    }

    #[test]
    fn test_conservation_detects_tampering() {
        let mut state = PoolState::new();
        state.delegate(addr(1), 100, false).unwrap();
        state.active.amount += 1;
        assert!(matches!(
            state.check_conservation(pool_id()),
            Err(InvariantViolation::ConservationBreach { .. })
        ));
    }
}
