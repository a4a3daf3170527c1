//! A single stake bucket: an amount plus its share ledger

use crate::domain::ledger::ShareLedger;
use crate::domain::shares;
use crate::error::{PoolResult, StakePoolError};
use serde::{Deserialize, Serialize};
use shared_types::{AccountAddress, Amount, InvariantViolation, Shares};

/// The four states a unit of staked value can be in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BucketKind {
    Active,
    Inactive,
    PendingActive,
    PendingInactive,
}

impl BucketKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BucketKind::Active => "active",
            BucketKind::Inactive => "inactive",
            BucketKind::PendingActive => "pending_active",
            BucketKind::PendingInactive => "pending_inactive",
        }
    }
}

/// One bucket of a stake pool.
///
/// `amount` is the pooled value; the ledger tracks proportional ownership.
/// Rewards accrue by raising `amount` without minting, which is what makes
/// shares appreciate.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bucket {
    pub amount: Amount,
    pub ledger: ShareLedger,
}

impl Bucket {
    pub fn total_shares(&self) -> Shares {
        self.ledger.total_shares()
    }

    pub fn share_balance(&self, delegator: &AccountAddress) -> Shares {
        self.ledger.balance_of(delegator)
    }

    /// Floor value of a delegator's claim at the current price.
    pub fn claim_of(&self, delegator: &AccountAddress) -> Amount {
        shares::amount_for_shares(
            self.ledger.balance_of(delegator),
            self.ledger.total_shares(),
            self.amount,
        )
        .unwrap_or(0)
    }

    /// Deposit `amount`, minting shares at the current price.
    ///
    /// `floor_to_one` selects the policy for conversions that round to zero
    /// shares: external deposits reject (`DepositTooSmall`), internal
    /// bucket-to-bucket moves floor the mint at one share so an existing
    /// claim is never silently erased by an epoch transition.
    pub fn credit(
        &mut self,
        delegator: AccountAddress,
        amount: Amount,
        floor_to_one: bool,
    ) -> PoolResult<Shares> {
        let minted = shares::shares_for_deposit(amount, self.total_shares(), self.amount)
            .ok_or(InvariantViolation::ArithmeticOverflow {
                context: "bucket credit share conversion",
            })?;
        let minted = match (minted, floor_to_one) {
            (0, false) => return Err(StakePoolError::DepositTooSmall { amount }),
            (0, true) => 1,
            (n, _) => n,
        };
        if !self.ledger.mint(delegator, minted) {
            return Err(InvariantViolation::ArithmeticOverflow {
                context: "bucket credit share mint",
            }
            .into());
        }
        self.amount = self.amount.checked_add(amount).ok_or(
            InvariantViolation::ArithmeticOverflow {
                context: "bucket credit amount",
            },
        )?;
        Ok(minted)
    }

    /// Burn `shares` from `delegator`, removing the floor-priced amount.
    ///
    /// A sole remaining holder drains the whole bucket so flooring residue
    /// is never stranded without an owner.
    pub fn debit(&mut self, delegator: &AccountAddress, burned: Shares) -> PoolResult<Amount> {
        let have = self.ledger.balance_of(delegator);
        if have < burned {
            return Err(StakePoolError::InsufficientShares { have, need: burned });
        }
        let amount = if burned == self.ledger.total_shares() {
            self.amount
        } else {
            shares::amount_for_shares(burned, self.ledger.total_shares(), self.amount).ok_or(
                InvariantViolation::ArithmeticOverflow {
                    context: "bucket debit share conversion",
                },
            )?
        };
        if !self.ledger.burn(delegator, burned) {
            return Err(StakePoolError::InsufficientShares { have, need: burned });
        }
        self.amount -= amount;
        Ok(amount)
    }

    /// Add value without minting shares (reward accrual).
    pub fn accrue(&mut self, amount: Amount) -> PoolResult<()> {
        self.amount = self
            .amount
            .checked_add(amount)
            .ok_or(InvariantViolation::ArithmeticOverflow {
                context: "bucket accrual",
            })?;
        Ok(())
    }

    /// Move this bucket's entire contents into `dst`, re-pricing each
    /// delegator's claim at `dst`'s share price. The last holder takes the
    /// flooring remainder so the moved amounts sum exactly to `self.amount`.
    pub fn drain_into(&mut self, dst: &mut Bucket) -> PoolResult<()> {
        if self.ledger.is_empty() {
            // Ownerless value (cannot arise through the public operations,
            // but must never be dropped): accrue it to dst's holders.
            if self.amount > 0 {
                dst.accrue(self.amount)?;
                self.amount = 0;
            }
            return Ok(());
        }
        let holders: Vec<(AccountAddress, Shares)> =
            self.ledger.holders().map(|(a, s)| (*a, *s)).collect();
        let total_shares = self.ledger.total_shares();
        let mut remaining = self.amount;

        for (i, (delegator, held)) in holders.iter().enumerate() {
            let slice = if i + 1 == holders.len() {
                remaining
            } else {
                shares::amount_for_shares(*held, total_shares, self.amount).ok_or(
                    InvariantViolation::ArithmeticOverflow {
                        context: "bucket drain share conversion",
                    },
                )?
            };
            remaining -= slice;
            dst.credit(*delegator, slice, true)?;
        }

        self.amount = 0;
        self.ledger.clear();
        Ok(())
    }
}
