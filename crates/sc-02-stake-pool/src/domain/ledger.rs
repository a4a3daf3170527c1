//! Per-bucket share ledger

use serde::{Deserialize, Serialize};
use shared_types::{AccountAddress, Shares};
use std::collections::BTreeMap;

/// Fungible, non-transferable share ledger for a single bucket.
///
/// BTreeMap keeps iteration deterministic, which matters when bucket
/// contents are re-priced and merged at epoch boundaries.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShareLedger {
    balances: BTreeMap<AccountAddress, Shares>,
    total_shares: Shares,
}

impl ShareLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, delegator: &AccountAddress) -> Shares {
        self.balances.get(delegator).copied().unwrap_or(0)
    }

    pub fn total_shares(&self) -> Shares {
        self.total_shares
    }

    pub fn is_empty(&self) -> bool {
        self.total_shares == 0
    }

    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    /// Iterate holders in address order.
    pub fn holders(&self) -> impl Iterator<Item = (&AccountAddress, &Shares)> {
        self.balances.iter()
    }

    /// Sum of all delegator claims. Equals `total_shares` unless the ledger
    /// itself is corrupt; the conservation check compares the two.
    pub fn claims_total(&self) -> Shares {
        self.balances
            .values()
            .fold(0u128, |acc, s| acc.saturating_add(*s))
    }

    /// Mint `shares` to `delegator`. Returns false on supply overflow.
    #[must_use]
    pub fn mint(&mut self, delegator: AccountAddress, shares: Shares) -> bool {
        let Some(new_total) = self.total_shares.checked_add(shares) else {
            return false;
        };
        let entry = self.balances.entry(delegator).or_insert(0);
        let Some(new_balance) = entry.checked_add(shares) else {
            return false;
        };
        *entry = new_balance;
        self.total_shares = new_total;
        true
    }

    /// Burn `shares` from `delegator`. Returns false if the balance is
    /// short; never partially burns.
    #[must_use]
    pub fn burn(&mut self, delegator: &AccountAddress, shares: Shares) -> bool {
        match self.balances.get_mut(delegator) {
            Some(balance) if *balance >= shares => {
                *balance -= shares;
                if *balance == 0 {
                    self.balances.remove(delegator);
                }
                self.total_shares -= shares;
                true
            }
            _ => false,
        }
    }

    /// Drop all entries, returning the ledger to empty.
    pub fn clear(&mut self) {
        self.balances.clear();
        self.total_shares = 0;
    }
}
