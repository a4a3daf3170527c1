//! Fallback reward sink adapter

use parking_lot::RwLock;
use sc_05_reward_distributor::RewardSink;
use shared_types::Amount;

/// Accumulates everything the distribution could not place (flooring
/// residue, payouts refused by halted pools, dust commission). A real
/// deployment would route this balance to the treasury; the engine only
/// guarantees it is never destroyed.
#[derive(Debug, Default)]
pub struct AccruingRewardSink {
    balance: RwLock<Amount>,
}

impl AccruingRewardSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self) -> Amount {
        *self.balance.read()
    }
}

impl RewardSink for AccruingRewardSink {
    fn credit(&self, amount: Amount) {
        let mut balance = self.balance.write();
        *balance = balance.saturating_add(amount);
    }
}
