//! Epoch transition report and observability payloads

use shared_types::{AccountAddress, Amount, BasisPoints, EpochNumber};

/// One ACTIVE validator after an epoch transition.
#[derive(Clone, Debug)]
pub struct ActiveValidatorEntry {
    pub operator: AccountAddress,
    /// Slot index held during the epoch that just closed; `None` for a
    /// freshly promoted validator. This is the key into the closing
    /// epoch's performance table (slot indices are not stable).
    pub previous_index: Option<u32>,
    /// Freshly assigned contiguous index for the new epoch.
    pub index: u32,
    /// Voting power recomputed from the pool's current stake.
    pub voting_power: Amount,
    pub commission_rate_bps: BasisPoints,
    pub beneficiary: AccountAddress,
}

/// Full result of one lifecycle epoch transition, consumed by the reward
/// distributor before the performance tracker resets.
#[derive(Clone, Debug, Default)]
pub struct EpochTransitionReport {
    pub epoch: EpochNumber,
    /// The new ACTIVE set in slot order.
    pub entries: Vec<ActiveValidatorEntry>,
    pub promoted: Vec<AccountAddress>,
    pub demoted: Vec<AccountAddress>,
    /// Active validators forced out for falling under the minimum stake.
    pub evicted: Vec<AccountAddress>,
    /// Pools whose epoch application failed (halted pools); skipped, not
    /// fatal.
    pub skipped_pools: Vec<(AccountAddress, String)>,
    pub total_voting_power: Amount,
}
