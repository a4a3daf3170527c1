//! Outgoing payloads and read-model views for the Stake Pool subsystem

use serde::{Deserialize, Serialize};
use shared_types::{Amount, Shares, TimestampMicros};

/// Result of one reward distribution into a pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewardOutcome {
    /// Commission carved out for the beneficiary.
    pub commission_amount: Amount,
    /// Shares minted to the beneficiary for that commission.
    pub commission_shares: Shares,
    /// Accrued to the active bucket (no minting).
    pub active_accrued: Amount,
    /// Accrued to the pending-inactive bucket (no minting).
    pub pending_inactive_accrued: Amount,
    /// Value the pool could not absorb; the caller must route this to the
    /// fallback sink rather than dropping it.
    pub undistributed: Amount,
}

impl RewardOutcome {
    pub fn undistributable(amount: Amount) -> Self {
        Self {
            undistributed: amount,
            ..Self::default()
        }
    }
}

/// Result of applying an epoch boundary to a pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EpochApplied {
    /// Amount promoted pending_active -> active.
    pub activated: Amount,
    /// Amount matured pending_inactive -> inactive (zero unless the unlock
    /// flag was set).
    pub matured: Amount,
    /// Whether the unlock-pending flag was consumed.
    pub unlock_flag_cleared: bool,
}

/// Per-delegator view across the four buckets (floor-priced claims).
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DelegatorStakeView {
    pub active: Amount,
    pub inactive: Amount,
    pub pending_active: Amount,
    pub pending_inactive: Amount,
}

impl DelegatorStakeView {
    pub fn total(&self) -> Amount {
        self.active
            .saturating_add(self.inactive)
            .saturating_add(self.pending_active)
            .saturating_add(self.pending_inactive)
    }
}

/// Whole-pool snapshot for queries and logging.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PoolSnapshot {
    pub active: Amount,
    pub inactive: Amount,
    pub pending_active: Amount,
    pub pending_inactive: Amount,
    pub unlock_pending: Option<TimestampMicros>,
}

impl PoolSnapshot {
    pub fn total(&self) -> Amount {
        self.active
            .saturating_add(self.inactive)
            .saturating_add(self.pending_active)
            .saturating_add(self.pending_inactive)
    }
}
