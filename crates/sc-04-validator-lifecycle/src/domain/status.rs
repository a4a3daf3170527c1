//! Validator status state machine

use serde::{Deserialize, Serialize};

/// Lifecycle status of a registered validator.
///
/// Transitions run only along the cycle
/// INACTIVE -> PENDING_ACTIVE -> ACTIVE -> PENDING_INACTIVE -> INACTIVE,
/// except the forced demotion ACTIVE -> PENDING_INACTIVE on a stake
/// shortfall (same edge as a voluntary leave) and the PENDING_ACTIVE ->
/// INACTIVE revert when a join is withdrawn before the boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ValidatorStatus {
    /// Registered but not part of consensus.
    #[default]
    Inactive,
    /// Join accepted; becomes active at the next epoch boundary.
    PendingActive,
    /// Part of the consensus set, holds a validator index.
    Active,
    /// Leaving; becomes inactive at the next epoch boundary.
    PendingInactive,
}

impl ValidatorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidatorStatus::Inactive => "inactive",
            ValidatorStatus::PendingActive => "pending_active",
            ValidatorStatus::Active => "active",
            ValidatorStatus::PendingInactive => "pending_inactive",
        }
    }

    /// Whether this validator currently occupies a consensus slot (it may
    /// still be winding down as pending-inactive).
    pub fn holds_consensus_slot(&self) -> bool {
        matches!(self, ValidatorStatus::Active | ValidatorStatus::PendingInactive)
    }
}

impl std::fmt::Display for ValidatorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
