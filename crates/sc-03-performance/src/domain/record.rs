//! Per-slot proposal counters

use serde::{Deserialize, Serialize};

/// Proposal counters for one active-validator slot in one epoch.
///
/// Created when a validator enters the active set, mutated once per block
/// by the block prologue, archived then zeroed at the epoch boundary.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PerformanceRecord {
    pub successful_proposals: u64,
    pub failed_proposals: u64,
}

impl PerformanceRecord {
    pub fn total_proposals(&self) -> u64 {
        self.successful_proposals
            .saturating_add(self.failed_proposals)
    }

    pub fn record_success(&mut self) {
        self.successful_proposals = self.successful_proposals.saturating_add(1);
    }

    pub fn record_failure(&mut self) {
        self.failed_proposals = self.failed_proposals.saturating_add(1);
    }
}
