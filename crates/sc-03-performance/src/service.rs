//! Performance Tracker service

use crate::domain::record::PerformanceRecord;
use crate::error::{PerformanceError, PerformanceResult};
use parking_lot::RwLock;
use shared_types::EpochNumber;
use std::collections::BTreeMap;
use tracing::debug;

/// Tracker configuration
#[derive(Clone, Copy, Debug)]
pub struct TrackerConfig {
    /// Archived epochs retained for audit queries before pruning.
    pub history_retention_epochs: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            history_retention_epochs: 32,
        }
    }
}

struct TrackerState {
    /// Epoch the current table belongs to.
    epoch: EpochNumber,
    current: Vec<PerformanceRecord>,
    history: BTreeMap<EpochNumber, Vec<PerformanceRecord>>,
}

/// Per-epoch proposal counters for the active validator set.
pub struct PerformanceTracker {
    config: TrackerConfig,
    state: RwLock<TrackerState>,
}

impl PerformanceTracker {
    pub fn new(config: TrackerConfig, initial_active_count: usize) -> Self {
        Self {
            config,
            state: RwLock::new(TrackerState {
                epoch: 0,
                current: vec![PerformanceRecord::default(); initial_active_count],
                history: BTreeMap::new(),
            }),
        }
    }

    /// Record one block: at most one successful proposer plus the slots
    /// that failed to propose. Out-of-range indices are dropped, not
    /// trusted: the prologue caller reports raw data.
    pub fn record_block(&self, proposer: Option<usize>, failed: &[usize]) {
        let mut state = self.state.write();
        let active_count = state.current.len();

        if let Some(slot) = proposer {
            match state.current.get_mut(slot) {
                Some(record) => record.record_success(),
                None => {
                    debug!(slot, active_count, "ignoring out-of-range proposer slot");
                }
            }
        }
        for &slot in failed {
            match state.current.get_mut(slot) {
                Some(record) => record.record_failure(),
                None => {
                    debug!(slot, active_count, "ignoring out-of-range failed slot");
                }
            }
        }
    }

    /// Archive the closing epoch's table, zero all counters, and size the
    /// table for the freshly computed active set.
    pub fn rotate(&self, next_epoch: EpochNumber, next_active_count: usize) {
        let mut state = self.state.write();
        let closing_epoch = state.epoch;
        let closing = std::mem::replace(
            &mut state.current,
            vec![PerformanceRecord::default(); next_active_count],
        );
        state.history.insert(closing_epoch, closing);
        state.epoch = next_epoch;

        // Prune beyond the retention window.
        let retention = self.config.history_retention_epochs as u64;
        let min_keep = next_epoch.saturating_sub(retention);
        state.history.retain(|epoch, _| *epoch >= min_keep);

        debug!(
            closing_epoch,
            next_epoch, next_active_count, "performance table rotated"
        );
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn current_epoch(&self) -> EpochNumber {
        self.state.read().epoch
    }

    pub fn active_count(&self) -> usize {
        self.state.read().current.len()
    }

    pub fn current(&self, slot: usize) -> Option<PerformanceRecord> {
        self.state.read().current.get(slot).copied()
    }

    pub fn current_table(&self) -> Vec<PerformanceRecord> {
        self.state.read().current.clone()
    }

    /// Aggregate (successful, total) proposals across the current table.
    pub fn current_totals(&self) -> (u64, u64) {
        let state = self.state.read();
        state.current.iter().fold((0u64, 0u64), |(s, t), r| {
            (
                s.saturating_add(r.successful_proposals),
                t.saturating_add(r.total_proposals()),
            )
        })
    }

    /// Read-only audit query into archived epochs.
    pub fn epoch_history(&self, epoch: EpochNumber) -> PerformanceResult<Vec<PerformanceRecord>> {
        self.state
            .read()
            .history
            .get(&epoch)
            .cloned()
            .ok_or(PerformanceError::EpochNotRetained { epoch })
    }
}
