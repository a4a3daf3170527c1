//! Epoch state entity

use serde::{Deserialize, Serialize};
use shared_types::{EpochNumber, TimestampMicros};

/// The global epoch clock.
///
/// INVARIANT: `current_epoch` only ever advances by exactly 1 per
/// successful `advance` call, and `advance` must be gated by `can_trigger`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EpochState {
    /// Monotonically increasing epoch counter.
    pub current_epoch: EpochNumber,
    /// Timestamp of the last successful transition.
    pub last_transition_time: TimestampMicros,
    /// Minimum duration between transitions. Governance-mutable; a change
    /// applies to the next comparison only, never retroactively.
    pub interval_micros: u64,
}

impl EpochState {
    pub fn new(genesis_time: TimestampMicros, interval_micros: u64) -> Self {
        Self {
            current_epoch: 0,
            last_transition_time: genesis_time,
            interval_micros,
        }
    }

    /// Earliest timestamp at which the next trigger is accepted.
    pub fn next_eligible_time(&self) -> TimestampMicros {
        self.last_transition_time
            .saturating_add(self.interval_micros)
    }

    /// Whether a trigger at `now` would be accepted.
    pub fn can_trigger(&self, now: TimestampMicros) -> bool {
        now >= self.next_eligible_time()
    }

    /// Microseconds until the next trigger becomes eligible (0 if eligible).
    pub fn remaining_micros(&self, now: TimestampMicros) -> u64 {
        self.next_eligible_time().saturating_sub(now)
    }

    /// Advance to the next epoch, stamping the transition time.
    ///
    /// Callers must have checked `can_trigger` first; this method is the
    /// only place the counter moves.
    pub fn advance(&mut self, now: TimestampMicros) -> EpochNumber {
        self.current_epoch += 1;
        self.last_transition_time = now;
        self.current_epoch
    }
}
