//! Driving Ports (API - Inbound)

use crate::error::EpochResult;
use crate::events::EpochOutcome;
use shared_types::{AccountAddress, EpochNumber, TimestampMicros};

/// Primary Epoch Driver API.
///
/// Driven by the external heartbeat; everything here is synchronous and
/// runs to completion before the next operation begins.
pub trait EpochApi: Send + Sync {
    /// Whether a trigger right now would be accepted.
    fn can_trigger(&self) -> bool;

    /// Advance the epoch and fan out reconfiguration notifications.
    ///
    /// Fails without mutating state if the caller is unauthorized or the
    /// interval has not elapsed.
    fn trigger(&self, caller: &AccountAddress) -> EpochResult<EpochOutcome>;

    /// Governance: replace the trigger interval, effective for the next
    /// comparison only.
    fn set_interval(&self, caller: &AccountAddress, interval_micros: u64) -> EpochResult<()>;

    fn current_epoch(&self) -> EpochNumber;

    fn last_transition_time(&self) -> TimestampMicros;

    fn interval_micros(&self) -> u64;
}
