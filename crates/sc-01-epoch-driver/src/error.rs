//! Error types for the Epoch Driver subsystem

use shared_types::AccountAddress;
use thiserror::Error;

/// Epoch driver errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EpochError {
    /// Trigger attempted before the configured interval elapsed
    #[error("epoch interval not elapsed: {remaining_micros}us remaining")]
    IntervalNotElapsed { remaining_micros: u64 },

    /// Caller is not authorized to drive epoch transitions
    #[error("unauthorized caller: {caller}")]
    UnauthorizedCaller { caller: AccountAddress },

    /// A zero interval would make every trigger eligible
    #[error("epoch interval must be non-zero")]
    ZeroInterval,
}

/// Result type for epoch driver operations
pub type EpochResult<T> = Result<T, EpochError>;

/// Failure reported by a reconfiguration subscriber.
///
/// Captured per subscriber and surfaced in the `EpochOutcome`; never
/// propagated into the trigger result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct SubscriberError(pub String);

impl SubscriberError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}
