//! Error types for the Stake Pool subsystem

use shared_types::{Amount, InvariantViolation, Shares};
use thiserror::Error;

/// Stake pool errors.
///
/// Every variant except `Invariant` is a caller-visible rejection that
/// aborts only the current operation. `Invariant` wraps the fatal category:
/// the pool halts and refuses further mutation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StakePoolError {
    /// Zero-amount operations are meaningless and rejected up front
    #[error("amount must be non-zero")]
    ZeroAmount,

    /// Deposit or bucket move whose share conversion floors to zero
    #[error("deposit of {amount} is too small to mint shares at the current price")]
    DepositTooSmall { amount: Amount },

    /// Delegator holds fewer shares than the operation requires
    #[error("insufficient shares: have {have}, need {need}")]
    InsufficientShares { have: Shares, need: Shares },

    /// Withdraw with no inactive claim to draw from
    #[error("no inactive stake available to withdraw")]
    NoInactiveStake,

    /// Commission rate above 100%
    #[error("commission rate {rate_bps} bps exceeds the 10000 bps denominator")]
    CommissionRateOutOfRange { rate_bps: u64 },

    /// A second mutating call observed the pool mid-mutation
    #[error("pool is busy with another state-mutating call")]
    PoolBusy,

    /// Pool halted after an invariant breach; mutation refused
    #[error("pool halted: {reason}")]
    PoolHalted { reason: String },

    /// Fatal ledger breach; the pool halts when this is returned
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

/// Result type for stake pool operations
pub type PoolResult<T> = Result<T, StakePoolError>;
