//! # Error Types
//!
//! Defines the cross-subsystem fatal error category. Recoverable,
//! caller-visible rejections live in each subsystem's own error enum; an
//! `InvariantViolation` is different: it marks a ledger-conservation or
//! state-machine breach that must be unreachable by construction. Observing
//! one means a logic defect, and the affected component halts further
//! mutation rather than tolerating it.

use crate::entities::{Amount, StakePoolId};
use thiserror::Error;

/// Fatal invariant breaches. Never caught-and-continued.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Pool bucket totals diverged from the lifetime deposit/withdraw ledger.
    #[error(
        "conservation breach in pool {pool}: buckets hold {held}, ledger expects {expected}"
    )]
    ConservationBreach {
        pool: StakePoolId,
        held: Amount,
        expected: Amount,
    },

    /// A bucket's share supply diverged from the sum of delegator claims.
    #[error("share supply breach in pool {pool}: bucket {bucket} supply {supply}, claims {claims}")]
    ShareSupplyBreach {
        pool: StakePoolId,
        bucket: &'static str,
        supply: u128,
        claims: u128,
    },

    /// Total voting power would underflow; transitions must never reach this.
    #[error("total voting power underflow: current {current}, attempted decrement {decrement}")]
    VotingPowerUnderflow { current: u128, decrement: u128 },

    /// Arithmetic overflow in a balance or share computation.
    #[error("arithmetic overflow in {context}")]
    ArithmeticOverflow { context: &'static str },
}
