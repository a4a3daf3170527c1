//! Error types for the Reward Distributor subsystem

use thiserror::Error;

/// Reward distributor errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DistributorError {
    /// Pending pool would overflow
    #[error("pending reward pool overflow: holding {holding}, adding {adding}")]
    RewardPoolOverflow { holding: u128, adding: u128 },

    /// Weight arithmetic exceeded the representable range
    #[error("reward weight overflow for validator set of {validators}")]
    WeightOverflow { validators: usize },
}

/// Result type for reward distributor operations
pub type DistributorResult<T> = Result<T, DistributorError>;
