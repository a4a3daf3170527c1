//! Error types for the Validator Lifecycle subsystem

use crate::domain::commission::CommissionViolation;
use crate::domain::status::ValidatorStatus;
use sc_02_stake_pool::StakePoolError;
use shared_types::{AccountAddress, Amount, InvariantViolation};
use thiserror::Error;

/// Validator lifecycle errors.
///
/// Everything except `Invariant` is a synchronous, caller-visible
/// rejection aborting only the current operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LifecycleError {
    /// Operator already has a validator record
    #[error("validator already registered for operator {operator}")]
    AlreadyRegistered { operator: AccountAddress },

    /// No validator record for this operator
    #[error("unknown validator: {operator}")]
    UnknownValidator { operator: AccountAddress },

    /// Registration bond below the configured minimum
    #[error("bonded amount {bonded} below configured minimum {minimum}")]
    BondBelowMinimum { bonded: Amount, minimum: Amount },

    /// Commission parameters violate the configured caps
    #[error(transparent)]
    CommissionInvalid(#[from] CommissionViolation),

    /// Display name already taken by another validator
    #[error("display name already registered: {name}")]
    NameCollision { name: String },

    /// Consensus key already registered by another validator
    #[error("consensus key collides with an existing validator")]
    KeyCollision,

    /// Operation not legal from the validator's current status
    #[error("cannot {operation} validator {operator} from status {from}")]
    InvalidStateTransition {
        operator: AccountAddress,
        from: ValidatorStatus,
        operation: &'static str,
    },

    /// Next-epoch stake outside the configured bounds
    #[error("next-epoch stake {stake} outside bounds [{min}, {max}]")]
    StakeOutOfBounds {
        stake: Amount,
        min: Amount,
        max: Amount,
    },

    /// This epoch's joining power would exceed the growth cap
    #[error("joining power {joining} exceeds allowed increase {allowed}")]
    VotingPowerIncreaseLimitExceeded { joining: Amount, allowed: Amount },

    /// Validator set at capacity
    #[error("validator set full at capacity {capacity}")]
    ValidatorSetFull { capacity: usize },

    /// Removing the last active validator would halt consensus
    #[error("cannot remove the last active validator")]
    LastActiveValidator,

    /// Underlying pool rejected the operation
    #[error(transparent)]
    Pool(#[from] StakePoolError),

    /// Fatal cross-epoch state violation
    #[error(transparent)]
    Invariant(InvariantViolation),
}

/// Result type for lifecycle operations
pub type LifecycleResult<T> = Result<T, LifecycleError>;
