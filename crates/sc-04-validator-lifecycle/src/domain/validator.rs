//! Validator record entity

use crate::domain::commission::Commission;
use crate::domain::status::ValidatorStatus;
use serde::{Deserialize, Serialize};
use shared_types::{AccountAddress, Amount, ConsensusKey, NetworkKey, StakePoolId};

/// Parameters supplied at registration.
#[derive(Clone, Debug)]
pub struct RegistrationParams {
    pub operator: AccountAddress,
    /// Human-readable display name; unique across the set.
    pub name: String,
    pub consensus_key: ConsensusKey,
    pub network_key: NetworkKey,
    /// Commission destination (usually the operator, not required to be).
    pub beneficiary: AccountAddress,
    pub commission: Commission,
}

/// One registered validator.
///
/// `validator_index` is stable only while the validator is ACTIVE; it is
/// reassigned contiguously at every epoch boundary and cleared on exit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidatorRecord {
    pub operator: AccountAddress,
    pub name: String,
    pub consensus_key: ConsensusKey,
    pub network_key: NetworkKey,
    pub beneficiary: AccountAddress,
    pub status: ValidatorStatus,
    /// Consensus weight while ACTIVE; zero otherwise.
    pub voting_power: Amount,
    pub validator_index: Option<u32>,
    pub commission: Commission,
    /// Owning relationship: exactly one pool, created at registration.
    pub stake_pool_id: StakePoolId,
    /// Power accrued against this epoch's growth cap while PENDING_ACTIVE;
    /// refunded on a pre-boundary leave.
    pub joining_power: Amount,
}

impl ValidatorRecord {
    pub fn new(params: &RegistrationParams) -> Self {
        Self {
            operator: params.operator,
            name: params.name.clone(),
            consensus_key: params.consensus_key,
            network_key: params.network_key,
            beneficiary: params.beneficiary,
            status: ValidatorStatus::Inactive,
            voting_power: 0,
            validator_index: None,
            commission: params.commission,
            stake_pool_id: StakePoolId::derive(&params.operator),
            joining_power: 0,
        }
    }
}
