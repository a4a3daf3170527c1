//! # Core Domain Entities
//!
//! Defines the identities and numeric aliases used across the staking
//! subsystems.
//!
//! ## Clusters
//!
//! - **Identity**: `AccountAddress`, `ConsensusKey`, `NetworkKey`
//! - **Ownership**: `StakePoolId` (derived, one per validator, never reused)
//! - **Numerics**: `Amount`, `Shares`, `TimestampMicros`, `EpochNumber`,
//!   `BasisPoints`

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use sha3::{Digest, Keccak256};

/// A stake amount in base units.
pub type Amount = u128;

/// A share balance in a stake pool bucket.
pub type Shares = u128;

/// Unix timestamp in microseconds.
pub type TimestampMicros = u64;

/// Monotonically increasing epoch counter.
pub type EpochNumber = u64;

/// A rate expressed in basis points (1/100th of a percent).
pub type BasisPoints = u64;

/// Full scale for basis-point rates: 10_000 bps == 100%.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// A 32-byte account address identifying operators, delegators, and
/// beneficiaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct AccountAddress(pub [u8; 32]);

impl AccountAddress {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for AccountAddress {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl std::fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0[..8]))
    }
}

/// BLS public key identity for the consensus role (96-byte G2 keys are the
/// verifier's concern; this engine stores the 48-byte G1 identity only).
#[serde_as]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConsensusKey(#[serde_as(as = "Bytes")] pub [u8; 48]);

impl ConsensusKey {
    pub fn new(bytes: [u8; 48]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 48] {
        &self.0
    }
}

impl std::fmt::Display for ConsensusKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0[..8]))
    }
}

/// Vote/network key identity (opaque 32 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct NetworkKey(pub [u8; 32]);

impl NetworkKey {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Identifier of the stake pool owned by a validator.
///
/// Derived deterministically from the operator address at registration.
/// Exactly one pool exists per validator; the pool is never destroyed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StakePoolId(pub [u8; 32]);

/// Domain-separation suffix for pool id derivation.
const POOL_ID_SALT: &[u8] = b"stake_pool";

impl StakePoolId {
    /// Derive the pool id for an operator: `keccak256(operator || salt)`.
    pub fn derive(operator: &AccountAddress) -> Self {
        let mut hasher = Keccak256::new();
        hasher.update(operator.as_bytes());
        hasher.update(POOL_ID_SALT);
        Self(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Display for StakePoolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0[..8]))
    }
}
