//! Engine configuration

use serde::{Deserialize, Serialize};
use shared_types::{Amount, BasisPoints};

/// Startup configuration for the whole staking engine.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum duration between epoch transitions.
    pub epoch_interval_micros: u64,
    /// Minimum next-epoch stake to join the set (and the eviction floor).
    pub min_stake: Amount,
    /// Maximum next-epoch stake to join the set.
    pub max_stake: Amount,
    /// Per-epoch joining-power cap as a fraction of total voting power.
    pub voting_power_increase_limit_bps: BasisPoints,
    /// System-wide ceiling for validator commission max rates.
    pub max_commission_rate_bps: BasisPoints,
    /// Hard cap on the consensus set size.
    pub max_validator_set_size: usize,
    /// Archived performance epochs retained for audit queries.
    pub performance_retention_epochs: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // Two hours, the conventional reconfiguration cadence.
            epoch_interval_micros: 2 * 60 * 60 * 1_000_000,
            min_stake: 1_000_000,
            max_stake: 50_000_000_000,
            voting_power_increase_limit_bps: 2_000,
            max_commission_rate_bps: 5_000,
            max_validator_set_size: 128,
            performance_retention_epochs: 32,
        }
    }
}
