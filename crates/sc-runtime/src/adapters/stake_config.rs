//! Governance-mutable stake configuration adapter

use crate::config::EngineConfig;
use parking_lot::RwLock;
use sc_04_validator_lifecycle::StakeConfigProvider;
use shared_types::{Amount, BasisPoints};

/// The governance-mutable subset of the engine configuration.
#[derive(Clone, Copy, Debug)]
pub struct StakeParams {
    pub min_stake: Amount,
    pub max_stake: Amount,
    pub voting_power_increase_limit_bps: BasisPoints,
    pub max_commission_rate_bps: BasisPoints,
    pub max_validator_set_size: usize,
}

impl From<&EngineConfig> for StakeParams {
    fn from(config: &EngineConfig) -> Self {
        Self {
            min_stake: config.min_stake,
            max_stake: config.max_stake,
            voting_power_increase_limit_bps: config.voting_power_increase_limit_bps,
            max_commission_rate_bps: config.max_commission_rate_bps,
            max_validator_set_size: config.max_validator_set_size,
        }
    }
}

/// `StakeConfigProvider` backed by swappable parameters.
///
/// Values are re-read on every use, so a governance update takes effect
/// for the next operation and never retroactively.
#[derive(Debug)]
pub struct GovernedStakeConfig {
    params: RwLock<StakeParams>,
}

impl GovernedStakeConfig {
    pub fn new(params: StakeParams) -> Self {
        Self {
            params: RwLock::new(params),
        }
    }

    pub fn current(&self) -> StakeParams {
        *self.params.read()
    }

    /// Governance: replace the whole parameter set atomically.
    pub fn update(&self, params: StakeParams) {
        *self.params.write() = params;
    }
}

impl StakeConfigProvider for GovernedStakeConfig {
    fn min_stake(&self) -> Amount {
        self.params.read().min_stake
    }

    fn max_stake(&self) -> Amount {
        self.params.read().max_stake
    }

    fn voting_power_increase_limit_bps(&self) -> BasisPoints {
        self.params.read().voting_power_increase_limit_bps
    }

    fn max_commission_rate_bps(&self) -> BasisPoints {
        self.params.read().max_commission_rate_bps
    }

    fn max_validator_set_size(&self) -> usize {
        self.params.read().max_validator_set_size
    }
}
