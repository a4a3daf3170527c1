//! Driven Ports (SPI - Outbound Dependencies)

use shared_types::{Amount, BasisPoints};

pub use shared_types::TimeSource;

/// Governance-mutable staking parameters.
///
/// Values are re-read on every use: a governance change takes effect for
/// the next operation, never retroactively.
pub trait StakeConfigProvider: Send + Sync {
    /// Minimum next-epoch stake to join, and the eviction floor.
    fn min_stake(&self) -> Amount;

    /// Maximum next-epoch stake to join.
    fn max_stake(&self) -> Amount;

    /// Cap on this epoch's joining power as a fraction of current total
    /// voting power, in basis points.
    fn voting_power_increase_limit_bps(&self) -> BasisPoints;

    /// System-wide ceiling for validator commission max rates.
    fn max_commission_rate_bps(&self) -> BasisPoints;

    /// Hard cap on the consensus set size (active + pending-active).
    fn max_validator_set_size(&self) -> usize;
}
