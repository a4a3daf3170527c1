//! # Stake Pool Metrics
//!
//! Prometheus metrics for pool activity and health.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! sc-02-stake-pool = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `stake_pool_delegated_total` - Counter of value delegated
//! - `stake_pool_unlocked_total` - Counter of value queued for withdrawal
//! - `stake_pool_withdrawn_total` - Counter of value paid out
//! - `stake_pool_rewards_total` - Counter of reward value absorbed
//! - `stake_pool_halts_total` - Counter of conservation halts

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_counter, register_int_counter, Counter, IntCounter};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Total value delegated across all pools
    pub static ref DELEGATED_TOTAL: Counter = register_counter!(
        "stake_pool_delegated_total",
        "Total value delegated into stake pools"
    )
    .expect("Failed to create DELEGATED_TOTAL metric");

    /// Total value unlocked (queued for withdrawal)
    pub static ref UNLOCKED_TOTAL: Counter = register_counter!(
        "stake_pool_unlocked_total",
        "Total value moved to pending-inactive"
    )
    .expect("Failed to create UNLOCKED_TOTAL metric");

    /// Total value withdrawn
    pub static ref WITHDRAWN_TOTAL: Counter = register_counter!(
        "stake_pool_withdrawn_total",
        "Total value paid out of stake pools"
    )
    .expect("Failed to create WITHDRAWN_TOTAL metric");

    /// Total reward value absorbed
    pub static ref REWARDS_TOTAL: Counter = register_counter!(
        "stake_pool_rewards_total",
        "Total reward value absorbed by stake pools"
    )
    .expect("Failed to create REWARDS_TOTAL metric");

    /// Pools halted on conservation breaches
    pub static ref HALTS_TOTAL: IntCounter = register_int_counter!(
        "stake_pool_halts_total",
        "Total number of pool halts on conservation breaches"
    )
    .expect("Failed to create HALTS_TOTAL metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record delegated value
#[cfg(feature = "metrics")]
pub fn record_delegation(amount: u128) {
    DELEGATED_TOTAL.inc_by(amount as f64);
}

/// Record unlocked value
#[cfg(feature = "metrics")]
pub fn record_unlock(amount: u128) {
    UNLOCKED_TOTAL.inc_by(amount as f64);
}

/// Record withdrawn value
#[cfg(feature = "metrics")]
pub fn record_withdrawal(amount: u128) {
    WITHDRAWN_TOTAL.inc_by(amount as f64);
}

/// Record absorbed reward value
#[cfg(feature = "metrics")]
pub fn record_reward(amount: u128) {
    REWARDS_TOTAL.inc_by(amount as f64);
}

/// Record a pool halt
#[cfg(feature = "metrics")]
pub fn record_pool_halted() {
    HALTS_TOTAL.inc();
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_delegation(_amount: u128) {}

#[cfg(not(feature = "metrics"))]
pub fn record_unlock(_amount: u128) {}

#[cfg(not(feature = "metrics"))]
pub fn record_withdrawal(_amount: u128) {}

#[cfg(not(feature = "metrics"))]
pub fn record_reward(_amount: u128) {}

#[cfg(not(feature = "metrics"))]
pub fn record_pool_halted() {}
