//! # Validator Lifecycle Metrics
//!
//! Prometheus metrics for validator-set health.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! sc-04-validator-lifecycle = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `validator_registrations_total` - Counter of registrations
//! - `validator_joins_total` - Counter of accepted joins
//! - `validator_leaves_total` - Counter of voluntary leaves
//! - `validator_evictions_total` - Counter of stake-shortfall demotions
//! - `validator_active_set_size` - Gauge of the active set size
//! - `validator_total_voting_power` - Gauge of total voting power

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_gauge, register_int_counter, Gauge, IntCounter};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Total validator registrations
    pub static ref REGISTRATIONS_TOTAL: IntCounter = register_int_counter!(
        "validator_registrations_total",
        "Total number of validator registrations"
    )
    .expect("Failed to create REGISTRATIONS_TOTAL metric");

    /// Total accepted joins
    pub static ref JOINS_TOTAL: IntCounter = register_int_counter!(
        "validator_joins_total",
        "Total number of accepted validator joins"
    )
    .expect("Failed to create JOINS_TOTAL metric");

    /// Total voluntary leaves
    pub static ref LEAVES_TOTAL: IntCounter = register_int_counter!(
        "validator_leaves_total",
        "Total number of voluntary validator leaves"
    )
    .expect("Failed to create LEAVES_TOTAL metric");

    /// Total stake-shortfall demotions
    pub static ref EVICTIONS_TOTAL: IntCounter = register_int_counter!(
        "validator_evictions_total",
        "Total number of stake-shortfall demotions"
    )
    .expect("Failed to create EVICTIONS_TOTAL metric");

    /// Active set size
    pub static ref ACTIVE_SET_SIZE: Gauge = register_gauge!(
        "validator_active_set_size",
        "Current number of active validators"
    )
    .expect("Failed to create ACTIVE_SET_SIZE metric");

    /// Total voting power
    pub static ref TOTAL_VOTING_POWER: Gauge = register_gauge!(
        "validator_total_voting_power",
        "Total voting power of the active set"
    )
    .expect("Failed to create TOTAL_VOTING_POWER metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record a registration
#[cfg(feature = "metrics")]
pub fn record_registration() {
    REGISTRATIONS_TOTAL.inc();
}

/// Record an accepted join
#[cfg(feature = "metrics")]
pub fn record_join() {
    JOINS_TOTAL.inc();
}

/// Record a voluntary leave
#[cfg(feature = "metrics")]
pub fn record_leave() {
    LEAVES_TOTAL.inc();
}

/// Record a stake-shortfall demotion
#[cfg(feature = "metrics")]
pub fn record_eviction() {
    EVICTIONS_TOTAL.inc();
}

/// Update the active set size gauge
#[cfg(feature = "metrics")]
pub fn set_active_validators(count: usize) {
    ACTIVE_SET_SIZE.set(count as f64);
}

/// Update the total voting power gauge
#[cfg(feature = "metrics")]
pub fn set_total_voting_power(power: u128) {
    TOTAL_VOTING_POWER.set(power as f64);
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_registration() {}

#[cfg(not(feature = "metrics"))]
pub fn record_join() {}

#[cfg(not(feature = "metrics"))]
pub fn record_leave() {}

#[cfg(not(feature = "metrics"))]
pub fn record_eviction() {}

#[cfg(not(feature = "metrics"))]
pub fn set_active_validators(_count: usize) {}

#[cfg(not(feature = "metrics"))]
pub fn set_total_voting_power(_power: u128) {}
