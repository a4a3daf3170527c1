//! # sc-05-reward-distributor
//!
//! Computes and pushes epoch rewards into stake pools, weighted by
//! stake x proposal performance.
//!
//! ## Overview
//!
//! - **Pending Pool**: block fees and other income accumulate in a pending
//!   reward pool, consumed fully at each epoch boundary
//! - **Weighting**: `weight = stake * successful / max(total, 1)`; a
//!   validator with no recorded proposals is default-credited 1-of-1 so
//!   brand-new validators are not starved
//! - **No Silent Destruction**: every flooring residue, every payout a
//!   halted pool refuses, and every undistributable commission is credited
//!   to the configured fallback sink
//! - **Failure Isolation**: one pool rejecting its payout does not abort
//!   the distribution for the others

pub mod error;
pub mod ports;
pub mod service;

pub use error::{DistributorError, DistributorResult};
pub use ports::outbound::RewardSink;
pub use service::{DistributionSummary, RewardDistributor, RewardableValidator, ValidatorPayout};
