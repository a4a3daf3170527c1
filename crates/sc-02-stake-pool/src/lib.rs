//! # sc-02-stake-pool
//!
//! Per-validator four-bucket stake ledger with a proportional share token.
//!
//! ## Overview
//!
//! This subsystem provides:
//! - **Four Buckets**: active / inactive / pending_active / pending_inactive
//! - **Share Pricing**: `amount = shares * total_pooled / total_supply`,
//!   flooring toward the protocol; rewards accrue by raising bucket value
//!   without minting
//! - **Conservation Checking**: invariant I1 (bucket totals equal lifetime
//!   deposits plus rewards minus withdrawals, and share supplies equal the
//!   sum of delegator claims) is verified on entry and exit of every
//!   externally callable mutating function
//! - **Single-Writer Guard**: a busy flag held per mutating call rejects
//!   re-entrant mutation; a conservation breach latches the pool halted
//!
//! ## Bucket Flow
//!
//! ```text
//!             delegate (owner ACTIVE)
//! delegate ──────────┐
//!    │               ▼
//!    ▼        [pending_active] ──epoch──→ [active] ──unlock──→ [pending_inactive]
//! [active] ←──reactivate──────────────────────────────────────────────┘│
//!                                                                      │ epoch
//!                                                    (unlock flag set) ▼
//!            withdraw ←──────────────────────────────────────── [inactive]
//! ```
//!
//! `unbond` is the immediate payout path for redelegation: it burns from
//! active/pending_active and pays out synchronously, skipping the queue.
//!
//! ## Rounding Policy
//!
//! External deposits or moves whose share conversion floors to zero are
//! rejected (`DepositTooSmall`). Internal epoch transitions floor mints at
//! one share instead so a boundary can never erase an existing claim.

pub mod domain;
pub mod error;
pub mod events;
pub mod metrics;
pub mod service;
pub mod state;

pub use domain::bucket::{Bucket, BucketKind};
pub use domain::guard::PoolGuard;
pub use domain::ledger::ShareLedger;
pub use domain::shares::{amount_for_shares, mul_div, shares_for_deposit};
pub use error::{PoolResult, StakePoolError};
pub use events::{DelegatorStakeView, EpochApplied, PoolSnapshot, RewardOutcome};
pub use service::StakePool;
pub use state::PoolState;
