//! # sc-04-validator-lifecycle
//!
//! The validator-set state machine: registration, join/leave, forced
//! demotion, and the bulk epoch transition that promotes, demotes,
//! re-indexes and re-weighs the set.
//!
//! ## State Machine
//!
//! ```text
//! unregistered ──register──→ [INACTIVE] ──join──→ [PENDING_ACTIVE]
//!                                 ↑                      │
//!                                 │ leave                │ epoch
//!                                 │                      ▼
//!                            [PENDING_INACTIVE] ←─leave── [ACTIVE]
//!                                 │              (or stake shortfall)
//!                                 └───────epoch──────→ [INACTIVE]
//! ```
//!
//! No state is ever skipped except the forced demotion ACTIVE ->
//! PENDING_INACTIVE on a stake shortfall, which follows the same path as a
//! voluntary `leave`.
//!
//! ## Timing Model
//!
//! Consensus weight reflects intent immediately: `join` accrues joining
//! power and `leave`/forced demotion decrement total voting power at call
//! time. Fund movement never does - every bucket transition waits for the
//! pool's own epoch boundary.
//!
//! ## Ownership
//!
//! Exactly one `StakePool` is created per validator at registration and
//! never destroyed; the lifecycle holds the only owning handles and
//! orchestrates every pool's epoch transition, isolating per-pool failures
//! (a halted pool is logged and skipped, not fatal to the set).

pub mod domain;
pub mod error;
pub mod events;
pub mod metrics;
pub mod ports;
pub mod service;

pub use domain::commission::{Commission, CommissionViolation};
pub use domain::status::ValidatorStatus;
pub use domain::validator::{RegistrationParams, ValidatorRecord};
pub use error::{LifecycleError, LifecycleResult};
pub use events::{ActiveValidatorEntry, EpochTransitionReport};
pub use ports::outbound::StakeConfigProvider;
pub use service::ValidatorLifecycle;
