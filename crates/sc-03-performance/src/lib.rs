//! # sc-03-performance
//!
//! Per-epoch proposal counters indexed by active-validator slot.
//!
//! ## Overview
//!
//! - **Per-Block Recording**: the block prologue reports one successful
//!   proposer and zero-or-more failed proposers per block
//! - **Untrusted Indices**: slot indices outside the active range are
//!   dropped, never trusted
//! - **Epoch Rotation**: at each boundary the full table is archived under
//!   the closing epoch number, counters are zeroed, and the slot list is
//!   re-derived from the freshly computed active set (slot indices are NOT
//!   stable across epochs)
//! - **Audit History**: archived tables are retained for read-only queries,
//!   pruned beyond a configured retention window

pub mod domain;
pub mod error;
pub mod service;

pub use domain::record::PerformanceRecord;
pub use error::{PerformanceError, PerformanceResult};
pub use service::{PerformanceTracker, TrackerConfig};
