//! # sc-01-epoch-driver
//!
//! Epoch Driver owning the global epoch counter and trigger timing.
//!
//! ## Overview
//!
//! This subsystem provides:
//! - **Epoch Counter**: strictly monotonic, +1 per successful trigger
//! - **Interval Gate**: a trigger before `last_transition + interval` is
//!   rejected without mutating anything
//! - **Reconfiguration Fan-out**: every registered subscriber is notified
//!   exactly once per epoch, in registration order
//! - **Failure Isolation**: a subscriber error is captured and logged; it
//!   never rolls back the epoch increment nor skips later subscribers
//!
//! ## Architecture
//!
//! ```text
//! heartbeat ──trigger()──→ Epoch Driver (1)
//!                               │
//!                               ├── on_new_epoch ──→ Validator Lifecycle (4)
//!                               ├── on_new_epoch ──→ Reward Distributor (5)
//!                               └── on_new_epoch ──→ Performance Tracker (3)
//! ```
//!
//! The fan-out order above is fixed by the runtime container at wiring time;
//! the driver itself guarantees only "registration order, exactly once".

pub mod domain;
pub mod error;
pub mod events;
pub mod ports;
pub mod service;

pub use domain::epoch::EpochState;
pub use error::{EpochError, EpochResult, SubscriberError};
pub use events::{EpochOutcome, NewEpochEvent, SubscriberOutcome};
pub use ports::inbound::EpochApi;
pub use ports::outbound::{CallerAuthorizer, ReconfigurationSubscriber, TimeSource};
pub use service::{EpochDriver, EpochDriverConfig};
