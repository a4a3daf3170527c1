//! # Cross-Subsystem Collaborator Traits
//!
//! The narrow interfaces this engine consumes from its environment. They
//! are defined once here so every subsystem takes the same handle types;
//! collaborators are injected at construction, never looked up by a fixed
//! address.

use crate::entities::{AccountAddress, TimestampMicros};

/// Source of the current time.
pub trait TimeSource: Send + Sync {
    fn now_micros(&self) -> TimestampMicros;
}

/// Access-control oracle for privileged calls (epoch triggering,
/// governance parameter changes).
pub trait CallerAuthorizer: Send + Sync {
    fn is_authorized(&self, caller: &AccountAddress) -> bool;
}
