//! Ports for the Validator Lifecycle subsystem

pub mod outbound;
