//! Ports for the Epoch Driver subsystem

pub mod inbound;
pub mod outbound;
