//! Ports for the Reward Distributor subsystem

pub mod outbound;
