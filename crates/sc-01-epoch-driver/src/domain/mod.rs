//! Domain logic for the Epoch Driver

pub mod epoch;

pub use epoch::EpochState;
