//! Concrete adapters for the engine's outbound ports

pub mod access;
pub mod reward_sink;
pub mod stake_config;
pub mod time;

pub use access::StaticAuthorizer;
pub use reward_sink::AccruingRewardSink;
pub use stake_config::GovernedStakeConfig;
pub use time::{ManualTimeSource, SystemTimeSource};
