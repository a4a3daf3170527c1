//! Domain logic for the Stake Pool subsystem

pub mod bucket;
pub mod guard;
pub mod ledger;
pub mod shares;

pub use bucket::{Bucket, BucketKind};
pub use guard::PoolGuard;
pub use ledger::ShareLedger;
