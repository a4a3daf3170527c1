//! Hostile operation sequences against the ledger invariants

pub mod conservation;
