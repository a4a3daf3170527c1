//! Driven Ports (SPI - Outbound Dependencies)

use shared_types::Amount;

/// Destination for value the distribution could not place: flooring
/// residue, payouts refused by halted pools, dust commission.
///
/// Implementations must absorb unconditionally; this is the guarantee that
/// integer division never silently destroys value.
pub trait RewardSink: Send + Sync {
    fn credit(&self, amount: Amount);
}
