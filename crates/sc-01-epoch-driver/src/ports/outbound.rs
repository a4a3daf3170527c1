//! Driven Ports (SPI - Outbound Dependencies)
//!
//! The epoch driver consumes exactly three collaborators: a time source, an
//! access-control oracle, and the set of reconfiguration subscribers. The
//! first two are the shared collaborator traits; the subscriber contract is
//! owned by this subsystem.

use crate::error::SubscriberError;
use shared_types::EpochNumber;

pub use shared_types::{CallerAuthorizer, TimeSource};

/// A component notified on every epoch transition.
///
/// Subscribers run with at-least-attempt semantics: each is invoked exactly
/// once per epoch, in registration order, and a failure in one neither
/// unwinds the epoch increment nor prevents later subscribers from running.
pub trait ReconfigurationSubscriber: Send + Sync {
    /// Stable name used in logs and `SubscriberOutcome` records.
    fn name(&self) -> &str;

    /// React to the transition into `epoch`.
    fn on_new_epoch(&self, epoch: EpochNumber) -> Result<(), SubscriberError>;
}
