//! Outgoing observability payloads for epoch transitions

use crate::error::SubscriberError;
use shared_types::{EpochNumber, TimestampMicros};

/// Emitted once per successful trigger.
#[derive(Clone, Debug)]
pub struct NewEpochEvent {
    pub epoch: EpochNumber,
    pub transition_time: TimestampMicros,
}

/// Outcome of notifying one reconfiguration subscriber.
///
/// Failures here are operator-visible (logged at `warn`) but invisible to
/// the triggering caller's success/failure: the epoch has already advanced.
#[derive(Clone, Debug)]
pub struct SubscriberOutcome {
    pub subscriber: String,
    pub result: Result<(), SubscriberError>,
}

/// Full result of a successful trigger: the new epoch plus the outcome of
/// every subscriber notification, in notification order.
#[derive(Clone, Debug)]
pub struct EpochOutcome {
    pub epoch: EpochNumber,
    pub transition_time: TimestampMicros,
    pub notifications: Vec<SubscriberOutcome>,
}

impl EpochOutcome {
    /// Count of subscribers that reported a failure.
    pub fn failed_count(&self) -> usize {
        self.notifications
            .iter()
            .filter(|n| n.result.is_err())
            .count()
    }
}
