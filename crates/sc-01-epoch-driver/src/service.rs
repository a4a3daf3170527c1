//! Epoch Driver service - trigger gating and subscriber fan-out

use crate::domain::epoch::EpochState;
use crate::error::{EpochError, EpochResult};
use crate::events::{EpochOutcome, SubscriberOutcome};
use crate::ports::inbound::EpochApi;
use crate::ports::outbound::{CallerAuthorizer, ReconfigurationSubscriber, TimeSource};
use parking_lot::RwLock;
use shared_types::{AccountAddress, EpochNumber, TimestampMicros};
use std::sync::Arc;
use tracing::{info, warn};

/// Epoch driver configuration
#[derive(Clone, Copy, Debug)]
pub struct EpochDriverConfig {
    /// Minimum duration between epoch transitions.
    pub interval_micros: u64,
}

impl Default for EpochDriverConfig {
    fn default() -> Self {
        Self {
            // Two hours, the conventional reconfiguration cadence.
            interval_micros: 2 * 60 * 60 * 1_000_000,
        }
    }
}

/// Epoch Driver service.
///
/// Owns the epoch counter and the subscriber list. Subscribers are notified
/// outside the state lock so a slow or failing subscriber cannot wedge the
/// clock itself.
pub struct EpochDriver<T, A>
where
    T: TimeSource,
    A: CallerAuthorizer,
{
    state: RwLock<EpochState>,
    subscribers: RwLock<Vec<Arc<dyn ReconfigurationSubscriber>>>,
    time: Arc<T>,
    authorizer: Arc<A>,
}

impl<T, A> EpochDriver<T, A>
where
    T: TimeSource,
    A: CallerAuthorizer,
{
    pub fn new(config: EpochDriverConfig, time: Arc<T>, authorizer: Arc<A>) -> Self {
        let genesis_time = time.now_micros();
        Self {
            state: RwLock::new(EpochState::new(genesis_time, config.interval_micros)),
            subscribers: RwLock::new(Vec::new()),
            time,
            authorizer,
        }
    }

    /// Append a subscriber. Notification order is registration order; the
    /// runtime container registers lifecycle, rewards, then performance.
    pub fn register_subscriber(&self, subscriber: Arc<dyn ReconfigurationSubscriber>) {
        info!(subscriber = subscriber.name(), "reconfiguration subscriber registered");
        self.subscribers.write().push(subscriber);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Notify every subscriber of `epoch`, capturing each outcome.
    fn notify_subscribers(&self, epoch: EpochNumber) -> Vec<SubscriberOutcome> {
        let subscribers: Vec<_> = self.subscribers.read().iter().cloned().collect();
        let mut outcomes = Vec::with_capacity(subscribers.len());

        for subscriber in subscribers {
            let result = subscriber.on_new_epoch(epoch);
            match &result {
                Ok(()) => {
                    info!(subscriber = subscriber.name(), epoch, "epoch notification delivered");
                }
                Err(err) => {
                    // At-least-attempt semantics: record, log, keep going.
                    warn!(
                        subscriber = subscriber.name(),
                        epoch,
                        error = %err,
                        "epoch notification failed; continuing with remaining subscribers"
                    );
                }
            }
            outcomes.push(SubscriberOutcome {
                subscriber: subscriber.name().to_string(),
                result,
            });
        }
        outcomes
    }
}

impl<T, A> EpochApi for EpochDriver<T, A>
where
    T: TimeSource,
    A: CallerAuthorizer,
{
    fn can_trigger(&self) -> bool {
        self.state.read().can_trigger(self.time.now_micros())
    }

    fn trigger(&self, caller: &AccountAddress) -> EpochResult<EpochOutcome> {
        if !self.authorizer.is_authorized(caller) {
            return Err(EpochError::UnauthorizedCaller { caller: *caller });
        }

        let now = self.time.now_micros();
        let epoch = {
            let mut state = self.state.write();
            if !state.can_trigger(now) {
                return Err(EpochError::IntervalNotElapsed {
                    remaining_micros: state.remaining_micros(now),
                });
            }
            state.advance(now)
        };
        info!(epoch, transition_time = now, "epoch advanced");

        // The increment above is final: subscriber failures are collected,
        // never propagated.
        let notifications = self.notify_subscribers(epoch);

        Ok(EpochOutcome {
            epoch,
            transition_time: now,
            notifications,
        })
    }

    fn set_interval(&self, caller: &AccountAddress, interval_micros: u64) -> EpochResult<()> {
        if !self.authorizer.is_authorized(caller) {
            return Err(EpochError::UnauthorizedCaller { caller: *caller });
        }
        if interval_micros == 0 {
            return Err(EpochError::ZeroInterval);
        }
        let mut state = self.state.write();
        info!(
            old_interval = state.interval_micros,
            new_interval = interval_micros,
            "epoch interval updated"
        );
        state.interval_micros = interval_micros;
        Ok(())
    }

    fn current_epoch(&self) -> EpochNumber {
        self.state.read().current_epoch
    }

    fn last_transition_time(&self) -> TimestampMicros {
        self.state.read().last_transition_time
    }

    fn interval_micros(&self) -> u64 {
        self.state.read().interval_micros
    }
}
