//! Time source adapters

use shared_types::{TimeSource, TimestampMicros};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock time source for production wiring.
#[derive(Debug, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_micros(&self) -> TimestampMicros {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as u64)
            .unwrap_or(0)
    }
}

/// Hand-driven clock for tests and deterministic simulations.
#[derive(Debug)]
pub struct ManualTimeSource {
    now: AtomicU64,
}

impl ManualTimeSource {
    pub fn new(start_micros: TimestampMicros) -> Self {
        Self {
            now: AtomicU64::new(start_micros),
        }
    }

    pub fn advance(&self, micros: u64) {
        self.now.fetch_add(micros, Ordering::SeqCst);
    }

    pub fn set(&self, micros: TimestampMicros) {
        self.now.store(micros, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTimeSource {
    fn now_micros(&self) -> TimestampMicros {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_time_source_advances() {
        let clock = ManualTimeSource::new(1_000);
        assert_eq!(clock.now_micros(), 1_000);
        clock.advance(500);
        assert_eq!(clock.now_micros(), 1_500);
        clock.set(42);
        assert_eq!(clock.now_micros(), 42);
    }

    #[test]
    fn test_system_time_source_is_nonzero() {
        assert!(SystemTimeSource.now_micros() > 0);
    }
}
