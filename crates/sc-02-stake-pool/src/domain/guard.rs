//! Pool mutation guard
//!
//! Two protections around every state-mutating pool call:
//!
//! - a `busy` flag held for the duration of one mutating call, so a
//!   re-entrant call (e.g. a callback inside an external value transfer)
//!   cannot observe a half-updated bucket split;
//! - a `halted` latch set when a conservation check fails, after which all
//!   mutation is refused until an operator intervenes.
//!
//! ```text
//! [RUNNING] ──conservation breach──→ [HALTED]
//!     ↑                                  │
//!     └────── operator resume ───────────┘
//! ```

use crate::error::{PoolResult, StakePoolError};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// Guard state for one pool.
#[derive(Debug, Default)]
pub struct PoolGuard {
    busy: AtomicBool,
    halted: RwLock<Option<String>>,
}

/// RAII token releasing the busy flag on drop.
pub struct BusyToken<'a> {
    guard: &'a PoolGuard,
}

impl Drop for BusyToken<'_> {
    fn drop(&mut self) {
        self.guard.busy.store(false, Ordering::Release);
    }
}

impl PoolGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the single-writer token, rejecting if halted or busy.
    pub fn acquire(&self) -> PoolResult<BusyToken<'_>> {
        if let Some(reason) = self.halted.read().clone() {
            return Err(StakePoolError::PoolHalted { reason });
        }
        if self
            .busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(StakePoolError::PoolBusy);
        }
        Ok(BusyToken { guard: self })
    }

    /// Latch the halted state. Idempotent; the first reason wins.
    pub fn halt(&self, reason: String) {
        let mut halted = self.halted.write();
        if halted.is_none() {
            *halted = Some(reason);
        }
    }

    pub fn is_halted(&self) -> bool {
        self.halted.read().is_some()
    }

    pub fn halt_reason(&self) -> Option<String> {
        self.halted.read().clone()
    }

    /// Operator-only escape hatch after investigating a halt.
    pub fn resume(&self) {
        *self.halted.write() = None;
    }
}
