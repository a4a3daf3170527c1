//! Commission parameters and their caps

use serde::{Deserialize, Serialize};
use shared_types::{BasisPoints, BPS_DENOMINATOR};
use thiserror::Error;

/// Why a commission configuration or change was rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommissionViolation {
    #[error("commission rate {rate_bps} exceeds validator max {max_rate_bps}")]
    RateAboveMax {
        rate_bps: BasisPoints,
        max_rate_bps: BasisPoints,
    },

    #[error("validator max rate {max_rate_bps} exceeds system max {system_max_bps}")]
    MaxRateAboveSystemMax {
        max_rate_bps: BasisPoints,
        system_max_bps: BasisPoints,
    },

    #[error("max change rate {max_change_rate_bps} exceeds max rate {max_rate_bps}")]
    ChangeRateAboveMax {
        max_change_rate_bps: BasisPoints,
        max_rate_bps: BasisPoints,
    },

    #[error("rate change from {from_bps} to {to_bps} exceeds max change {max_change_rate_bps}")]
    ChangeTooLarge {
        from_bps: BasisPoints,
        to_bps: BasisPoints,
        max_change_rate_bps: BasisPoints,
    },
}

/// A validator's commission configuration.
///
/// `max_rate_bps` and `max_change_rate_bps` are fixed at registration;
/// only `rate_bps` moves afterwards, bounded by both.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Commission {
    pub rate_bps: BasisPoints,
    pub max_rate_bps: BasisPoints,
    pub max_change_rate_bps: BasisPoints,
}

impl Commission {
    /// Registration-time validation against the governance-wide cap.
    pub fn validate(&self, system_max_bps: BasisPoints) -> Result<(), CommissionViolation> {
        let system_max_bps = system_max_bps.min(BPS_DENOMINATOR);
        if self.max_rate_bps > system_max_bps {
            return Err(CommissionViolation::MaxRateAboveSystemMax {
                max_rate_bps: self.max_rate_bps,
                system_max_bps,
            });
        }
        if self.rate_bps > self.max_rate_bps {
            return Err(CommissionViolation::RateAboveMax {
                rate_bps: self.rate_bps,
                max_rate_bps: self.max_rate_bps,
            });
        }
        if self.max_change_rate_bps > self.max_rate_bps {
            return Err(CommissionViolation::ChangeRateAboveMax {
                max_change_rate_bps: self.max_change_rate_bps,
                max_rate_bps: self.max_rate_bps,
            });
        }
        Ok(())
    }

    /// Apply a rate change, bounded by the per-change delta and the max.
    pub fn apply_change(&mut self, new_rate_bps: BasisPoints) -> Result<(), CommissionViolation> {
        if new_rate_bps > self.max_rate_bps {
            return Err(CommissionViolation::RateAboveMax {
                rate_bps: new_rate_bps,
                max_rate_bps: self.max_rate_bps,
            });
        }
        let delta = self.rate_bps.abs_diff(new_rate_bps);
        if delta > self.max_change_rate_bps {
            return Err(CommissionViolation::ChangeTooLarge {
                from_bps: self.rate_bps,
                to_bps: new_rate_bps,
                max_change_rate_bps: self.max_change_rate_bps,
            });
        }
        self.rate_bps = new_rate_bps;
        Ok(())
    }
}
