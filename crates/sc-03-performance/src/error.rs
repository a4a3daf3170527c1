//! Error types for the Performance Tracker subsystem

use shared_types::EpochNumber;
use thiserror::Error;

/// Performance tracker errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PerformanceError {
    /// Requested an epoch outside the retained history window
    #[error("no performance history retained for epoch {epoch}")]
    EpochNotRetained { epoch: EpochNumber },
}

/// Result type for performance tracker operations
pub type PerformanceResult<T> = Result<T, PerformanceError>;
