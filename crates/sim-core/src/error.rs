//! Error types for sim-core operations.

use std::fmt;

/// Result type for sim-core operations.
pub type Result<T> = std::result::Result<T, SimCoreError>;

/// Errors that can occur during market and portfolio operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimCoreError {
    /// The run horizon must be at least one tick.
    ZeroHorizon,
    /// Starting cash must be positive.
    NonPositiveCash,
}

impl fmt::Display for SimCoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimCoreError::ZeroHorizon => write!(f, "simulation horizon must be at least 1 tick"),
            SimCoreError::NonPositiveCash => write!(f, "starting cash must be positive"),
        }
    }
}

impl std::error::Error for SimCoreError {}
