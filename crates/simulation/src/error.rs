//! Error types for simulation runs.

use std::fmt;

use sim_core::SimCoreError;

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimulationError>;

/// Errors that abort a run before or during setup.
///
/// Per-agent policy failures are not here: they degrade the agent's tick
/// (hold plus a violation), never the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// No scenario preset with the given id.
    UnknownScenario(String),
    /// A run needs at least one agent.
    NoAgents,
    /// Market setup failed.
    Core(SimCoreError),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::UnknownScenario(id) => write!(f, "unknown scenario: {id}"),
            SimulationError::NoAgents => write!(f, "simulation requires at least one agent"),
            SimulationError::Core(e) => write!(f, "market setup failed: {e}"),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Core(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SimCoreError> for SimulationError {
    fn from(e: SimCoreError) -> Self {
        SimulationError::Core(e)
    }
}
