//! Lifecycle states

use std::fmt;

/// Lifecycle state of a [`Simulation`](super::Simulation)
///
/// `Uninitialized → Ready → Running ⇄ Paused`. Every reconfiguration passes
/// through `Reconfiguring` and lands on `Ready`, or back on `Running` when the
/// simulation was running before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationState {
    /// No buffers allocated yet
    Uninitialized,
    /// Buffers allocated, not stepping
    Ready,
    /// Stepping every frame
    Running,
    /// Stepping suspended; rendering still shows the last state
    Paused,
    /// Buffers being replaced
    Reconfiguring,
}

impl SimulationState {
    /// `true` once `init` succeeded
    #[must_use]
    pub fn is_initialized(self) -> bool {
        self != SimulationState::Uninitialized
    }
}

impl fmt::Display for SimulationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SimulationState::Uninitialized => "uninitialized",
            SimulationState::Ready => "ready",
            SimulationState::Running => "running",
            SimulationState::Paused => "paused",
            SimulationState::Reconfiguring => "reconfiguring",
        };
        f.pad(name)
    }
}
