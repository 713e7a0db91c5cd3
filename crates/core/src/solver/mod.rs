//! Simulation step module
//!
//! This module provides the per-step sense, steer, move, deposit, decay and
//! diffuse pipeline behind the `StepBackend` trait.
//!
//! # Backend Selection
//!
//! The system selects the best available backend:
//! 1. Probe for a worker pool and use the rayon CPU backend
//! 2. Fall back to the skip backend, which leaves the simulation idle
//!
//! # Example
//!
//! ```rust,ignore
//! use slime_sim_core::solver::create_step_backend;
//!
//! let backend = create_step_backend(None);
//! assert!(backend.is_parallel());
//! ```

mod context;
mod cpu;
pub mod profiler;
mod skip;
pub mod steering;
mod r#trait;

// Re-exports
pub use context::{probe_compute, ComputeInitResult};
pub use cpu::CpuStepBackend;
pub use profiler::{FrameClock, PhaseTimer};
pub use r#trait::{CancelToken, SkipReason, StepBackend, StepOutcome};
pub use skip::SkipBackend;
pub use steering::{
    advance, choose_steer, perceived_intensity, sensor_points, steer, update_particle,
    SensorReadings, Steer,
};

use tracing::{info, warn};

/// Create a step backend with automatic selection
///
/// Builds a worker pool with `threads` workers (`None` for one per core) and
/// returns the CPU backend on it. If the pool cannot be built the skip backend
/// is returned and every step reports `SkipReason::BackendUnavailable`.
pub fn create_step_backend(threads: Option<usize>) -> Box<dyn StepBackend> {
    match probe_compute(threads) {
        ComputeInitResult::Ready(pool) => {
            let backend = CpuStepBackend::new(pool);
            info!("Using CPU step backend ({} threads)", backend.threads());
            Box::new(backend)
        }
        ComputeInitResult::Unsupported { reason } => {
            warn!(
                "Compute unavailable: {}. Simulation will idle.",
                reason
            );
            Box::new(SkipBackend)
        }
    }
}
