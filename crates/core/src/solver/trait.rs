//! Step backend trait definition
//!
//! This module defines the `StepBackend` trait, which provides a
//! backend-agnostic interface for advancing the simulation by one step. The
//! rayon-backed CPU backend and the idle skip backend both implement it.

use crate::config::{ParticleConfig, TrailConfig};
use crate::particles::ParticleStore;
use crate::trail::TrailBuffers;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Why a step did not run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// `init` has not been called yet
    NotInitialized,
    /// The simulation is paused or otherwise not running
    NotRunning,
    /// The viewport has a zero dimension
    DegenerateViewport,
    /// No compute backend is available
    BackendUnavailable,
}

/// Result of one step request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Particles and trail were advanced and the buffers swapped
    Committed {
        /// Particles advanced in this step
        particles: usize,
    },
    /// Nothing was read or written
    Skipped(SkipReason),
    /// The step was abandoned before its swap; the readable state is untouched
    Cancelled,
}

impl StepOutcome {
    /// `true` if the step committed
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, StepOutcome::Committed { .. })
    }
}

/// Shared flag the frame driver can raise to abandon an in-flight step
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token that is not cancelled
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// `true` once cancellation was requested
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Clear a previous request so the token can be reused
    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Backend-agnostic interface for one simulation step
///
/// A step reads the committed particles and the readable trail field, writes
/// the scratch particles and the write field, and swaps both only when every
/// phase completed.
pub trait StepBackend: Send + Sync {
    /// Advance particles and trail by one step
    ///
    /// # Arguments
    ///
    /// * `config` - Per-frame parameters, already clamped
    /// * `trail` - Trail field behaviour
    /// * `particles` - Particle store; committed generation is read, scratch written
    /// * `trails` - Trail buffers; readable field is read, the other written
    /// * `cancel` - Checked between phases
    fn step(
        &self,
        config: &ParticleConfig,
        trail: &TrailConfig,
        particles: &mut ParticleStore,
        trails: &mut TrailBuffers,
        cancel: &CancelToken,
    ) -> StepOutcome;

    /// Short backend name for reports
    fn name(&self) -> &'static str;

    /// Check if this backend runs the step in parallel
    fn is_parallel(&self) -> bool;

    /// Check if this backend performs any work
    ///
    /// An unavailable backend leaves the simulation idle: steps are skipped
    /// and nothing is composited.
    fn is_available(&self) -> bool {
        true
    }
}
