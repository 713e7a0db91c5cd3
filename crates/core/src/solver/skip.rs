//! Idle backend used when no compute capability is available

use super::{CancelToken, SkipReason, StepBackend, StepOutcome};
use crate::config::{ParticleConfig, TrailConfig};
use crate::particles::ParticleStore;
use crate::trail::TrailBuffers;

/// Backend that accepts every request and never writes
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipBackend;

impl StepBackend for SkipBackend {
    fn step(
        &self,
        _config: &ParticleConfig,
        _trail: &TrailConfig,
        _particles: &mut ParticleStore,
        _trails: &mut TrailBuffers,
        _cancel: &CancelToken,
    ) -> StepOutcome {
        StepOutcome::Skipped(SkipReason::BackendUnavailable)
    }

    fn name(&self) -> &'static str {
        "skip"
    }

    fn is_parallel(&self) -> bool {
        false
    }

    fn is_available(&self) -> bool {
        false
    }
}
