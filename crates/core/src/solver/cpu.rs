//! CPU step backend
//!
//! This module provides the `StepBackend` implementation that runs both step
//! phases on a dedicated rayon pool. The particle phase maps
//! `update_particle` over every particle and stamps deposits; the field pass
//! decays, diffuses and merges those deposits row by row.

use super::profiler::PhaseTimer;
use super::steering::update_particle;
use super::{CancelToken, StepBackend, StepOutcome};
use crate::config::{ParticleConfig, TrailConfig};
use crate::particles::ParticleStore;
use crate::trail::{decay_and_diffuse, DiffusionParams, TrailBuffers};
use rayon::prelude::*;

/// Step backend running on a rayon thread pool
pub struct CpuStepBackend {
    pool: rayon::ThreadPool,
}

impl CpuStepBackend {
    /// Create a backend running on `pool`
    #[must_use]
    pub fn new(pool: rayon::ThreadPool) -> Self {
        Self { pool }
    }

    /// Number of worker threads
    #[must_use]
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl StepBackend for CpuStepBackend {
    fn step(
        &self,
        config: &ParticleConfig,
        trail: &TrailConfig,
        particles: &mut ParticleStore,
        trails: &mut TrailBuffers,
        cancel: &CancelToken,
    ) -> StepOutcome {
        if cancel.is_cancelled() {
            return StepOutcome::Cancelled;
        }

        let viewport = trails.viewport();
        let field_params = DiffusionParams {
            decay: config.retention(),
            radius: trail.diffusion_radius,
            max_intensity: trail.max_intensity,
        };

        let (read, write, deposits) = trails.split();
        let (prev, next) = particles.split_for_step();

        let completed = self.pool.install(|| {
            {
                let _timer = PhaseTimer::new("particles");
                next.par_iter_mut()
                    .zip(prev.par_iter())
                    .for_each(|(out, particle)| {
                        *out = update_particle(particle, read, config, trail, viewport);
                        deposits.stamp(
                            out.position,
                            config.trail_radius,
                            out.species,
                            trail.deposit_amount,
                        );
                    });
            }

            if cancel.is_cancelled() {
                deposits.reset();
                return false;
            }

            {
                let _timer = PhaseTimer::new("field");
                decay_and_diffuse(read, write, Some(deposits), field_params);
            }

            !cancel.is_cancelled()
        });

        if !completed {
            return StepOutcome::Cancelled;
        }

        trails.swap();
        particles.commit();
        StepOutcome::Committed {
            particles: particles.len(),
        }
    }

    fn name(&self) -> &'static str {
        "cpu"
    }

    fn is_parallel(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{Species, Vec2, Viewport};
    use crate::particles::Particle;
    use crate::solver::{probe_compute, ComputeInitResult};

    fn backend() -> CpuStepBackend {
        match probe_compute(Some(2)) {
            ComputeInitResult::Ready(pool) => CpuStepBackend::new(pool),
            ComputeInitResult::Unsupported { reason } => panic!("pool unavailable: {reason}"),
        }
    }

    #[test]
    fn test_step_deposits_and_swaps() {
        let viewport = Viewport::new(32, 32);
        let mut trails = TrailBuffers::try_new(viewport).unwrap();
        let mut particles = ParticleStore::from_particles(
            vec![Particle::new(Vec2::new(10.5, 10.5), 0.0, 1.0, Species::A)],
            Some(1),
        )
        .unwrap();
        let config = ParticleConfig {
            trail_radius: 0.0,
            ..ParticleConfig::default()
        };
        let trail = TrailConfig {
            diffusion_radius: 0,
            ..TrailConfig::default()
        };

        let outcome = backend().step(&config, &trail, &mut particles, &mut trails, &CancelToken::new());
        assert_eq!(outcome, StepOutcome::Committed { particles: 1 });
        assert_eq!(trails.swap_count(), 1);

        let moved = particles.as_slice()[0];
        assert!((moved.position.x - 12.5).abs() < 1e-4);
        assert_eq!(
            trails.current().get(12, 10, Species::A),
            trail.deposit_amount
        );
    }

    #[test]
    fn test_cancelled_step_leaves_state_untouched() {
        let viewport = Viewport::new(16, 16);
        let mut trails = TrailBuffers::try_new(viewport).unwrap();
        trails.current_mut().set(4, 4, Species::B, 0.8);
        let before = trails.current().clone();
        let mut particles = ParticleStore::from_particles(
            vec![Particle::new(Vec2::new(8.0, 8.0), 1.0, 1.0, Species::B)],
            Some(1),
        )
        .unwrap();
        let committed = particles.as_slice().to_vec();

        let cancel = CancelToken::new();
        cancel.cancel();
        let outcome = backend().step(
            &ParticleConfig::default(),
            &TrailConfig::default(),
            &mut particles,
            &mut trails,
            &cancel,
        );

        assert_eq!(outcome, StepOutcome::Cancelled);
        assert_eq!(trails.swap_count(), 0);
        assert_eq!(trails.current(), &before);
        assert_eq!(particles.as_slice(), committed.as_slice());
    }
}
