//! Simulation handle
//!
//! `Simulation` owns every piece of state the frame driver touches: the
//! particle store, the double-buffered trail field, the step backend, colours
//! and timing. The driver owns exactly one instance and calls `step` then
//! `render` once per tick.
//!
//! Reconfiguration (viewport or particle count) allocates the replacement
//! buffers before anything is swapped in, so a failed allocation leaves the
//! previous buffers and the previous state in place.

mod report;
mod state;

pub use report::FrameReport;
pub use state::SimulationState;

use crate::compositor::{composite, FrameBuffer, Scene};
use crate::config::{ParticleConfig, RenderColours, RenderFlags, SimulationSettings};
use crate::core_types::{Species, Viewport};
use crate::error::SimulationError;
use crate::particles::{Particle, ParticleStore};
use crate::solver::{
    create_step_backend, CancelToken, FrameClock, SkipReason, StepBackend, StepOutcome,
};
use crate::trail::{TrailBuffers, TrailField};
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Physarum simulation with its lifecycle
pub struct Simulation {
    state: SimulationState,
    settings: SimulationSettings,
    config: ParticleConfig,
    colours: RenderColours,
    flags: RenderFlags,
    viewport: Viewport,
    particles: ParticleStore,
    trails: TrailBuffers,
    backend: Box<dyn StepBackend>,
    clock: FrameClock,
    frame: u64,
}

impl Simulation {
    /// Create an uninitialized simulation with automatic backend selection
    #[must_use]
    pub fn new(settings: SimulationSettings) -> Self {
        let backend = create_step_backend(settings.worker_threads);
        Self::with_backend(settings, backend)
    }

    /// Create an uninitialized simulation on a specific backend
    #[must_use]
    pub fn with_backend(settings: SimulationSettings, backend: Box<dyn StepBackend>) -> Self {
        let settings = SimulationSettings {
            trail: settings.trail.clamped(),
            ..settings
        };
        Self {
            state: SimulationState::Uninitialized,
            settings,
            config: ParticleConfig::default(),
            colours: RenderColours::default(),
            flags: RenderFlags::default(),
            viewport: Viewport::default(),
            particles: ParticleStore::new(settings.spawn.seed),
            trails: TrailBuffers::empty(),
            backend,
            clock: FrameClock::new(),
            frame: 0,
        }
    }

    /// Allocate buffers for a viewport and spawn `particle_count` particles
    ///
    /// Any previous particles and trail are discarded. A degenerate viewport
    /// is accepted; the simulation idles until a usable size arrives.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::AllocationFailed`] if the trail buffers or
    /// the particle store cannot be allocated. The simulation is unchanged in
    /// that case.
    pub fn init(&mut self, viewport: Viewport, particle_count: usize) -> Result<(), SimulationError> {
        let trails = TrailBuffers::try_new(viewport).inspect_err(|e| warn!("init failed: {}", e))?;
        let mut particles = ParticleStore::new(self.settings.spawn.seed);
        particles
            .resize(particle_count, viewport, &self.settings.spawn)
            .inspect_err(|e| warn!("init failed: {}", e))?;

        self.trails = trails;
        self.particles = particles;
        self.viewport = viewport;
        self.frame = 0;
        self.state = SimulationState::Ready;
        info!(
            "Simulation initialized: {} particles, {}x{} viewport, {} backend",
            particle_count,
            viewport.width,
            viewport.height,
            self.backend.name()
        );
        Ok(())
    }

    /// Begin stepping; returns `false` if the simulation is not initialized
    pub fn start(&mut self) -> bool {
        match self.state {
            SimulationState::Ready | SimulationState::Paused => {
                self.state = SimulationState::Running;
                info!("Simulation started");
                true
            }
            SimulationState::Running => true,
            SimulationState::Uninitialized | SimulationState::Reconfiguring => false,
        }
    }

    /// Suspend stepping; returns `false` unless the simulation was running
    pub fn pause(&mut self) -> bool {
        if self.state == SimulationState::Running {
            self.state = SimulationState::Paused;
            info!("Simulation paused at frame {}", self.frame);
            true
        } else {
            false
        }
    }

    /// Resume stepping; returns `false` unless the simulation was paused
    pub fn resume(&mut self) -> bool {
        if self.state == SimulationState::Paused {
            self.state = SimulationState::Running;
            info!("Simulation resumed at frame {}", self.frame);
            true
        } else {
            false
        }
    }

    /// Replace the per-frame configuration
    ///
    /// Out-of-range values are clamped and NaN falls back to the default.
    pub fn set_configuration(&mut self, config: ParticleConfig) {
        let clamped = config.clamped();
        if clamped != config {
            debug!("Configuration clamped into range: {:?}", clamped);
        }
        self.config = clamped;
    }

    /// Replace the render colours
    pub fn set_colours(&mut self, colours: RenderColours) {
        self.colours = colours;
    }

    /// Replace the render layer toggles
    pub fn set_render_flags(&mut self, flags: RenderFlags) {
        self.flags = flags;
    }

    /// Adapt to a new viewport
    ///
    /// Trail buffers are reallocated and zeroed. Particle positions are clamped
    /// into the new bounds, or respawned when the previous viewport was
    /// degenerate. Before `init` the viewport is only recorded.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::AllocationFailed`] if the new trail buffers
    /// cannot be allocated. The previous buffers, viewport and state are kept.
    pub fn resize_viewport(&mut self, viewport: Viewport) -> Result<(), SimulationError> {
        if viewport == self.viewport {
            return Ok(());
        }
        if !self.state.is_initialized() {
            self.viewport = viewport;
            return Ok(());
        }

        self.reconfigure(|sim| {
            let trails = TrailBuffers::try_new(viewport)?;
            let previous = sim.viewport;
            sim.trails = trails;
            sim.viewport = viewport;
            if previous.is_degenerate() {
                sim.particles.respawn(viewport, &sim.settings.spawn);
            } else {
                sim.particles.clamp_into(viewport);
            }
            debug!(
                "Viewport resized {}x{} -> {}x{}",
                previous.width, previous.height, viewport.width, viewport.height
            );
            Ok(())
        })
    }

    /// Change the particle count, respawning every particle
    ///
    /// Returns `Ok(false)` when the count is unchanged. Before `init` this
    /// spawns into the recorded viewport without changing state.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::AllocationFailed`] if the new store cannot be
    /// allocated. The previous particles and state are kept.
    pub fn set_particle_count(&mut self, count: usize) -> Result<bool, SimulationError> {
        if count == self.particles.len() {
            return Ok(false);
        }
        self.reconfigure(|sim| {
            let viewport = sim.viewport;
            sim.particles.resize(count, viewport, &sim.settings.spawn)
        })
    }

    /// Replace the particle store with explicit particles
    ///
    /// Positions are wrapped into the viewport; headings, speeds and species
    /// are kept.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::AllocationFailed`] if the scratch generation
    /// cannot be allocated. The previous particles are kept.
    pub fn load_particles(&mut self, particles: Vec<Particle>) -> Result<(), SimulationError> {
        let viewport = self.viewport;
        let seed = self.settings.spawn.seed;
        self.reconfigure(|sim| {
            let mut store = ParticleStore::from_particles(particles, seed)?;
            store.wrap_into(viewport);
            sim.particles = store;
            Ok(())
        })
    }

    /// Run `apply` between `Reconfiguring` and the follow-up state
    fn reconfigure<T>(
        &mut self,
        apply: impl FnOnce(&mut Self) -> Result<T, SimulationError>,
    ) -> Result<T, SimulationError> {
        let previous = self.state;
        if !previous.is_initialized() {
            return apply(self);
        }

        self.state = SimulationState::Reconfiguring;
        let result = apply(self);
        self.state = match (&result, previous) {
            (Err(e), _) => {
                warn!("Reconfiguration failed, keeping previous buffers: {}", e);
                previous
            }
            (Ok(_), SimulationState::Running) => SimulationState::Running,
            (Ok(_), _) => SimulationState::Ready,
        };
        result
    }

    /// Advance one step
    pub fn step(&mut self) -> StepOutcome {
        self.step_with_cancel(&CancelToken::new())
    }

    /// Advance one step, abandoning it if `cancel` is raised before the swap
    pub fn step_with_cancel(&mut self, cancel: &CancelToken) -> StepOutcome {
        let skip = match self.state {
            SimulationState::Uninitialized => Some(SkipReason::NotInitialized),
            SimulationState::Running if self.viewport.is_degenerate() => {
                Some(SkipReason::DegenerateViewport)
            }
            SimulationState::Running => None,
            _ => Some(SkipReason::NotRunning),
        };
        if let Some(reason) = skip {
            return StepOutcome::Skipped(reason);
        }

        let outcome = self.backend.step(
            &self.config,
            &self.settings.trail,
            &mut self.particles,
            &mut self.trails,
            cancel,
        );
        match outcome {
            StepOutcome::Committed { .. } => {
                self.frame += 1;
                trace!("Frame {} committed", self.frame);
            }
            StepOutcome::Cancelled => debug!("Step cancelled at frame {}", self.frame),
            StepOutcome::Skipped(_) => {}
        }
        outcome
    }

    /// Composite the current state into `target`
    ///
    /// The target is resized to the viewport first. Returns `Ok(false)`
    /// without writing when there is nothing to draw: before `init`, with a
    /// degenerate viewport, or when no compute backend is available.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::AllocationFailed`] if the target cannot be
    /// resized.
    pub fn render(&self, target: &mut FrameBuffer) -> Result<bool, SimulationError> {
        if !self.state.is_initialized()
            || self.viewport.is_degenerate()
            || !self.backend.is_available()
        {
            return Ok(false);
        }
        target.resize(self.viewport)?;
        composite(
            target,
            &Scene {
                trail: self.trails.current(),
                particles: self.particles.as_slice(),
                colours: &self.colours,
                flags: self.flags,
                draw_radius: self.config.draw_radius,
                max_intensity: self.settings.trail.max_intensity,
            },
        );
        Ok(true)
    }

    /// Record the elapsed time of the last frame; returns the instantaneous FPS
    ///
    /// Timing is reported only and never affects the physics.
    pub fn record_frame_time(&mut self, elapsed: Duration) -> f32 {
        self.clock.record(elapsed)
    }

    /// Last instantaneous frame rate
    pub fn fps(&self) -> f32 {
        self.clock.fps()
    }

    /// Smoothed frame rate
    pub fn smoothed_fps(&self) -> f32 {
        self.clock.smoothed_fps()
    }

    /// Lifecycle state
    pub fn state(&self) -> SimulationState {
        self.state
    }

    /// Current per-frame configuration
    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    /// Settings fixed at creation
    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    /// Render colours
    pub fn colours(&self) -> &RenderColours {
        &self.colours
    }

    /// Render layer toggles
    pub fn render_flags(&self) -> RenderFlags {
        self.flags
    }

    /// Current viewport
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Committed particles
    pub fn particles(&self) -> &[Particle] {
        self.particles.as_slice()
    }

    /// Particle count
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Readable trail field
    pub fn trail(&self) -> &TrailField {
        self.trails.current()
    }

    /// Readable trail field, mutably (seeding patterns)
    pub fn trail_mut(&mut self) -> &mut TrailField {
        self.trails.current_mut()
    }

    /// Both trail buffers and their roles
    pub fn trail_buffers(&self) -> &TrailBuffers {
        &self.trails
    }

    /// Name of the step backend in use
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Committed steps since `init`
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Snapshot for the control surface
    pub fn report(&self) -> FrameReport {
        let trail = self.trails.current();
        FrameReport {
            frame: self.frame,
            state: self.state,
            particles: self.particles.len(),
            viewport: self.viewport,
            fps: self.clock.fps(),
            smoothed_fps: self.clock.smoothed_fps(),
            trail_totals: Species::ALL.map(|s| trail.channel_total(s)),
            backend: self.backend.name(),
        }
    }
}
