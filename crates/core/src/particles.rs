//! Particle state and the particle store
//!
//! Particles are plain `Copy` records. The store keeps two arrays of equal
//! length: the committed generation that everything else reads, and a scratch
//! generation the step writes into before the two are swapped.

use crate::config::SpawnConfig;
use crate::core_types::{Species, Vec2, Viewport};
use crate::error::{try_allocate_with, SimulationError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;
use tracing::debug;

/// A single slime-mold agent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position in pixels, always inside the viewport
    pub position: Vec2,
    /// Displacement per step before the speed multiplier is applied
    ///
    /// Its direction is the heading and its length the intrinsic speed.
    pub velocity: Vec2,
    /// Species tag, fixed for the particle's lifetime
    pub species: Species,
}

impl Particle {
    /// Create a particle from a heading (radians) and an intrinsic speed
    #[must_use]
    pub fn new(position: Vec2, heading: f32, speed: f32, species: Species) -> Self {
        Self {
            position,
            velocity: Vec2::new(heading.cos(), heading.sin()) * speed,
            species,
        }
    }

    /// Heading in radians
    #[inline]
    #[must_use]
    pub fn heading(&self) -> f32 {
        self.velocity.y.atan2(self.velocity.x)
    }

    /// Intrinsic speed in pixels per step
    #[inline]
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.velocity.norm()
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            velocity: Vec2::zeros(),
            species: Species::A,
        }
    }
}

/// Spawn range along one axis: inset by `margin` when there is room for it
fn spawn_range(extent: f32, margin: f32) -> (f32, f32) {
    let margin = if margin.is_finite() { margin.max(0.0) } else { 0.0 };
    if extent - 2.0 * margin > 0.0 {
        (margin, extent - margin)
    } else {
        (0.0, extent)
    }
}

/// Draw a fresh particle inside the viewport
///
/// Position is uniform over the viewport inset by `spawn.margin` (or the whole
/// viewport when the margin leaves no room), heading is uniform over a full
/// turn, speed is uniform over the spawn speed bounds and the species is
/// uniform over all three tags. A degenerate viewport yields a particle at the
/// origin.
pub fn initialize_particle<R: Rng + ?Sized>(
    rng: &mut R,
    viewport: Viewport,
    spawn: &SpawnConfig,
) -> Particle {
    let position = if viewport.is_degenerate() {
        Vec2::zeros()
    } else {
        let (x0, x1) = spawn_range(viewport.width_f32(), spawn.margin);
        let (y0, y1) = spawn_range(viewport.height_f32(), spawn.margin);
        // Keep the half-open invariant even after float rounding
        viewport.clamp(Vec2::new(rng.random_range(x0..x1), rng.random_range(y0..y1)))
    };

    let heading = rng.random_range(0.0..TAU);
    let (min_speed, max_speed) = spawn.speed_bounds();
    let speed = rng.random_range(min_speed..=max_speed);
    let species = Species::ALL[rng.random_range(0..Species::ALL.len())];

    Particle::new(position, heading, speed, species)
}

/// Double-buffered particle storage
#[derive(Debug)]
pub struct ParticleStore {
    particles: Vec<Particle>,
    scratch: Vec<Particle>,
    rng: StdRng,
}

impl ParticleStore {
    /// Create an empty store
    ///
    /// A seed makes every later spawn reproducible.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self {
            particles: Vec::new(),
            scratch: Vec::new(),
            rng,
        }
    }

    /// Create a store holding exactly the given particles
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::AllocationFailed`] if the scratch generation
    /// cannot be allocated.
    pub fn from_particles(
        particles: Vec<Particle>,
        seed: Option<u64>,
    ) -> Result<Self, SimulationError> {
        let scratch =
            try_allocate_with(particles.len(), "particle scratch buffer", Particle::default)?;
        Ok(Self {
            particles,
            scratch,
            ..Self::new(seed)
        })
    }

    /// Number of particles
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// `true` if the store holds no particles
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Committed particle generation
    #[must_use]
    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    /// Reallocate the store to `count` freshly spawned particles
    ///
    /// Returns `Ok(false)` without touching anything when the count is
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::AllocationFailed`] if either generation
    /// cannot be allocated. The previous particles are kept in that case.
    pub fn resize(
        &mut self,
        count: usize,
        viewport: Viewport,
        spawn: &SpawnConfig,
    ) -> Result<bool, SimulationError> {
        if count == self.particles.len() {
            return Ok(false);
        }

        let scratch = try_allocate_with(count, "particle scratch buffer", Particle::default)?;
        let particles = try_allocate_with(count, "particle buffer", || {
            initialize_particle(&mut self.rng, viewport, spawn)
        })?;

        debug!(
            "Particle store resized {} -> {} ({}x{} viewport)",
            self.particles.len(),
            count,
            viewport.width,
            viewport.height
        );
        self.particles = particles;
        self.scratch = scratch;
        Ok(true)
    }

    /// Respawn every particle in place
    pub fn respawn(&mut self, viewport: Viewport, spawn: &SpawnConfig) {
        for particle in &mut self.particles {
            *particle = initialize_particle(&mut self.rng, viewport, spawn);
        }
    }

    /// Clamp every position into the viewport
    ///
    /// Headings, speeds and species are untouched.
    pub fn clamp_into(&mut self, viewport: Viewport) {
        for particle in &mut self.particles {
            particle.position = viewport.clamp(particle.position);
        }
    }

    /// Wrap every position onto the viewport torus
    pub fn wrap_into(&mut self, viewport: Viewport) {
        for particle in &mut self.particles {
            particle.position = viewport.wrap(particle.position);
        }
    }

    /// Committed generation to read from and scratch generation to write into
    pub(crate) fn split_for_step(&mut self) -> (&[Particle], &mut [Particle]) {
        (&self.particles, &mut self.scratch)
    }

    /// Publish the scratch generation as the committed one
    pub(crate) fn commit(&mut self) {
        std::mem::swap(&mut self.particles, &mut self.scratch);
    }
}
