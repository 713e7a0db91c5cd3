//! Simulation configuration
//!
//! `ParticleConfig` is the per-frame parameter bundle produced by the control
//! surface. It is copied into every step, never referenced, and clamped to the
//! documented ranges on the way in instead of being validated.
//!
//! The remaining types configure things that change rarely: how particles are
//! spawned, how the trail field behaves, and how the compositor colours a frame.

use crate::core_types::{Colour, SPECIES_COUNT};
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

/// Particle counts offered by the control surface (2^11 … 2^20)
pub const PARTICLE_COUNT_MENU: [usize; 10] = [
    2048, 4096, 8192, 16384, 32768, 65536, 131072, 262144, 524288, 1048576,
];

/// Particle count selected before the user picks one
pub const DEFAULT_PARTICLE_COUNT: usize = 8192;

/// Map a requested particle count onto a store size
///
/// Zero and negative requests both mean "no particles".
#[must_use]
pub fn normalize_particle_count(requested: i64) -> usize {
    usize::try_from(requested).unwrap_or(0)
}

/// Clamp helper that also replaces NaN with a fallback
#[inline]
fn clamp_param(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}

// ============================================================================
// PER-FRAME PARAMETERS
// ============================================================================

/// Per-frame steering, deposit and rendering parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Lateral spread of the sensing cone (radians)
    pub sensor_angle: f32,
    /// Distance from the particle to its sensing points (pixels)
    pub sensor_distance: f32,
    /// Maximum heading change per step (radians)
    pub turn_angle: f32,
    /// Radius of the particle marker drawn by the compositor (pixels)
    pub draw_radius: f32,
    /// Radius of the deposit footprint (pixels)
    pub trail_radius: f32,
    /// Trail intensities below this are sensed as zero
    pub cutoff: f32,
    /// Fraction of trail intensity lost per step
    pub falloff: f32,
    /// Scales every particle's intrinsic speed
    pub speed_multiplier: f32,
}

impl ParticleConfig {
    /// Documented range of `sensor_angle`
    pub const SENSOR_ANGLE_RANGE: (f32, f32) = (0.0, FRAC_PI_2);
    /// Documented range of `sensor_distance`
    pub const SENSOR_DISTANCE_RANGE: (f32, f32) = (0.0, 15.0);
    /// Documented range of `turn_angle`
    pub const TURN_ANGLE_RANGE: (f32, f32) = (0.0, FRAC_PI_4);
    /// Documented range of `draw_radius`
    pub const DRAW_RADIUS_RANGE: (f32, f32) = (0.0, 8.0);
    /// Documented range of `trail_radius`
    pub const TRAIL_RADIUS_RANGE: (f32, f32) = (0.0, 8.0);
    /// Documented range of `cutoff`
    pub const CUTOFF_RANGE: (f32, f32) = (0.0, 1.0);
    /// Documented range of `falloff`, which must stay below 1
    pub const FALLOFF_RANGE: (f32, f32) = (0.0, 0.999);
    /// Documented range of `speed_multiplier`
    pub const SPEED_MULTIPLIER_RANGE: (f32, f32) = (0.0, 6.0);

    /// Copy with every field clamped into its documented range
    ///
    /// NaN fields fall back to the default value.
    #[must_use]
    pub fn clamped(self) -> Self {
        let d = Self::default();
        Self {
            sensor_angle: clamp_param(
                self.sensor_angle,
                Self::SENSOR_ANGLE_RANGE.0,
                Self::SENSOR_ANGLE_RANGE.1,
                d.sensor_angle,
            ),
            sensor_distance: clamp_param(
                self.sensor_distance,
                Self::SENSOR_DISTANCE_RANGE.0,
                Self::SENSOR_DISTANCE_RANGE.1,
                d.sensor_distance,
            ),
            turn_angle: clamp_param(
                self.turn_angle,
                Self::TURN_ANGLE_RANGE.0,
                Self::TURN_ANGLE_RANGE.1,
                d.turn_angle,
            ),
            draw_radius: clamp_param(
                self.draw_radius,
                Self::DRAW_RADIUS_RANGE.0,
                Self::DRAW_RADIUS_RANGE.1,
                d.draw_radius,
            ),
            trail_radius: clamp_param(
                self.trail_radius,
                Self::TRAIL_RADIUS_RANGE.0,
                Self::TRAIL_RADIUS_RANGE.1,
                d.trail_radius,
            ),
            cutoff: clamp_param(
                self.cutoff,
                Self::CUTOFF_RANGE.0,
                Self::CUTOFF_RANGE.1,
                d.cutoff,
            ),
            falloff: clamp_param(
                self.falloff,
                Self::FALLOFF_RANGE.0,
                Self::FALLOFF_RANGE.1,
                d.falloff,
            ),
            speed_multiplier: clamp_param(
                self.speed_multiplier,
                Self::SPEED_MULTIPLIER_RANGE.0,
                Self::SPEED_MULTIPLIER_RANGE.1,
                d.speed_multiplier,
            ),
        }
    }

    /// Multiplier applied to every trail cell per step
    #[inline]
    #[must_use]
    pub fn retention(&self) -> f32 {
        1.0 - self.falloff
    }
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            sensor_angle: PI / 8.0,
            sensor_distance: 10.0,
            turn_angle: PI / 16.0,
            draw_radius: 2.0,
            trail_radius: 2.0,
            cutoff: 0.01,
            falloff: 0.02,
            speed_multiplier: 2.0,
        }
    }
}

// ============================================================================
// SPAWNING
// ============================================================================

/// How fresh particles are placed when the store is (re)allocated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Lower bound of the intrinsic speed (pixels per step)
    pub min_speed: f32,
    /// Upper bound of the intrinsic speed (pixels per step)
    pub max_speed: f32,
    /// Inset from every viewport edge for spawn positions (pixels)
    pub margin: f32,
    /// Seed for reproducible spawns; `None` draws from the OS
    pub seed: Option<u64>,
}

impl SpawnConfig {
    /// Fastest supported intrinsic speed (pixels per step)
    pub const MAX_SPEED: f32 = 64.0;

    /// Speed bounds ordered low to high and clamped to `[0, MAX_SPEED]`
    ///
    /// NaN bounds are treated as 0.
    #[must_use]
    pub fn speed_bounds(&self) -> (f32, f32) {
        let a = clamp_param(self.min_speed, 0.0, Self::MAX_SPEED, 0.0);
        let b = clamp_param(self.max_speed, 0.0, Self::MAX_SPEED, 0.0);
        (a.min(b), a.max(b))
    }
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            min_speed: 0.5,
            max_speed: 1.5,
            margin: 10.0,
            seed: None,
        }
    }
}

// ============================================================================
// TRAIL FIELD
// ============================================================================

/// Trail field behaviour that is fixed for a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    /// Intensity added to each footprint cell per particle per step
    pub deposit_amount: f32,
    /// Radius of the box blur applied each step (cells); 0 disables diffusion
    pub diffusion_radius: u32,
    /// Upper clamp for stored intensities
    pub max_intensity: f32,
    /// Weight of other species' channels when sensing
    ///
    /// Positive values make species follow each other, negative values make
    /// them avoid each other, 0 keeps them independent.
    pub cross_species_weight: f32,
}

impl TrailConfig {
    /// Largest supported blur radius
    pub const MAX_DIFFUSION_RADIUS: u32 = 4;

    /// Copy with every field clamped into its supported range
    #[must_use]
    pub fn clamped(self) -> Self {
        let d = Self::default();
        let max_intensity = clamp_param(self.max_intensity, f32::EPSILON, f32::MAX, d.max_intensity);
        Self {
            deposit_amount: clamp_param(self.deposit_amount, 0.0, max_intensity, d.deposit_amount),
            diffusion_radius: self.diffusion_radius.min(Self::MAX_DIFFUSION_RADIUS),
            max_intensity,
            cross_species_weight: clamp_param(
                self.cross_species_weight,
                -1.0,
                1.0,
                d.cross_species_weight,
            ),
        }
    }
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            deposit_amount: 0.5,
            diffusion_radius: 1,
            max_intensity: 1.0,
            cross_species_weight: 0.0,
        }
    }
}

// ============================================================================
// RENDERING
// ============================================================================

/// Colours used by the compositor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderColours {
    /// Fill colour for every pixel
    pub background: Colour,
    /// Trail colour per species channel
    pub trail: [Colour; SPECIES_COUNT],
    /// Particle marker colour
    pub particle: Colour,
    /// Draw particle markers in their species' trail colour instead
    pub tint_particles: bool,
}

impl Default for RenderColours {
    fn default() -> Self {
        Self {
            background: Colour::TRANSPARENT,
            trail: [
                Colour::new(1.0, 0.85, 0.2, 1.0),
                Colour::new(0.25, 0.9, 0.45, 1.0),
                Colour::new(0.35, 0.55, 1.0, 1.0),
            ],
            particle: Colour::WHITE,
            tint_particles: false,
        }
    }
}

/// Which layers the compositor draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderFlags {
    /// Blend the trail field over the background
    pub draw_trail: bool,
    /// Draw a marker for every particle
    pub draw_particles: bool,
}

impl Default for RenderFlags {
    fn default() -> Self {
        Self {
            draw_trail: true,
            draw_particles: false,
        }
    }
}

// ============================================================================
// SIMULATION SETTINGS
// ============================================================================

/// Settings fixed when a `Simulation` is created
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Particle spawning
    pub spawn: SpawnConfig,
    /// Trail field behaviour
    pub trail: TrailConfig,
    /// Worker threads for the step; `None` uses one per core
    pub worker_threads: Option<usize>,
}
