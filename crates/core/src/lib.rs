//! Slime Mold Simulation Core Library
//!
//! A Physarum-style agent simulation. Particles sense a diffusing trail field,
//! steer toward higher concentration, move on a torus and deposit new trail;
//! the field decays and blurs every step, producing branching networks.
//!
//! ## Frame pipeline
//!
//! Each frame the driver calls [`Simulation::step`] and then
//! [`Simulation::render`]:
//! - the particle phase reads the committed particles and the readable trail
//!   field and writes the scratch particles plus a concurrent deposit layer
//! - the field pass decays, diffuses and merges deposits into the write field
//! - both double buffers swap only after every phase completed
//! - the compositor draws the readable field and committed particles into an
//!   RGBA8 [`FrameBuffer`]

// Core types and utilities
pub mod core_types;

pub mod compositor;
pub mod config;
pub mod error;
pub mod particles;
pub mod simulation;
pub mod solver;
pub mod trail;

// Re-export core types
pub use core_types::{Colour, Rgba8, Species, Vec2, Viewport, SPECIES_COUNT};

// Re-export configuration
pub use config::{
    normalize_particle_count, ParticleConfig, RenderColours, RenderFlags, SimulationSettings,
    SpawnConfig, TrailConfig, DEFAULT_PARTICLE_COUNT, PARTICLE_COUNT_MENU,
};

// Re-export simulation types
pub use compositor::{composite, FrameBuffer, Scene};
pub use error::SimulationError;
pub use particles::{initialize_particle, Particle, ParticleStore};
pub use simulation::{FrameReport, Simulation, SimulationState};
pub use solver::{
    create_step_backend, CancelToken, CpuStepBackend, SkipBackend, SkipReason, StepBackend,
    StepOutcome,
};
pub use trail::{TrailBuffers, TrailField};
