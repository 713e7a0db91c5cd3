//! Per-frame status report for the control surface

use super::SimulationState;
use crate::core_types::{Viewport, SPECIES_COUNT};
use std::fmt;

/// Snapshot of what a control surface displays
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Committed steps since `init`
    pub frame: u64,
    /// Lifecycle state
    pub state: SimulationState,
    /// Particle count
    pub particles: usize,
    /// Current viewport
    pub viewport: Viewport,
    /// Last instantaneous frame rate
    pub fps: f32,
    /// Smoothed frame rate
    pub smoothed_fps: f32,
    /// Total trail intensity per species channel
    pub trail_totals: [f64; SPECIES_COUNT],
    /// Step backend name
    pub backend: &'static str,
}

impl fmt::Display for FrameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frame {:>6} | {:<13} | {:>7} particles | {}x{} | {:>6.1} fps (avg {:>6.1}) | trail A {:.1} B {:.1} C {:.1} | {}",
            self.frame,
            self.state,
            self.particles,
            self.viewport.width,
            self.viewport.height,
            self.fps,
            self.smoothed_fps,
            self.trail_totals[0],
            self.trail_totals[1],
            self.trail_totals[2],
            self.backend
        )
    }
}
