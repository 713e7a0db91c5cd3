//! Shared setup for the integration tests
#![allow(dead_code)]

use slime_sim_core::{Simulation, SimulationSettings, Viewport};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Settings with a fixed seed and a small worker pool
pub fn seeded_settings(seed: u64) -> SimulationSettings {
    let mut settings = SimulationSettings::default();
    settings.spawn.seed = Some(seed);
    settings.worker_threads = Some(2);
    settings
}

/// Initialized and running simulation
pub fn running_simulation(settings: SimulationSettings, viewport: Viewport, count: usize) -> Simulation {
    let mut sim = Simulation::new(settings);
    sim.init(viewport, count).unwrap();
    assert!(sim.start());
    sim
}
