mod common;

use common::{running_simulation, seeded_settings};
use slime_sim_core::{
    FrameBuffer, RenderFlags, Simulation, SimulationError, SimulationState, SkipBackend,
    SkipReason, StepOutcome, Viewport, DEFAULT_PARTICLE_COUNT,
};

fn inside_inset(sim: &Simulation, margin: f32) -> bool {
    let viewport = sim.viewport();
    sim.particles().iter().all(|p| {
        p.position.x >= margin
            && p.position.y >= margin
            && p.position.x < viewport.width_f32() - margin
            && p.position.y < viewport.height_f32() - margin
    })
}

#[test]
fn test_reallocation_spawns_inside_inset() {
    let settings = seeded_settings(20);
    let margin = settings.spawn.margin;
    let mut sim = running_simulation(settings, Viewport::new(200, 100), 1000);
    assert_eq!(sim.particle_count(), 1000);
    assert!(inside_inset(&sim, margin));

    sim.step();
    assert!(sim.set_particle_count(4096).unwrap());
    assert_eq!(sim.particle_count(), 4096);
    assert!(inside_inset(&sim, margin));
    assert!(!sim.set_particle_count(4096).unwrap());
}

#[test]
fn test_count_change_mid_run() {
    let viewport = Viewport::new(256, 256);
    let mut sim = running_simulation(seeded_settings(21), viewport, DEFAULT_PARTICLE_COUNT);
    for _ in 0..3 {
        assert!(sim.step().is_committed());
    }

    assert!(sim.set_particle_count(16384).unwrap());
    assert_eq!(sim.state(), SimulationState::Running);
    assert_eq!(sim.step(), StepOutcome::Committed { particles: 16384 });
    assert_eq!(sim.particle_count(), 16384);
    assert!(sim.particles().iter().all(|p| viewport.contains(p.position)));

    let report = sim.report();
    assert_eq!(report.particles, 16384);
    assert_eq!(report.frame, 4);
}

#[test]
fn test_viewport_shrink_clamps_particles() {
    let mut sim = running_simulation(seeded_settings(22), Viewport::new(200, 200), 2048);
    sim.step();
    let species: Vec<_> = sim.particles().iter().map(|p| p.species).collect();

    let smaller = Viewport::new(60, 40);
    sim.resize_viewport(smaller).unwrap();
    assert_eq!(sim.particle_count(), 2048);
    assert!(sim.particles().iter().all(|p| smaller.contains(p.position)));
    assert_eq!(sim.trail().viewport(), smaller);
    assert_eq!(sim.trail().max_intensity(), 0.0);
    let after: Vec<_> = sim.particles().iter().map(|p| p.species).collect();
    assert_eq!(species, after);
    assert!(sim.step().is_committed());
}

#[test]
fn test_degenerate_viewport_idles_then_respawns() {
    let settings = seeded_settings(23);
    let margin = settings.spawn.margin;
    let mut sim = running_simulation(settings, Viewport::new(0, 0), 512);
    assert_eq!(
        sim.step(),
        StepOutcome::Skipped(SkipReason::DegenerateViewport)
    );
    let mut frame = FrameBuffer::try_new(Viewport::new(4, 4)).unwrap();
    assert!(!sim.render(&mut frame).unwrap());

    sim.resize_viewport(Viewport::new(128, 128)).unwrap();
    assert_eq!(sim.particle_count(), 512);
    assert!(inside_inset(&sim, margin));
    assert!(sim.step().is_committed());
}

#[test]
fn test_render_draws_full_frame() {
    let viewport = Viewport::new(80, 60);
    let mut sim = running_simulation(seeded_settings(24), viewport, 2048);
    sim.set_render_flags(RenderFlags {
        draw_trail: true,
        draw_particles: true,
    });
    for _ in 0..10 {
        sim.step();
    }

    let mut frame = FrameBuffer::try_new(Viewport::new(1, 1)).unwrap();
    assert!(sim.render(&mut frame).unwrap());
    assert_eq!(frame.viewport(), viewport);
    assert_eq!(frame.as_bytes().len(), 80 * 60 * 4);
    let background = sim.colours().background;
    assert!(slime_sim_core::compositor::coverage(&frame, background) > 0.0);

    // Paused simulations still draw their last state
    sim.pause();
    let mut again = FrameBuffer::try_new(viewport).unwrap();
    assert!(sim.render(&mut again).unwrap());
    assert_eq!(again, frame);
}

#[test]
fn test_skip_backend_accepts_input_without_writes() {
    let mut sim = Simulation::with_backend(seeded_settings(25), Box::new(SkipBackend));
    sim.init(Viewport::new(32, 32), 256).unwrap();
    assert!(sim.start());
    let particles = sim.particles().to_vec();

    for _ in 0..5 {
        assert_eq!(
            sim.step(),
            StepOutcome::Skipped(SkipReason::BackendUnavailable)
        );
    }
    assert_eq!(sim.particles(), particles.as_slice());
    assert_eq!(sim.trail_buffers().swap_count(), 0);
    assert_eq!(sim.frame(), 0);

    // Reconfiguration is still accepted
    assert!(sim.set_particle_count(128).unwrap());
    assert_eq!(sim.report().particles, 128);
}

#[test]
fn test_allocation_failure_keeps_previous_state() {
    let viewport = Viewport::new(64, 64);
    let mut sim = running_simulation(seeded_settings(26), viewport, 1024);
    sim.step();
    let trail = sim.trail().clone();
    let particles = sim.particles().to_vec();

    let err = sim
        .resize_viewport(Viewport::new(u32::MAX, u32::MAX))
        .unwrap_err();
    assert!(matches!(err, SimulationError::AllocationFailed { .. }));
    assert!(err.to_string().contains("trail field"));

    assert_eq!(sim.state(), SimulationState::Running);
    assert_eq!(sim.viewport(), viewport);
    assert_eq!(sim.trail(), &trail);
    assert_eq!(sim.particles(), particles.as_slice());
    assert!(sim.step().is_committed());
}
