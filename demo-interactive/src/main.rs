//! Interactive Slime Mold Simulation Demo
//!
//! A terminal control surface for the slime mold simulation. Allows
//! stepping frames, tuning parameters while running, changing the particle
//! count and viewport, and previewing the composited frame as ASCII art.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package demo-interactive
//! ```
//!
//! # Commands
//!
//! - `step [n]` - Advance n frames (default 1)
//! - `run [n]` - Advance n frames, then show the preview (default 100)
//! - `status` - Show the frame report
//! - `config` - Show current parameters
//! - `set <param> <value>` - Change a parameter (clamped into range)
//! - `count <n>` - Change the particle count (respawns every particle)
//! - `menu` - List the particle counts offered by the picker
//! - `resize <w> <h>` - Change the viewport
//! - `start` / `pause` / `resume` - Lifecycle control
//! - `toggle <trail|particles>` - Toggle a render layer
//! - `view [cols]` - ASCII preview of the composited frame
//! - `reset` - Respawn at the current size and count
//! - `help` - Show available commands
//! - `quit` - Exit

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use slime_sim_core::{
    normalize_particle_count, FrameBuffer, ParticleConfig, Simulation, SimulationSettings,
    StepOutcome, Viewport, DEFAULT_PARTICLE_COUNT, PARTICLE_COUNT_MENU,
};
use std::time::Instant;
use tracing::warn;

/// Default viewport dimensions
const DEFAULT_WIDTH: u32 = 320;
const DEFAULT_HEIGHT: u32 = 180;

/// Characters from dark to bright for the ASCII preview
const SHADES: &[u8] = b" .:-=+*#%@";

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();

    println!("╔═══════════════════════════════════════════════════════════╗");
    println!("║        Slime Mold Simulation - Interactive Console        ║");
    println!("╚═══════════════════════════════════════════════════════════╝");
    println!();

    let mut sim = Simulation::new(SimulationSettings::default());
    let viewport = Viewport::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);
    if let Err(e) = sim.init(viewport, DEFAULT_PARTICLE_COUNT) {
        eprintln!("Failed to initialize simulation: {}", e);
        return;
    }
    sim.start();
    let mut frame = match FrameBuffer::try_new(viewport) {
        Ok(frame) => frame,
        Err(e) => {
            eprintln!("Failed to allocate frame: {}", e);
            return;
        }
    };

    println!(
        "Created simulation with {} particles on a {}x{} field ({} backend)",
        sim.particle_count(),
        viewport.width,
        viewport.height,
        sim.backend_name()
    );

    // Setup readline
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Failed to create readline: {}", e);
            return;
        }
    };

    println!("\nType 'help' for available commands.\n");

    loop {
        let readline = rl.readline("slime> ");
        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                let parts: Vec<&str> = line.split_whitespace().collect();

                if parts.is_empty() {
                    continue;
                }

                match parts[0].to_lowercase().as_str() {
                    "step" | "s" => {
                        let count = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(1);
                        step_simulation(&mut sim, &mut frame, count);
                    }
                    "run" | "r" => {
                        let count = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(100);
                        step_simulation(&mut sim, &mut frame, count);
                        show_view(&sim, &mut frame, 80);
                    }
                    "status" | "st" => println!("{}", sim.report()),
                    "config" | "c" => show_config(sim.config()),
                    "set" => {
                        if let (Some(name), Some(value)) =
                            (parts.get(1), parts.get(2).and_then(|s| s.parse::<f32>().ok()))
                        {
                            set_parameter(&mut sim, name, value);
                        } else {
                            println!("Usage: set <param> <value>  (see 'config' for names)");
                        }
                    }
                    "count" | "n" => {
                        if let Some(requested) = parts.get(1).and_then(|s| s.parse::<i64>().ok()) {
                            set_count(&mut sim, requested);
                        } else {
                            println!("Usage: count <n>");
                        }
                    }
                    "menu" | "m" => show_menu(sim.particle_count()),
                    "resize" => {
                        if let (Some(w), Some(h)) = (
                            parts.get(1).and_then(|s| s.parse().ok()),
                            parts.get(2).and_then(|s| s.parse().ok()),
                        ) {
                            match sim.resize_viewport(Viewport::new(w, h)) {
                                Ok(()) => println!("Viewport is now {}x{}", w, h),
                                Err(e) => println!("Resize failed: {}", e),
                            }
                        } else {
                            println!("Usage: resize <width> <height>");
                        }
                    }
                    "start" => report_transition(sim.start(), "Started", "Not initialized"),
                    "pause" | "p" => report_transition(sim.pause(), "Paused", "Not running"),
                    "resume" => report_transition(sim.resume(), "Resumed", "Not paused"),
                    "toggle" | "t" => toggle_layer(&mut sim, parts.get(1).copied()),
                    "view" | "v" => {
                        let cols = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(80);
                        show_view(&sim, &mut frame, cols);
                    }
                    "reset" => {
                        let viewport = sim.viewport();
                        let count = sim.particle_count();
                        match sim.init(viewport, count) {
                            Ok(()) => {
                                sim.start();
                                println!("Simulation reset with {} particles", count);
                            }
                            Err(e) => println!("Reset failed: {}", e),
                        }
                    }
                    "help" | "?" => show_help(),
                    "quit" | "q" | "exit" => {
                        println!("Goodbye!");
                        break;
                    }
                    _ => println!(
                        "Unknown command: {}. Type 'help' for available commands.",
                        parts[0]
                    ),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }
}

fn step_simulation(sim: &mut Simulation, frame: &mut FrameBuffer, count: u32) {
    println!("Stepping {} frame(s)...", count);

    for i in 0..count {
        let start = Instant::now();
        let outcome = sim.step();
        if let Err(e) = sim.render(frame) {
            warn!("render failed: {}", e);
        }
        let fps = sim.record_frame_time(start.elapsed());

        match outcome {
            StepOutcome::Committed { .. } => {
                if i + 1 == count {
                    println!(
                        "  Frame {}: {:.1} fps (avg {:.1})",
                        sim.frame(),
                        fps,
                        sim.smoothed_fps()
                    );
                }
            }
            StepOutcome::Skipped(reason) => {
                println!("  Step skipped: {:?}", reason);
                break;
            }
            StepOutcome::Cancelled => println!("  Step cancelled"),
        }
    }
    println!("Done.");
}

fn show_config(config: &ParticleConfig) {
    println!("\n═══════════════ PARAMETERS ═══════════════");
    println!("  sensor_angle      {:>8.4} rad", config.sensor_angle);
    println!("  sensor_distance   {:>8.2} px", config.sensor_distance);
    println!("  turn_angle        {:>8.4} rad", config.turn_angle);
    println!("  draw_radius       {:>8.2} px", config.draw_radius);
    println!("  trail_radius      {:>8.2} px", config.trail_radius);
    println!("  cutoff            {:>8.4}", config.cutoff);
    println!("  falloff           {:>8.4}", config.falloff);
    println!("  speed_multiplier  {:>8.2}", config.speed_multiplier);
    println!("══════════════════════════════════════════\n");
}

fn set_parameter(sim: &mut Simulation, name: &str, value: f32) {
    let mut config = *sim.config();
    let slot = match name.to_lowercase().as_str() {
        "sensor_angle" | "sa" => &mut config.sensor_angle,
        "sensor_distance" | "sd" => &mut config.sensor_distance,
        "turn_angle" | "ta" => &mut config.turn_angle,
        "draw_radius" | "dr" => &mut config.draw_radius,
        "trail_radius" | "tr" => &mut config.trail_radius,
        "cutoff" => &mut config.cutoff,
        "falloff" => &mut config.falloff,
        "speed_multiplier" | "speed" => &mut config.speed_multiplier,
        _ => {
            println!("Unknown parameter '{}'. Type 'config' to list them.", name);
            return;
        }
    };
    *slot = value;
    sim.set_configuration(config);
    if *sim.config() != config {
        println!("Value clamped into range");
    }
    show_config(sim.config());
}

fn set_count(sim: &mut Simulation, requested: i64) {
    let count = normalize_particle_count(requested);
    match sim.set_particle_count(count) {
        Ok(true) => println!("Respawned {} particles", count),
        Ok(false) => println!("Particle count unchanged ({})", count),
        Err(e) => println!("Could not change particle count: {}", e),
    }
}

fn show_menu(current: usize) {
    println!("Particle counts:");
    for count in PARTICLE_COUNT_MENU {
        let marker = if count == current { " <" } else { "" };
        println!("  {:>8}{}", count, marker);
    }
}

fn report_transition(changed: bool, done: &str, refused: &str) {
    if changed {
        println!("{}", done);
    } else {
        println!("{}", refused);
    }
}

fn toggle_layer(sim: &mut Simulation, layer: Option<&str>) {
    let mut flags = sim.render_flags();
    match layer {
        Some("trail" | "path") => flags.draw_trail = !flags.draw_trail,
        Some("particles") => flags.draw_particles = !flags.draw_particles,
        _ => {
            println!("Usage: toggle <trail|particles>");
            return;
        }
    }
    sim.set_render_flags(flags);
    println!(
        "Draw trail: {}, Draw particles: {}",
        flags.draw_trail, flags.draw_particles
    );
}

fn show_view(sim: &Simulation, frame: &mut FrameBuffer, cols: usize) {
    match sim.render(frame) {
        Ok(true) => {}
        Ok(false) => {
            println!("Nothing to draw");
            return;
        }
        Err(e) => {
            println!("Render failed: {}", e);
            return;
        }
    }

    let viewport = frame.viewport();
    let width = viewport.width as usize;
    let height = viewport.height as usize;
    let cols = cols.clamp(8, width.max(8));
    let cell_w = width.div_ceil(cols).max(1);
    // Terminal cells are roughly twice as tall as wide
    let cell_h = (cell_w * 2).max(1);
    let rows = height.div_ceil(cell_h);

    println!();
    for row in 0..rows {
        let mut line = String::with_capacity(cols);
        for col in 0..cols {
            let mut sum = 0.0_f32;
            let mut samples = 0_u32;
            for y in row * cell_h..((row + 1) * cell_h).min(height) {
                for x in col * cell_w..((col + 1) * cell_w).min(width) {
                    if let Some(pixel) = frame.pixel(x, y) {
                        sum += pixel.luminance() * f32::from(pixel.a) / 255.0;
                        samples += 1;
                    }
                }
            }
            let level = if samples == 0 { 0.0 } else { sum / samples as f32 };
            let index = ((level * (SHADES.len() - 1) as f32).round() as usize).min(SHADES.len() - 1);
            line.push(char::from(SHADES[index]));
        }
        println!("{}", line);
    }
    println!();
}

fn show_help() {
    println!("\n═══════════════ AVAILABLE COMMANDS ═══════════════");
    println!("  step [n], s [n]      - Advance n frames (default 1)");
    println!("  run [n], r [n]       - Advance n frames and show the preview (default 100)");
    println!("  status, st           - Show the frame report");
    println!("  config, c            - Show current parameters");
    println!("  set <param> <value>  - Change a parameter (clamped into range)");
    println!("                         sensor_angle, sensor_distance, turn_angle, draw_radius,");
    println!("                         trail_radius, cutoff, falloff, speed_multiplier");
    println!("  count <n>, n         - Change the particle count (respawns every particle)");
    println!("  menu, m              - List the particle counts offered by the picker");
    println!("  resize <w> <h>       - Change the viewport");
    println!("  start | pause | resume");
    println!("  toggle <layer>, t    - Toggle 'trail' or 'particles' drawing");
    println!("  view [cols], v       - ASCII preview of the composited frame");
    println!("  reset                - Respawn at the current size and count");
    println!("  help, ?              - Show this help");
    println!("  quit, q              - Exit");
    println!("══════════════════════════════════════════════════\n");
}
