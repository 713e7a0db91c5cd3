//! Headless slime mold simulation driver
//!
//! Runs a fixed number of frames, printing periodic status reports, and can
//! write the final composited frame as a binary PPM image.

use clap::Parser;
use slime_sim_core::{
    normalize_particle_count, FrameBuffer, ParticleConfig, RenderFlags, Simulation,
    SimulationSettings, Species, StepOutcome, Viewport, DEFAULT_PARTICLE_COUNT,
    PARTICLE_COUNT_MENU,
};
use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Slime mold simulation demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "slime-sim-demo")]
#[command(about = "Physarum slime mold simulation demo", long_about = None)]
struct Args {
    /// Viewport width in pixels
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 360)]
    height: u32,

    /// Number of particles (negative values mean none)
    #[arg(short, long, default_value_t = DEFAULT_PARTICLE_COUNT as i64, allow_hyphen_values = true)]
    particles: i64,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Worker threads (default: one per core)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Seed for reproducible spawns
    #[arg(short, long)]
    seed: Option<u64>,

    /// Particle configuration preset (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print a report every n frames (0 = only at the end)
    #[arg(short, long, default_value_t = 60)]
    report_interval: u64,

    /// Draw particle markers on top of the trail
    #[arg(long)]
    draw_particles: bool,

    /// Write the final frame to this PPM file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let args = Args::parse();

    println!("=== Slime Mold Simulation Demo ===\n");

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ParticleConfig::default(),
    };

    let mut settings = SimulationSettings::default();
    settings.spawn.seed = args.seed;
    settings.worker_threads = args.threads;

    let viewport = Viewport::new(args.width, args.height);
    let count = normalize_particle_count(args.particles);
    if !PARTICLE_COUNT_MENU.contains(&count) {
        println!(
            "Note: {} particles is not one of the menu sizes ({}..{})",
            count,
            PARTICLE_COUNT_MENU[0],
            PARTICLE_COUNT_MENU[PARTICLE_COUNT_MENU.len() - 1]
        );
    }

    let mut sim = Simulation::new(settings);
    sim.set_configuration(config);
    sim.set_render_flags(RenderFlags {
        draw_particles: args.draw_particles,
        ..RenderFlags::default()
    });
    sim.init(viewport, count)?;
    sim.start();

    println!(
        "Created simulation with {} particles on a {}x{} field ({} backend)",
        sim.particle_count(),
        viewport.width,
        viewport.height,
        sim.backend_name()
    );
    print_config(sim.config());

    let mut frame = FrameBuffer::try_new(viewport)?;
    let mut skipped = 0_u64;
    let mut cancelled = 0_u64;
    let run_start = Instant::now();

    for i in 1..=args.frames {
        let start = Instant::now();
        match sim.step() {
            StepOutcome::Committed { .. } => {}
            StepOutcome::Skipped(reason) => {
                skipped += 1;
                if skipped == 1 {
                    println!("Step skipped: {:?}", reason);
                }
            }
            StepOutcome::Cancelled => cancelled += 1,
        }
        sim.render(&mut frame)?;
        sim.record_frame_time(start.elapsed());

        if args.report_interval > 0 && i % args.report_interval == 0 {
            println!("{}", sim.report());
        }
    }

    let elapsed = run_start.elapsed();
    println!("\n=== Summary ===");
    println!("{}", sim.report());
    println!(
        "Ran {} frames in {:.2}s ({:.1} fps average)",
        args.frames,
        elapsed.as_secs_f64(),
        if elapsed.as_secs_f64() > 0.0 {
            args.frames as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        }
    );
    if skipped > 0 || cancelled > 0 {
        println!("Skipped: {}, Cancelled: {}", skipped, cancelled);
    }
    for species in Species::ALL {
        println!(
            "  Trail {:?}: total {:.1}",
            species,
            sim.trail().channel_total(species)
        );
    }

    if let Some(path) = &args.output {
        write_ppm(path, &frame)?;
        println!("Wrote final frame to {}", path.display());
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<ParticleConfig, Box<dyn Error>> {
    let file = File::open(path)?;
    let config: ParticleConfig = serde_json::from_reader(std::io::BufReader::new(file))?;
    println!("Loaded configuration from {}", path.display());
    Ok(config)
}

fn print_config(config: &ParticleConfig) {
    println!(
        "Sensor: angle {:.3} rad, distance {:.1}px | Turn: {:.3} rad",
        config.sensor_angle, config.sensor_distance, config.turn_angle
    );
    println!(
        "Trail radius: {:.1}px, Draw radius: {:.1}px | Cutoff: {:.3}, Falloff: {:.3} | Speed x{:.1}\n",
        config.trail_radius,
        config.draw_radius,
        config.cutoff,
        config.falloff,
        config.speed_multiplier
    );
}

/// Write RGB pixels as a binary PPM, dropping alpha
fn write_ppm(path: &Path, frame: &FrameBuffer) -> Result<(), Box<dyn Error>> {
    let viewport = frame.viewport();
    let mut out = BufWriter::new(File::create(path)?);
    write!(out, "P6\n{} {}\n255\n", viewport.width, viewport.height)?;
    for pixel in frame.pixels() {
        out.write_all(&[pixel.r, pixel.g, pixel.b])?;
    }
    out.flush()?;
    Ok(())
}
