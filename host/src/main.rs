//! Headless host for the sandbox simulation.
//!
//! Plays the role of the browser animation callback: a simulated display fires at
//! `--refresh-hz`, the frame limiter decides which callbacks become ticks, completed
//! asset loads are fed in as their scheduled time passes, and events are logged.

mod demo;
mod logging;
mod report;
mod scenario;
mod script;
mod stopwatch;

use anyhow::{Context, Result};
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use sandbox_sim::{FrameLimiter, InputSource, Simulation};
use scenario::Scenario;
use script::ScriptedInput;
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};
use stopwatch::LogStopwatch;

/// Run a sandbox scenario without rendering
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scenario JSON file; the built-in demo runs when omitted
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 15.0)]
    seconds: f32,

    /// Seed for every random choice in the simulation
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Simulated display refresh rate driving the frame limiter
    #[arg(long, default_value_t = 144.0)]
    refresh_hz: f32,

    /// Fraction of ticks to profile at debug level
    #[arg(long, default_value_t = 0.0)]
    profile_rate: f32,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let scenario = match &args.scenario {
        Some(path) => Scenario::from_file(path)?,
        None => demo::scenario(),
    };
    anyhow::ensure!(args.refresh_hz > 0.0, "--refresh-hz must be positive");

    let mut sim =
        Simulation::new(scenario.config.clone(), args.seed).context("invalid configuration")?;
    let sender = sim.load_sender();
    let mut loads = scenario.loads;
    loads.sort_by(|a, b| a.at_s.total_cmp(&b.at_s));
    let mut loads = loads.into_iter().peekable();
    let mut input = ScriptedInput::new(scenario.inputs);
    let mut limiter = FrameLimiter::new(&scenario.config.tick);
    let mut profile_rng = StdRng::seed_from_u64(args.seed);

    log::info!(
        "running {:.1} s at {:.0} Hz display, seed {}",
        args.seconds,
        args.refresh_hz,
        args.seed
    );

    // The display clock is simulated so runs are reproducible and faster than real time.
    let origin = Instant::now();
    let frame = Duration::from_secs_f32(1.0 / args.refresh_hz);
    let mut display = Duration::ZERO;
    let mut sim_time = 0.0f32;
    let mut ticks = 0u64;
    let mut next_report = 1.0f32;

    while sim_time < args.seconds {
        display += frame;
        let Some(dt) = limiter.advance(origin + display) else {
            continue;
        };
        sim_time += dt;

        while let Some(load) = loads.next_if(|l| l.at_s <= sim_time) {
            sender
                .send(load.load.into_event())
                .context("simulation stopped accepting loads")?;
        }

        input.set_time(sim_time);
        let state = input.poll();

        let name = format!("tick {ticks}");
        let mut sw = LogStopwatch::new(&mut profile_rng, name, false, args.profile_rate);
        sw.span("simulate");
        sim.tick(dt, &state);
        sw.span("events");
        for event in sim.drain_events() {
            report::log_event(sim_time, &event);
        }
        drop(sw);
        ticks += 1;

        if sim_time >= next_report {
            report::log_telemetry(sim_time, &sim);
            next_report += 1.0;
        }
    }

    log::info!(
        "done: {ticks} ticks over {sim_time:.2} s, {} vehicles, {} orphaned colliders, {} slots pending",
        sim.vehicle_telemetry().len(),
        sim.orphaned_colliders().len(),
        sim.pending_vehicles()
    );
    Ok(())
}
