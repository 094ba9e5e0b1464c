//! Courier Simulation Runner
//!
//! Plays the demo level headless: the player on autopilot, NPCs on their
//! state machines, and prints the run report as JSON.

use clap::Parser;
use courier_core::events::NotificationLogger;
use courier_core::setup::{build_demo, DemoLayout, Driver};
use courier_core::{SimConfig, SimError};
use courier_events::{SessionId, TerminatingState};
use std::fs;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Command line arguments for the runner
#[derive(Parser, Debug)]
#[command(name = "courier_sim")]
#[command(about = "Headless courier delivery simulation")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Maximum number of ticks to simulate
    #[arg(long, default_value_t = 6000)]
    ticks: u64,

    /// Seconds per tick
    #[arg(long, default_value_t = 0.05)]
    dt: f32,

    /// TOML configuration file (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// File holding the persistent session id
    #[arg(long, default_value = "output/session_id")]
    session_file: PathBuf,

    /// Write every notification here as JSONL
    #[arg(long)]
    events_out: Option<PathBuf>,

    /// Write the run report here as JSON
    #[arg(long)]
    report_out: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), SimError> {
    let config = match &args.config {
        Some(path) => SimConfig::from_file(path)?,
        None => SimConfig::default(),
    };
    let session = SessionId::load_or_create(&args.session_file)?;
    info!(seed = args.seed, ticks = args.ticks, dt = args.dt, %session, "starting run");

    let mut sim = build_demo(config, args.seed, session, &DemoLayout::default())?;
    if let Some(path) = &args.events_out {
        sim = sim.with_logger(NotificationLogger::new(path)?);
    }

    let mut driver = Driver::default();
    for _ in 0..args.ticks {
        driver.step(&mut sim, args.dt)?;
        let summary = sim.tick(args.dt)?;
        if summary.outcome.is_some() {
            break;
        }
    }

    let terminating = sim.outcome().unwrap_or(TerminatingState::Quit);
    let report = sim.finish(terminating)?;
    info!(
        notifications = sim.log().len(),
        state = %report.terminating_state,
        grade = %report.final_letter_grade,
        "run complete"
    );

    let json = serde_json::to_string_pretty(&report)?;
    if let Some(path) = &args.report_out {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, &json)?;
    }
    println!("{}", json);
    Ok(())
}
