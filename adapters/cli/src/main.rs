#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Lane Defence simulation.

mod simulation;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use lane_defence_core::PathfindingConfig;

use simulation::{Simulation, SimulationOptions};

/// Headless lane defence simulation driving the incremental pathfinding pool.
#[derive(Parser, Debug)]
#[command(name = "lane-defence", version, about, long_about = None)]
struct Args {
    /// Number of tile columns in the level
    #[arg(long, default_value_t = 20)]
    columns: u32,

    /// Number of tile rows in the level
    #[arg(long, default_value_t = 12)]
    rows: u32,

    /// Side length of a tile in world units
    #[arg(long, default_value_t = 32)]
    tile_length: u32,

    /// Number of simulation ticks to run
    #[arg(long, default_value_t = 3_000)]
    ticks: u32,

    /// Simulated milliseconds per tick
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,

    /// Milliseconds an agent waits between two steps
    #[arg(long, default_value_t = 250)]
    step_ms: u64,

    /// Seed overriding the configured pathfinding seed
    #[arg(long)]
    seed: Option<u64>,

    /// Random wall tiles blocked when the level loads
    #[arg(long, default_value_t = 0)]
    walls: u32,

    /// Random obstacle placements attempted during the run
    #[arg(long, default_value_t = 0)]
    obstacles: u32,

    /// Raise the crystal spike barrier whenever it is ready
    #[arg(long)]
    spikes: bool,

    /// Stop spawning after this many waves
    #[arg(long)]
    waves: Option<u32>,

    /// TOML file overriding the pathfinding configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log debug output unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

/// Entry point for the Lane Defence command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(args.config.as_ref(), args.seed)?;
    let options = SimulationOptions {
        columns: args.columns,
        rows: args.rows,
        tile_length: args.tile_length,
        tick: Duration::from_millis(args.tick_ms),
        step_interval: Duration::from_millis(args.step_ms),
        walls: args.walls,
        obstacles: args.obstacles,
        spikes: args.spikes,
        waves: args.waves,
    };

    let mut simulation = Simulation::new(options, config)?;
    let summary = simulation.run(args.ticks);
    print!("{summary}");
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn load_config(path: Option<&PathBuf>, seed: Option<u64>) -> Result<PathfindingConfig> {
    let mut config = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str::<PathfindingConfig>(&contents)
                .with_context(|| format!("failed to parse config file {}", path.display()))?
        }
        None => PathfindingConfig::default(),
    };

    if let Some(seed) = seed {
        config.seed = seed;
    }
    config
        .validate()
        .context("pathfinding configuration is invalid")?;
    Ok(config)
}
