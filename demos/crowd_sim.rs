//! Headless crowd simulation.
//!
//! Run: cargo run --bin crowd-sim -- --humans 20 --chairs 8 --ticks 500
//!
//! Set `RUST_LOG=debug` to see per-tick planner activity.

use std::path::PathBuf;

use clap::Parser;
use navgrid_core::Region;
use navgrid_demos::{Crowd, SimConfig};
use navgrid_paths::Resolution;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "crowd-sim")]
#[command(about = "Simulate humans walking to a goal while chairs chase them")]
struct Args {
    /// JSON file with a full or partial simulation config; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of humans
    #[arg(long)]
    humans: Option<usize>,

    /// Number of chairs
    #[arg(long)]
    chairs: Option<usize>,

    /// Terrain size as WIDTHxDEPTH, centred on the origin
    #[arg(long, value_parser = parse_size)]
    size: Option<(f32, f32)>,

    /// Lattice points per axis
    #[arg(long, conflicts_with = "cell_size")]
    points: Option<usize>,

    /// Maximum lattice spacing in world units
    #[arg(long)]
    cell_size: Option<f32>,

    /// Ticks to simulate
    #[arg(long, default_value = "300")]
    ticks: u64,

    /// Log a summary every N ticks
    #[arg(long, default_value = "50")]
    report_every: u64,

    /// Random seed for reproducible runs
    #[arg(long, default_value = "42")]
    seed: u64,
}

fn parse_size(s: &str) -> Result<(f32, f32), String> {
    let (w, d) = s
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxDEPTH, got {s:?}"))?;
    let w: f32 = w.trim().parse().map_err(|e| format!("bad width: {e}"))?;
    let d: f32 = d.trim().parse().map_err(|e| format!("bad depth: {e}"))?;
    Ok((w, d))
}

fn load_config(args: &Args) -> Result<SimConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => SimConfig::default(),
    };
    if let Some(n) = args.humans {
        config.humans = n;
    }
    if let Some(n) = args.chairs {
        config.chairs = n;
    }
    if let Some((w, d)) = args.size {
        config.nav.region = Region::centered(w, d);
    }
    if let Some(n) = args.points {
        config.nav.resolution = Resolution::Points { x: n, z: n };
    }
    if let Some(c) = args.cell_size {
        config.nav.resolution = Resolution::CellSize(c);
    }
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let mut crowd = Crowd::new(config, args.seed)?;

    let mut planned = 0;
    let mut empty = 0;
    let mut last = None;
    for _ in 0..args.ticks {
        let stats = crowd.tick()?;
        planned += stats.planned;
        empty += stats.empty;
        if args.report_every > 0 && stats.tick % args.report_every == 0 {
            log::info!(
                "tick {}: {} occupied, {} pathed, {} goals reached",
                stats.tick,
                stats.occupied,
                stats.pathed,
                stats.goals_reached
            );
        }
        last = Some(stats);
    }

    if let Some(stats) = last {
        log::info!(
            "done after {} ticks: {planned} paths planned ({empty} empty), {} goals reached",
            stats.tick,
            stats.goals_reached
        );
    }
    Ok(())
}
