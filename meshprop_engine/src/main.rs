//! # meshprop
//!
//! Runs one frame-propagation pass over a scenario file using the
//! simulation engine, logs progress, and optionally writes the run report
//! as JSON.
//!
//! ```text
//! meshprop [--verbose] [--json] [--direction forward|backward] [--steps N]
//!          [--report report.json] [SCENARIO]
//! ```

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

use meshprop_common::config::LogLevel;
use meshprop_common::consts::DEFAULT_CONFIG_PATH;
use meshprop_common::engine::MeshEngine;
use meshprop_common::track::Direction;
use meshprop_engine::config::{RunConfig, load_run_config};
use meshprop_engine::{PropagationRequest, SimulationEngine, TracingSink, TrackSelection, propagate};

/// CLI spelling of [`Direction`].
#[derive(Debug, Clone, Copy, ValueEnum)]
enum DirectionArg {
    Forward,
    Backward,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Forward => Direction::Forward,
            DirectionArg::Backward => Direction::Backward,
        }
    }
}

/// meshprop: propagate tracked meshes across frames
#[derive(Parser, Debug)]
#[command(name = "meshprop")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Propagate tracked deformable meshes frame by frame with a volume-drift stop")]
struct Args {
    /// Path to the run scenario TOML.
    #[arg(default_value = DEFAULT_CONFIG_PATH)]
    scenario: PathBuf,

    /// Override `run.direction` from the scenario.
    #[arg(long, value_enum)]
    direction: Option<DirectionArg>,

    /// Override `run.steps` from the scenario.
    #[arg(long)]
    steps: Option<u32>,

    /// Write the propagation report as JSON to this path.
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    let loaded = load_run_config(&args.scenario);
    let log_level = loaded
        .as_ref()
        .map(|c| c.shared.log_level)
        .unwrap_or_default();
    setup_tracing(&args, log_level);

    info!("meshprop v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = match loaded {
        Ok(config) => run(&args, config),
        Err(e) => Err(e.into()),
    };
    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }
}

fn run(args: &Args, mut config: RunConfig) -> Result<(), Box<dyn std::error::Error>> {
    apply_overrides(&mut config, args);
    info!(
        "Scenario '{}' loaded from {}: {} tracks, {} frames",
        config.shared.service_name,
        args.scenario.display(),
        config.tracks.len(),
        config.run.frame_count
    );

    let mut engine = SimulationEngine::from_configs(
        config.run.frame_count,
        config.run.start_frame,
        &config.tracks,
    )?;

    let mut selection = TrackSelection::new();
    for track in &config.tracks {
        if let Some(id) = engine.find_track(&track.name) {
            selection.add(id);
        }
    }
    info!("{} tracks selected", selection.len());

    let request = PropagationRequest {
        tracks: selection.as_slice(),
        start_frame: config.run.start_frame,
        direction: config.run.direction,
        step_count: config.run.steps,
        criteria: &config.criteria,
    };
    let report = propagate(&mut engine, &mut TracingSink, request)?;

    if report.stopped_by_drift() {
        warn!("Propagation stopped early: {}", report.summary());
    }
    if let Some(diag) = engine.diagnostics() {
        info!(
            "Engine calls: {} seeds, {} deforms, {} remeshes, {} volume queries",
            diag.seeds, diag.deforms, diag.remeshes, diag.volume_queries
        );
    }

    if let Some(path) = &args.report {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &report)?;
        info!("Report written to {}", path.display());
    }

    Ok(())
}

/// Apply CLI overrides on top of the scenario's `[run]` table.
fn apply_overrides(config: &mut RunConfig, args: &Args) {
    if let Some(direction) = args.direction {
        config.run.direction = direction.into();
    }
    if let Some(steps) = args.steps {
        config.run.steps = steps;
    }
}

/// Setup tracing subscriber from CLI arguments and the scenario log level.
///
/// `--verbose` wins over the scenario's `shared.log_level`.
fn setup_tracing(args: &Args, log_level: LogLevel) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::from(log_level)
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
