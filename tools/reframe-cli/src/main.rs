//! Reframe CLI: replay and inspect kinematic camera-path traces.
//!
//! Usage:
//!   reframe solve <TRACE>       Replay a trace through the path solver
//!   reframe validate <OPTIONS>  Check a solver options file
//!   reframe info <TRACE>        Show trace information
//!   reframe init <PATH>         Write default solver options
//!   reframe init --config       Write the default application config

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reframe_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "reframe",
    about = "Smooth tracked-subject positions into a bounded camera path",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a trace through the path solver
    Solve {
        /// Path to the JSONL trace
        trace: PathBuf,

        /// Solver options file (JSON); defaults to the configured profile or built-in defaults
        #[arg(long)]
        options: Option<PathBuf>,

        /// Output file for solved samples (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Prediction tick interval in microseconds (0 disables ticking)
        #[arg(long)]
        tick_us: Option<u64>,

        /// Skip records the solver rejects instead of aborting
        #[arg(long)]
        skip_rejected: bool,

        /// Lower output bound, overriding the trace header
        #[arg(long, allow_negative_numbers = true)]
        min_location: Option<i32>,

        /// Upper output bound, overriding the trace header
        #[arg(long, allow_negative_numbers = true)]
        max_location: Option<i32>,

        /// Pixels-per-degree calibration, overriding the trace header
        #[arg(long)]
        pixels_per_degree: Option<f64>,
    },

    /// Check a solver options file against the configuration rules
    Validate {
        /// Path to the options file
        path: PathBuf,
    },

    /// Show trace information
    Info {
        /// Path to the JSONL trace
        trace: PathBuf,
    },

    /// Write default solver options, or the default application config
    Init {
        /// Output path (defaults to the standard config location with --config)
        #[arg(required_unless_present = "config")]
        path: Option<PathBuf>,

        /// Write the application config instead of solver options
        #[arg(long)]
        config: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    logging.json |= cli.json_logs;
    reframe_common::logging::init_logging(&logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    match cli.command {
        Commands::Solve {
            trace,
            options,
            output,
            tick_us,
            skip_rejected,
            min_location,
            max_location,
            pixels_per_degree,
        } => commands::solve::run(commands::solve::SolveArgs {
            trace,
            options: options.or(config.replay.default_options_path.clone()),
            output,
            tick_us: tick_us.unwrap_or(config.replay.tick_interval_us),
            skip_rejected: skip_rejected || config.replay.skip_rejected,
            min_location,
            max_location,
            pixels_per_degree,
        }),
        Commands::Validate { path } => commands::validate::run(path),
        Commands::Info { trace } => commands::info::run(trace),
        Commands::Init {
            path,
            config: write_config,
            force,
        } => commands::init::run(path, write_config, force),
    }
}
