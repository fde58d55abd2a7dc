//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Serial Acq - Multi-port serial telemetry acquisition pipeline
#[derive(Parser, Debug)]
#[command(
    name = "serial-acq",
    author,
    version,
    about = "Multi-port serial telemetry acquisition pipeline",
    long_about = "Reads NDJSON telemetry records from one or more serial ports,\n\
                  maps named fields onto fixed-width channel vectors, buffers\n\
                  samples up to a configured capacity, and dispatches each\n\
                  drained batch to the configured sink."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "SERIAL_ACQ_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "SERIAL_ACQ_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the acquisition pipeline
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display resolved configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "config.toml", env = "SERIAL_ACQ_CONFIG")]
    pub config: PathBuf,

    /// Write batches as NDJSON rows to this file instead of logging summaries
    #[arg(short, long, env = "SERIAL_ACQ_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Replay a recorded NDJSON capture instead of opening serial ports
    #[arg(long, env = "SERIAL_ACQ_REPLAY")]
    pub replay: Option<PathBuf>,

    /// Restart the replay file when exhausted
    #[arg(long, requires = "replay")]
    pub replay_loop: bool,

    /// Maximum number of batches to dispatch (0 = unlimited)
    #[arg(long, default_value = "0", env = "SERIAL_ACQ_MAX_BATCHES")]
    pub max_batches: u64,

    /// Per-pass bound on acquisition attempts (0 = fill until full)
    #[arg(long, default_value = "0", env = "SERIAL_ACQ_MAX_ATTEMPTS")]
    pub max_attempts: u64,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "SERIAL_ACQ_METRICS_PORT")]
    pub metrics_port: u16,

    /// Validate configuration and exit without running the pipeline
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show the normalized mapping rules
    #[arg(long)]
    pub rules: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
