//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// datapath - config-driven data-path router
#[derive(Parser, Debug)]
#[command(
    name = "datapath",
    author,
    version,
    about = "Config-driven data-path router",
    long_about = "A data-path router binding named paths to pluggable source modules\n\
                  and fanning received data out to configured sink modules.\n\n\
                  Loads a TOML/JSON configuration, registers the built-in modules,\n\
                  resolves path ownership, and runs all module loops."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "DATAPATH_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "DATAPATH_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the router
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "config.toml", env = "DATAPATH_CONFIG")]
    pub config: PathBuf,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "DATAPATH_METRICS_PORT")]
    pub metrics_port: u16,

    /// Seconds between path stats reports (0 = disabled)
    #[arg(long, default_value = "30", env = "DATAPATH_STATS_INTERVAL")]
    pub stats_interval: u64,

    /// Default per-sink delivery deadline in milliseconds (0 = unbounded)
    #[arg(long, default_value = "30000", env = "DATAPATH_SINK_TIMEOUT_MS")]
    pub sink_timeout_ms: u64,
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

    /// Show per-path sink details
    #[arg(long)]
    pub sinks: bool,
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
