//! CLI arguments for topsnap.
//!
//! This module defines the command-line interface structure using the clap
//! library. The binary reads top batch output on stdin (`top -b | topsnap`)
//! or from a file, and writes parsed snapshots as JSON on stdout.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "topsnap",
    about = "Parse top(1) batch output into structured JSON",
    long_about = "Parse top(1) batch output into structured JSON.\n\n\
                  Reads the output of `top -b` either as a complete file or as a live \
                  stream on stdin, reassembles it into snapshots and prints one JSON \
                  document per snapshot block.",
    version,
    after_help = "Typical usage: top -b | topsnap --pretty"
)]
pub struct Args {
    /// Parse a complete file instead of streaming stdin
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,

    /// Human-formatted JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Emit only the summary portion of each snapshot
    #[arg(long)]
    pub summary: bool,

    /// Drop process rows whose %CPU is not greater than zero
    #[arg(long)]
    pub filter: bool,

    /// Flush a trailing partial snapshot after this many idle milliseconds
    /// (0 disables the idle flush)
    #[arg(long)]
    pub idle_timeout_ms: Option<u64>,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,
}
