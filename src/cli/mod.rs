//! CLI command definitions for tgs-conf
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Prefix used when `--prefix` is not given.
pub const DEFAULT_PREFIX: &str = "TGS_API";

/// Output format for `check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One `flag=value` line per field
    #[default]
    Text,
    /// JSON array of `{flag, env, value}` objects
    Json,
}

/// Inspect and validate the API service configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print every flag and environment variable the service reads
    Usage(UsageArgs),

    /// Resolve the configuration and print the result
    Check(CheckArgs),
}

/// Arguments for the usage subcommand
#[derive(Args, Debug)]
pub struct UsageArgs {
    /// Environment variable prefix
    #[arg(short, long, default_value = DEFAULT_PREFIX)]
    pub prefix: String,
}

/// Arguments for the check subcommand
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Environment variable prefix
    #[arg(short, long, default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// Resolve from a flat JSON or YAML secrets file instead of flags and
    /// environment
    #[arg(short, long, value_name = "FILE")]
    pub secrets: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Service flags, passed after `--`
    #[arg(last = true, value_name = "ARGS")]
    pub args: Vec<String>,
}
