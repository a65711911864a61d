//! CLI argument parsing for openqa-review
//!
//! Global flags: --format, --quiet, --verbose, --log-level, --log-json, --config

pub mod args;
pub mod format;
pub mod parse;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::{CacheCommands, CompareArgs, ReportArgs};
pub use openqa_review_core::format::OutputFormat;
use parse::parse_format;

/// openqa-review - classify openQA test failures against previous builds
#[derive(Parser, Debug)]
#[command(name = "openqa-review")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (human, json, records)
    #[arg(long, global = true, default_value = "human", value_parser = parse_format)]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Debug logging on stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level or filter directive (overrides --verbose)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Configuration file (default: <config dir>/openqa-review/config.toml)
    #[arg(long, global = true, env = "OPENQA_REVIEW_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Review a build of a job group against its predecessor
    Report(ReportArgs),

    /// Diff and classify two build files
    Compare(CompareArgs),

    /// Inspect or invalidate a build cache directory
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}
