use std::path::PathBuf;

use clap::{Args, Subcommand};
use openqa_review_core::config::AggregationMode;
use openqa_review_core::model::BuildId;

use super::parse::{parse_build_id, parse_mode};

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Directory of build records (.json/.yaml), searched recursively
    #[arg(long, short)]
    pub input: PathBuf,

    /// Job group to review
    #[arg(long, short = 'g')]
    pub job_group: String,

    /// Build to review (default: newest build of the job group)
    #[arg(long, short, value_parser = parse_build_id, conflicts_with = "against_reviewed")]
    pub build: Option<BuildId>,

    /// Review the newest build against the last reviewed one, read from a
    /// file of job group comments (newest first, separated by blank lines)
    #[arg(long)]
    pub against_reviewed: Option<PathBuf>,

    /// Only review this architecture
    #[arg(long)]
    pub arch: Option<String>,

    /// Common issue promotion mode (overrides configuration)
    #[arg(long, value_parser = parse_mode)]
    pub mode: Option<AggregationMode>,

    /// Also store every loaded build record in this cache directory
    #[arg(long)]
    pub save_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    /// Build record of the current build
    pub current: PathBuf,

    /// Build record of the previous build (omit for a first build)
    pub previous: Option<PathBuf>,
}

/// Cache subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum CacheCommands {
    /// List cached build records
    List {
        /// Cache directory
        #[arg(long)]
        dir: PathBuf,
    },

    /// Remove every cached variant of a build
    Invalidate {
        /// Cache directory
        #[arg(long)]
        dir: PathBuf,

        /// Build identifier
        #[arg(value_parser = parse_build_id)]
        build: BuildId,
    },
}
