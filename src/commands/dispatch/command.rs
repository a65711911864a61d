//! Command trait and context for dispatching commands

use std::time::Instant;

use crate::cli::{Cli, Commands};
use crate::commands::{cache, compare, report};
use openqa_review_core::config::ReviewConfig;
use openqa_review_core::error::Result;

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub config: ReviewConfig,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, config: ReviewConfig, start: Instant) -> Self {
        Self { cli, config, start }
    }
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// No-op command (when no subcommand is provided)
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        println!("openqa-review {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Classifies openQA test failures against previous builds.");
        println!();
        println!("Run `openqa-review --help` for usage information.");
        Ok(())
    }
}

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Commands::Report(args) => report::execute(ctx, args),
            Commands::Compare(args) => compare::execute(ctx, args),
            Commands::Cache { command } => cache::execute(ctx, command),
        }
    }
}
