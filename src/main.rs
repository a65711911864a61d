//! openqa-review - review helper for openQA
//!
//! Compares the test results of a build against its predecessor and
//! classifies every failure for the review report.

mod cli;
mod commands;

use std::env;
use std::process::ExitCode;
use std::time::Instant;

use clap::error::ErrorKind;
use clap::Parser;

use cli::{Cli, OutputFormat};
use openqa_review_core::error::{ExitCode as ReviewExitCode, ReviewError};
use openqa_review_core::logging;

fn main() -> ExitCode {
    let start = Instant::now();

    let cli = match parse_cli() {
        Ok(cli) => cli,
        Err(code) => return code,
    };

    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("warning: logging disabled: {}", e);
    }
    tracing::debug!(elapsed = ?start.elapsed(), "parse_args");

    match commands::dispatch::run(&cli, start) {
        Ok(()) => exit(ReviewExitCode::Success),
        Err(e) => {
            report_failure(&cli, &e);
            exit(e.exit_code())
        }
    }
}

/// Parse argv; clap's own rendering is kept unless JSON output was asked for
fn parse_cli() -> Result<Cli, ExitCode> {
    let err = match Cli::try_parse() {
        Ok(cli) => return Ok(cli),
        Err(err) => err,
    };

    if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
        || !argv_requests_json()
    {
        err.exit();
    }

    let error = clap_error(&err);
    eprintln!("{}", error.to_json());
    Err(exit(error.exit_code()))
}

fn clap_error(err: &clap::Error) -> ReviewError {
    match err.kind() {
        ErrorKind::ValueValidation
        | ErrorKind::InvalidValue
        | ErrorKind::InvalidSubcommand
        | ErrorKind::UnknownArgument
        | ErrorKind::ArgumentConflict
        | ErrorKind::MissingRequiredArgument => ReviewError::UsageError(err.to_string()),
        _ => ReviewError::Other(err.to_string()),
    }
}

fn report_failure(cli: &Cli, e: &ReviewError) {
    if cli.format == OutputFormat::Json {
        eprintln!("{}", e.to_json());
    } else if !cli.quiet {
        eprintln!("error: {}", e);
    }
}

fn exit(code: ReviewExitCode) -> ExitCode {
    ExitCode::from(code as u8)
}

/// `--format json` or `--format=json` anywhere in argv
fn argv_requests_json() -> bool {
    let args: Vec<String> = env::args().skip(1).collect();
    args.iter().any(|a| a == "--format=json")
        || args.windows(2).any(|w| w[0] == "--format" && w[1] == "json")
}
