//! `cache` commands: list and invalidate cached build records

use std::path::Path;

use crate::cli::CacheCommands;
use crate::commands::dispatch::CommandContext;
use openqa_review_core::cache::{BuildCache, DirCache};
use openqa_review_core::error::{ReviewError, Result};
use openqa_review_core::format::{escape_quotes, records_header};
use openqa_review_core::log_cache_metrics;
use openqa_review_core::model::{Build, BuildId};

pub fn execute(ctx: &CommandContext, command: &CacheCommands) -> Result<()> {
    match command {
        CacheCommands::List { dir } => list(ctx, dir),
        CacheCommands::Invalidate { dir, build } => invalidate(ctx, dir, build),
    }
}

fn open_existing(dir: &Path) -> Result<DirCache> {
    if !dir.is_dir() {
        return Err(ReviewError::UsageError(format!(
            "cache directory not found: {}",
            dir.display()
        )));
    }
    DirCache::open(dir)
}

fn list(ctx: &CommandContext, dir: &Path) -> Result<()> {
    let cache = open_existing(dir)?;
    let entries: Vec<(String, Result<Build>)> = cache
        .entries()
        .into_iter()
        .map(|(path, record)| {
            let source = path.display().to_string();
            let build = record.and_then(|raw| Build::load(&source, &raw));
            (source, build)
        })
        .collect();

    crate::output_by_format!(ctx.cli.format,
        json => {
            let items: Vec<serde_json::Value> = entries
                .iter()
                .map(|(path, build)| match build {
                    Ok(build) => serde_json::json!({
                        "path": path,
                        "job_group": build.key().job_group,
                        "build": build.id(),
                        "variant": build.variant(),
                        "modules": build.modules().len(),
                    }),
                    Err(e) => serde_json::json!({
                        "path": path,
                        "error": e.to_string(),
                    }),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&items)?);
        },
        human => {
            if entries.is_empty() && !ctx.cli.quiet {
                println!("No cached builds");
            }
            for (path, build) in &entries {
                match build {
                    Ok(build) => println!("{}  {}", build.key(), path),
                    Err(e) => println!("invalid  {}: {}", path, e),
                }
            }
        },
        records => {
            println!(
                "{}",
                records_header(
                    "cache",
                    &[
                        ("dir", dir.display().to_string()),
                        ("entries", entries.len().to_string()),
                    ],
                )
            );
            for (path, build) in &entries {
                match build {
                    Ok(build) => println!(
                        "B {} {} \"{}\" modules={}",
                        build.id(),
                        build.variant(),
                        escape_quotes(&build.key().job_group),
                        build.modules().len()
                    ),
                    Err(e) => println!("E {} \"{}\"", path, escape_quotes(&e.to_string())),
                }
            }
        }
    );
    Ok(())
}

fn invalidate(ctx: &CommandContext, dir: &Path, build: &BuildId) -> Result<()> {
    let mut cache = open_existing(dir)?;
    let removed = cache.invalidate(build)?;
    log_cache_metrics!(cache.metrics(), "cache_invalidate");

    crate::output_by_format!(ctx.cli.format,
        json => {
            let output = serde_json::json!({
                "build": build,
                "removed": removed,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        },
        human => {
            if !ctx.cli.quiet {
                println!("Invalidated {} cached record(s) of build {}", removed, build);
            }
        },
        records => {
            println!(
                "{}",
                records_header(
                    "cache-invalidate",
                    &[("build", build.to_string()), ("removed", removed.to_string())],
                )
            );
        }
    );
    Ok(())
}
