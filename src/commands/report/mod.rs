//! `report` command: review a build of a job group

pub mod human;
pub mod json;
pub mod records;

use std::path::Path;

use crate::cli::ReportArgs;
use crate::commands::dispatch::CommandContext;
use crate::commands::input;
use openqa_review_core::cache::{BuildCache, DirCache};
use openqa_review_core::catalog::BuildCatalog;
use openqa_review_core::error::{ReviewError, Result};
use openqa_review_core::history::last_reviewed_build;
use openqa_review_core::log_cache_metrics;
use openqa_review_core::model::BuildId;
use openqa_review_core::review::{BuildReview, Reviewer};
use tracing::{debug, info, warn};

pub fn execute(ctx: &CommandContext, args: &ReportArgs) -> Result<()> {
    let mut config = ctx.config.clone();
    if let Some(mode) = args.mode {
        config.aggregation.mode = mode;
    }

    let (catalog, failures) = input::load_catalog(&args.input)?;
    debug!(
        elapsed = ?ctx.start.elapsed(),
        builds = catalog.len(),
        failures = failures.len(),
        "load_input"
    );

    if let Some(dir) = &args.save_dir {
        save_builds(&catalog, &args.job_group, dir)?;
    }

    let reviewer = Reviewer::new(config).only_arch(args.arch.clone());
    let review = run_review(&reviewer, &catalog, args)?;

    debug!(elapsed = ?ctx.start.elapsed(), "review");

    crate::output_by_format!(ctx.cli.format,
        json => { json::output(&review, &failures)? },
        human => { print!("{}", human::render(&review, ctx.cli.verbose)); },
        records => { records::output(&review, &failures); }
    );
    Ok(())
}

fn run_review(reviewer: &Reviewer, catalog: &BuildCatalog, args: &ReportArgs) -> Result<BuildReview> {
    let group = args.job_group.as_str();
    if let Some(id) = &args.build {
        return reviewer.review_build(catalog, group, id);
    }

    let latest = catalog
        .latest_build(group)
        .cloned()
        .ok_or_else(|| ReviewError::BuildNotFound(format!("no builds for job group {}", group)))?;

    let Some(path) = &args.against_reviewed else {
        return reviewer.review_build(catalog, group, &latest);
    };

    let comments = input::read_comments(path)?;
    match last_reviewed_build(comments.iter().map(String::as_str)) {
        Some(reference) if reference < latest => {
            info!(build = %latest, reference = %reference, "reviewing against last reviewed build");
            reviewer.review_build_against(catalog, group, &latest, &reference)
        }
        Some(reference) => {
            info!(build = %latest, reference = %reference, "latest build already reviewed");
            reviewer.review_build(catalog, group, &latest)
        }
        None => {
            warn!(path = %path.display(), "no review comment found");
            reviewer.review_build(catalog, group, &latest)
        }
    }
}

/// Store every build of the job group in a cache directory
fn save_builds(catalog: &BuildCatalog, job_group: &str, dir: &Path) -> Result<()> {
    let mut cache = DirCache::open(dir)?;
    let mut saved = 0;
    for build in catalog.builds().iter().filter(|b| b.key().job_group == job_group) {
        match cache.get(build.key()) {
            Ok(Some(_)) => continue,
            Ok(None) => {}
            Err(e) => {
                warn!(build = %build.key(), error = %e, "unreadable cache record, leaving it alone");
                continue;
            }
        }
        if let Err(e) = cache.put(build) {
            warn!(build = %build.key(), error = %e, "not saving build");
            continue;
        }
        saved += 1;
    }
    info!(dir = %dir.display(), saved, "saved build records");
    log_cache_metrics!(cache.metrics(), "save_builds");
    Ok(())
}

/// Build line: the build id, plus the compared build when there is one
pub(crate) fn build_label(review: &BuildReview) -> String {
    let reference = review.reference.clone().or_else(|| {
        let previous: std::collections::BTreeSet<&BuildId> = review
            .variants
            .iter()
            .filter_map(|v| v.previous.as_ref())
            .collect();
        match previous.len() {
            1 => previous.into_iter().next().cloned(),
            _ => None,
        }
    });

    match reference {
        Some(reference) => format!("{} (reference {})", review.build, reference),
        None => review.build.to_string(),
    }
}
