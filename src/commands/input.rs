//! Reading build records and review comments from disk

use std::fs;
use std::path::Path;

use openqa_review_core::cache::DirCache;
use openqa_review_core::catalog::{BuildCatalog, IngestFailure};
use openqa_review_core::error::{ReviewError, Result};
use openqa_review_core::model::{Build, RawBuild};

/// Ingest every record below `dir`; malformed records are returned, not fatal
pub fn load_catalog(dir: &Path) -> Result<(BuildCatalog, Vec<IngestFailure>)> {
    if !dir.is_dir() {
        return Err(ReviewError::UsageError(format!(
            "input directory not found: {}",
            dir.display()
        )));
    }

    let entries = DirCache::open(dir)?.entries();
    Ok(BuildCatalog::ingest(
        entries
            .into_iter()
            .map(|(path, record)| (path.display().to_string(), record)),
    ))
}

/// Load a single build record file
pub fn load_build(path: &Path) -> Result<Build> {
    let raw = RawBuild::from_path(path)?;
    Build::load(&path.display().to_string(), &raw)
}

/// Job group comments, newest first, separated by blank lines
pub fn read_comments(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .map_err(|e| ReviewError::io_operation("read comments", path.display(), e))?;

    let mut comments = Vec::new();
    let mut current = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                comments.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        comments.push(current.join("\n"));
    }
    Ok(comments)
}
