//! In-memory catalog of ingested builds
//!
//! Ingestion is per record: a malformed record is reported and skipped, its
//! siblings are still loaded.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{ReviewError, Result};
use crate::history::PreviousBuildLookup;
use crate::model::{Build, BuildId, BuildKey, RawBuild};

/// A record that could not be ingested
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestFailure {
    pub source: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct BuildCatalog {
    builds: Vec<Build>,
}

impl BuildCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every record, collecting failures instead of stopping at them
    pub fn ingest<I, S>(records: I) -> (Self, Vec<IngestFailure>)
    where
        I: IntoIterator<Item = (S, Result<RawBuild>)>,
        S: Into<String>,
    {
        let mut catalog = BuildCatalog::new();
        let mut failures = Vec::new();

        for (source, record) in records {
            let source = source.into();
            match record.and_then(|raw| Build::load(&source, &raw)) {
                Ok(build) => catalog.insert(build),
                Err(e) => {
                    tracing::warn!(source = %source, error = %e, "skipping build record");
                    failures.push(IngestFailure {
                        source,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::debug!(
            builds = catalog.len(),
            failures = failures.len(),
            "ingested build records"
        );
        (catalog, failures)
    }

    pub fn insert(&mut self, build: Build) {
        self.builds.push(build);
    }

    pub fn len(&self) -> usize {
        self.builds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builds.is_empty()
    }

    pub fn builds(&self) -> &[Build] {
        &self.builds
    }

    pub fn get(&self, key: &BuildKey) -> Result<&Build> {
        self.builds
            .iter()
            .find(|b| b.key() == key)
            .ok_or_else(|| ReviewError::BuildNotFound(key.to_string()))
    }

    pub fn job_groups(&self) -> BTreeSet<&str> {
        self.builds
            .iter()
            .map(|b| b.key().job_group.as_str())
            .collect()
    }

    /// Newest build id in a job group
    pub fn latest_build(&self, job_group: &str) -> Option<&BuildId> {
        self.builds
            .iter()
            .filter(|b| b.key().job_group == job_group)
            .map(|b| b.id())
            .max()
    }

    /// Every variant of one build, sorted by variant label
    ///
    /// A variant recorded twice is reported once (first record wins).
    pub fn variants_of(&self, job_group: &str, id: &BuildId) -> Vec<&Build> {
        let mut seen = BTreeSet::new();
        let mut variants: Vec<&Build> = Vec::new();

        for build in &self.builds {
            let key = build.key();
            if key.job_group != job_group || &key.id != id {
                continue;
            }
            if !seen.insert(key.variant()) {
                tracing::warn!(build = %key, "duplicate build record ignored");
                continue;
            }
            variants.push(build);
        }

        variants.sort_by_key(|b| b.variant());
        variants
    }

    /// Variant labels seen for a build id
    pub fn variant_labels(&self, job_group: &str, id: &BuildId) -> BTreeSet<String> {
        self.variants_of(job_group, id)
            .into_iter()
            .map(|b| b.variant())
            .collect()
    }
}

impl PreviousBuildLookup for BuildCatalog {
    /// All builds of the same job group; the resolver narrows them down
    fn previous_candidates(&self, current: &BuildKey) -> Vec<BuildKey> {
        self.builds
            .iter()
            .map(|b| b.key())
            .filter(|k| k.job_group == current.job_group)
            .cloned()
            .collect()
    }
}
