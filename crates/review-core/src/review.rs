//! Review pipeline: diff, classify and aggregate every variant of a build

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::aggregate::{Aggregator, CommonIssue, VariantClassifications};
use crate::catalog::BuildCatalog;
use crate::classify::{Category, Classification, Classifier};
use crate::config::{ReviewConfig, StatusConfig};
use crate::diff::{ComparisonResult, Differ};
use crate::error::{ReviewError, Result};
use crate::history::resolve_previous;
use crate::model::{Build, BuildId, BuildKey, Outcome};
use crate::similarity::SimilarityStrategy;
use crate::{bail_usage, trace_time};

/// Overall health of one variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusBadge {
    Green,
    Amber,
    Red,
}

impl StatusBadge {
    /// GREEN/AMBER only without new issues, graded by known issue count
    pub fn from_classifications(classifications: &[Classification], config: &StatusConfig) -> Self {
        let has_new = classifications.iter().any(|c| c.base_category().is_new());
        let known = classifications
            .iter()
            .filter(|c| c.base_category() == Category::KnownIssue)
            .count();

        match (has_new, known) {
            (false, n) if n <= config.green_known_issues => StatusBadge::Green,
            (false, n) if n <= config.amber_known_issues => StatusBadge::Amber,
            _ => StatusBadge::Red,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusBadge::Green => "GREEN",
            StatusBadge::Amber => "AMBER",
            StatusBadge::Red => "RED",
        }
    }
}

impl fmt::Display for StatusBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Review of a single variant against its predecessor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantReview {
    pub variant: String,
    pub build: BuildKey,
    pub previous: Option<BuildId>,
    /// Predecessor of `previous`, consulted for rationale only
    pub older: Option<BuildId>,
    pub status: StatusBadge,
    /// Current minus previous count per outcome
    pub outcome_deltas: BTreeMap<Outcome, i64>,
    pub comparisons: Vec<ComparisonResult>,
    pub classifications: Vec<Classification>,
}

impl VariantReview {
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Classification> {
        self.classifications
            .iter()
            .filter(move |c| c.category == category)
    }
}

/// A variant that could not be reviewed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedVariant {
    pub variant: String,
    pub reason: String,
}

/// Review of every variant of one build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildReview {
    pub job_group: String,
    pub build: BuildId,
    /// Build compared against when one was given explicitly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<BuildId>,
    /// Sorted by variant label
    pub variants: Vec<VariantReview>,
    pub common_issues: Vec<CommonIssue>,
    /// Variants the preceding build had and this one lacks
    pub missing_variants: Vec<String>,
    pub skipped: Vec<SkippedVariant>,
}

impl BuildReview {
    /// Number of classifications per category across all variants
    pub fn category_counts(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for c in self.variants.iter().flat_map(|v| &v.classifications) {
            *counts.entry(c.category).or_default() += 1;
        }
        counts
    }
}

/// Difference in outcome counts between two builds
pub fn outcome_deltas(current: &Build, previous: Option<&Build>) -> BTreeMap<Outcome, i64> {
    let before = previous.map(Build::outcome_counts).unwrap_or_default();
    current
        .outcome_counts()
        .into_iter()
        .map(|(outcome, count)| {
            let prior = before.get(&outcome).copied().unwrap_or(0);
            (outcome, count as i64 - prior as i64)
        })
        .collect()
}

pub struct Reviewer {
    config: ReviewConfig,
    strategy: Box<dyn SimilarityStrategy>,
    arch: Option<String>,
}

impl Reviewer {
    pub fn new(config: ReviewConfig) -> Self {
        let strategy = config.similarity.strategy.build();
        Self::with_strategy(config, strategy)
    }

    pub fn with_strategy(config: ReviewConfig, strategy: Box<dyn SimilarityStrategy>) -> Self {
        Reviewer {
            config,
            strategy,
            arch: None,
        }
    }

    /// Only review variants of this architecture
    pub fn only_arch(mut self, arch: Option<String>) -> Self {
        self.arch = arch;
        self
    }

    pub fn config(&self) -> &ReviewConfig {
        &self.config
    }

    /// Diff and classify one variant; no cross-variant aggregation
    pub fn review_variant(
        &self,
        current: &Build,
        previous: Option<&Build>,
        older: Option<&Build>,
    ) -> VariantReview {
        let differ = Differ::new(self.strategy.as_ref(), &self.config.similarity);
        let comparisons = differ.compare(current, previous);
        let classifications = Classifier::with_history(older).classify_all(&comparisons);
        let status = StatusBadge::from_classifications(&classifications, &self.config.status);
        let outcome_deltas = outcome_deltas(current, previous);

        tracing::info!(
            build = %current.key(),
            previous = ?previous.map(|p| p.id().to_string()),
            deltas = ?outcome_deltas,
            status = %status,
            "changes since last build"
        );

        VariantReview {
            variant: current.variant(),
            build: current.key().clone(),
            previous: previous.map(|p| p.id().clone()),
            older: older.map(|o| o.id().clone()),
            status,
            outcome_deltas,
            comparisons,
            classifications,
        }
    }

    /// Review every variant of `id` against its resolved predecessor
    pub fn review_build(
        &self,
        catalog: &BuildCatalog,
        job_group: &str,
        id: &BuildId,
    ) -> Result<BuildReview> {
        self.review(catalog, job_group, id, None)
    }

    /// Review every variant of `id` against the same variant of `reference`
    ///
    /// Used to compare against the last reviewed build instead of the
    /// immediate predecessor. Variants `reference` lacks fall back to the
    /// resolved predecessor; a reference with no records at all is dropped
    /// from the review.
    pub fn review_build_against(
        &self,
        catalog: &BuildCatalog,
        job_group: &str,
        id: &BuildId,
        reference: &BuildId,
    ) -> Result<BuildReview> {
        self.review(catalog, job_group, id, Some(reference))
    }

    fn review(
        &self,
        catalog: &BuildCatalog,
        job_group: &str,
        id: &BuildId,
        reference: Option<&BuildId>,
    ) -> Result<BuildReview> {
        let start = Instant::now();
        let mut builds = catalog.variants_of(job_group, id);
        if builds.is_empty() {
            return Err(ReviewError::BuildNotFound(format!("{} {}", job_group, id)));
        }
        if let Some(arch) = &self.arch {
            builds.retain(|b| &b.key().arch == arch);
            if builds.is_empty() {
                bail_usage!(format!(
                    "architecture {} not found in build {}: available {}",
                    arch,
                    id,
                    catalog
                        .variant_labels(job_group, id)
                        .into_iter()
                        .collect::<Vec<_>>()
                        .join(", ")
                ));
            }
        }

        let reference = reference.filter(|r| {
            let known = !catalog.variants_of(job_group, r).is_empty();
            if !known {
                tracing::warn!(build = %id, reference = %r, "reference build has no records, using predecessors");
            }
            known
        });

        let mut reviews = Vec::with_capacity(builds.len());
        let mut skipped = Vec::new();
        for current in builds {
            match self.review_in_catalog(catalog, current, reference) {
                Ok(review) => reviews.push(review),
                Err(e) => {
                    tracing::warn!(build = %current.key(), error = %e, "skipping variant");
                    skipped.push(SkippedVariant {
                        variant: current.variant(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        // Skipped variants still count towards "all architectures"
        let aggregation = Aggregator::new(&self.config.aggregation).aggregate(
            &reviews
                .iter()
                .map(|r| VariantClassifications {
                    variant: r.variant.clone(),
                    classifications: r.classifications.clone(),
                })
                .chain(skipped.iter().map(|s| VariantClassifications {
                    variant: s.variant.clone(),
                    classifications: Vec::new(),
                }))
                .collect::<Vec<_>>(),
        );
        let mut aggregated: BTreeMap<String, Vec<Classification>> = aggregation
            .variants
            .into_iter()
            .map(|v| (v.variant, v.classifications))
            .collect();
        for review in &mut reviews {
            if let Some(classifications) = aggregated.remove(&review.variant) {
                review.classifications = classifications;
            }
        }
        reviews.sort_by(|a, b| a.variant.cmp(&b.variant));

        let missing_variants = missing_variants(catalog, job_group, id, reference);
        if !missing_variants.is_empty() {
            tracing::info!(build = %id, missing = ?missing_variants, "variants missing since previous build");
        }

        trace_time!(start, "review_build", variants = reviews.len());

        Ok(BuildReview {
            job_group: job_group.to_string(),
            build: id.clone(),
            reference: reference.cloned(),
            variants: reviews,
            common_issues: aggregation.common_issues,
            missing_variants,
            skipped,
        })
    }

    fn review_in_catalog(
        &self,
        catalog: &BuildCatalog,
        current: &Build,
        reference: Option<&BuildId>,
    ) -> Result<VariantReview> {
        let explicit = reference
            .map(|r| current.key().with_id(r.clone()))
            .filter(|key| catalog.get(key).is_ok());
        let previous_key = match explicit {
            Some(key) => Some(key),
            None => resolve_previous(catalog, current)?,
        };
        let previous = previous_key.map(|key| catalog.get(&key)).transpose()?;

        // An unresolvable N-2 build only costs rationale
        let older = match previous.map(|p| resolve_previous(catalog, p)) {
            Some(Ok(Some(key))) => catalog.get(&key).ok(),
            Some(Err(e)) => {
                tracing::debug!(error = %e, "ignoring older build");
                None
            }
            _ => None,
        };

        Ok(self.review_variant(current, previous, older))
    }
}

/// Variants of the preceding build in the group that `id` does not have
fn missing_variants(
    catalog: &BuildCatalog,
    job_group: &str,
    id: &BuildId,
    reference: Option<&BuildId>,
) -> Vec<String> {
    let preceding = reference.cloned().or_else(|| {
        catalog
            .builds()
            .iter()
            .filter(|b| b.key().job_group == job_group && b.id() < id)
            .map(|b| b.id().clone())
            .max()
    });
    let Some(preceding) = preceding else {
        return Vec::new();
    };

    let current: BTreeSet<String> = catalog.variant_labels(job_group, id);
    catalog
        .variant_labels(job_group, &preceding)
        .into_iter()
        .filter(|label| !current.contains(label))
        .collect()
}
