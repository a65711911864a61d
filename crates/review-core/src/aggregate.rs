//! Cross-architecture aggregation
//!
//! Failures sharing module name *and* category across the variants of one
//! build are promoted to common issues. Output never depends on the order
//! variants are supplied in: variants are sorted by label first.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::classify::{Category, Classification};
use crate::config::{AggregationConfig, AggregationMode};

/// Classifications of one variant (architecture or flavor-architecture)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantClassifications {
    pub variant: String,
    pub classifications: Vec<Classification>,
}

/// A failure shared by enough variants to be reported once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonIssue {
    pub module: String,
    /// Category every affected variant agreed on
    pub category: Category,
    pub architectures: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    /// Sorted by variant label
    pub variants: Vec<VariantClassifications>,
    pub common_issues: Vec<CommonIssue>,
}

type GroupKey = (String, Category);

pub struct Aggregator {
    mode: AggregationMode,
    min_variants: usize,
}

impl Aggregator {
    pub fn new(config: &AggregationConfig) -> Self {
        Aggregator {
            mode: config.mode,
            min_variants: config.min_variants,
        }
    }

    fn required_count(&self, variants: usize) -> usize {
        match self.mode {
            AggregationMode::All => variants,
            AggregationMode::Majority => variants / 2 + 1,
        }
    }

    #[tracing::instrument(skip_all, fields(variants = input.len(), mode = ?self.mode))]
    pub fn aggregate(&self, input: &[VariantClassifications]) -> Aggregation {
        let mut variants = input.to_vec();
        variants.sort_by(|a, b| a.variant.cmp(&b.variant));

        let mut groups: BTreeMap<GroupKey, BTreeSet<String>> = BTreeMap::new();
        for variant in &variants {
            for c in &variant.classifications {
                groups
                    .entry((c.module.clone(), c.base_category()))
                    .or_default()
                    .insert(variant.variant.clone());
            }
        }

        let variant_count = variants.len();
        let required = self.required_count(variant_count);
        let promotes = |key: &GroupKey, affected: &BTreeSet<String>| {
            variant_count >= self.min_variants
                && key.1.is_failure()
                && affected.len() >= required
        };

        let mut common_issues = Vec::new();
        let mut reported: BTreeSet<GroupKey> = BTreeSet::new();

        for variant in &mut variants {
            for c in &mut variant.classifications {
                let key = (c.module.clone(), c.base_category());
                let Some(affected) = groups.get(&key) else {
                    continue;
                };

                if affected.len() > 1 {
                    c.architectures = affected.iter().cloned().collect();
                }

                if promotes(&key, affected) {
                    c.promoted_from = Some(key.1);
                    c.category = Category::CommonIssue;

                    if reported.insert(key.clone()) {
                        common_issues.push(CommonIssue {
                            module: key.0,
                            category: key.1,
                            architectures: affected.iter().cloned().collect(),
                        });
                    }
                }
            }
        }

        tracing::debug!(common = common_issues.len(), "aggregated variants");
        Aggregation {
            variants,
            common_issues,
        }
    }
}
