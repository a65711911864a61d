//! Configuration type definitions

use serde::{Deserialize, Serialize};

use crate::similarity::StrategyKind;

/// Review configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Rename detection settings
    #[serde(default)]
    pub similarity: SimilarityConfig,

    /// Cross-architecture promotion settings
    #[serde(default)]
    pub aggregation: AggregationConfig,

    /// Status badge thresholds
    #[serde(default)]
    pub status: StatusConfig,
}

/// Configuration for needle and module rename detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityConfig {
    /// Similarity measure used for names
    #[serde(default)]
    pub strategy: StrategyKind,

    /// Minimum score for a removed module to count as renamed
    #[serde(default = "default_rename_threshold")]
    pub module_rename_threshold: f64,

    /// Minimum score for a removed needle to count as renamed
    #[serde(default = "default_rename_threshold")]
    pub needle_rename_threshold: f64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            module_rename_threshold: default_rename_threshold(),
            needle_rename_threshold: default_rename_threshold(),
        }
    }
}

fn default_rename_threshold() -> f64 {
    0.8
}

/// How many variants must share a failure before it becomes a common issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMode {
    /// Every variant under comparison
    #[default]
    All,
    /// Strictly more than half of the variants
    Majority,
}

impl std::str::FromStr for AggregationMode {
    type Err = crate::error::ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(AggregationMode::All),
            "majority" => Ok(AggregationMode::Majority),
            other => Err(crate::error::ReviewError::invalid_value(
                "aggregation mode",
                other,
            )),
        }
    }
}

/// Configuration for cross-architecture aggregation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationConfig {
    #[serde(default)]
    pub mode: AggregationMode,

    /// Fewer variants than this never promote anything
    #[serde(default = "default_min_variants")]
    pub min_variants: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            mode: AggregationMode::default(),
            min_variants: default_min_variants(),
        }
    }
}

fn default_min_variants() -> usize {
    2
}

/// Thresholds for the per-variant status badge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusConfig {
    /// Known issues tolerated for GREEN
    #[serde(default = "default_green_known_issues")]
    pub green_known_issues: usize,

    /// Known issues tolerated for AMBER
    #[serde(default = "default_amber_known_issues")]
    pub amber_known_issues: usize,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            green_known_issues: default_green_known_issues(),
            amber_known_issues: default_amber_known_issues(),
        }
    }
}

fn default_green_known_issues() -> usize {
    1
}

fn default_amber_known_issues() -> usize {
    5
}
