//! Pluggable string similarity for rename detection
//!
//! The Differ only ever talks to [`SimilarityStrategy`], so the measure used to
//! detect needle and module renames can be swapped without touching the
//! classification rules.

mod edit;
mod tokens;

pub use edit::EditDistance;
pub use tokens::{tokenize, TokenOverlap};

use serde::{Deserialize, Serialize};

/// A similarity measure over names, scored 0.0 (unrelated) to 1.0 (identical)
pub trait SimilarityStrategy: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;

    /// Identifier used in logs and rationale
    fn name(&self) -> &'static str;
}

/// Configurable choice of strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    #[default]
    EditDistance,
    TokenOverlap,
}

impl StrategyKind {
    pub fn build(self) -> Box<dyn SimilarityStrategy> {
        match self {
            StrategyKind::EditDistance => Box::new(EditDistance),
            StrategyKind::TokenOverlap => Box::new(TokenOverlap),
        }
    }
}

/// Best scoring candidate at or above `threshold`
///
/// Ties go to the lexicographically smallest candidate so results do not
/// depend on iteration order.
pub fn best_match<'a, I>(
    strategy: &dyn SimilarityStrategy,
    name: &str,
    candidates: I,
    threshold: f64,
) -> Option<(&'a str, f64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&'a str, f64)> = None;

    for candidate in candidates {
        let score = strategy.similarity(name, candidate);
        if score < threshold {
            continue;
        }
        best = match best {
            Some((current, current_score))
                if current_score > score || (current_score == score && current <= candidate) =>
            {
                Some((current, current_score))
            }
            _ => Some((candidate, score)),
        };
    }

    best
}

#[cfg(test)]
mod tests;
