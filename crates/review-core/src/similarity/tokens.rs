use std::collections::BTreeSet;

use super::SimilarityStrategy;

/// Split a name into lowercase tokens on non-alphanumeric characters
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Jaccard overlap of name tokens
///
/// Purely numeric tokens are ignored: needle names carry creation dates
/// (`inst-welcome-20160301`) which change on every re-recording.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenOverlap;

fn token_set(text: &str) -> BTreeSet<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| !t.chars().all(|c| c.is_ascii_digit()))
        .collect()
}

impl SimilarityStrategy for TokenOverlap {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        let left = token_set(a);
        let right = token_set(b);

        if left.is_empty() && right.is_empty() {
            return if a == b { 1.0 } else { 0.0 };
        }

        let shared = left.intersection(&right).count();
        let total = left.union(&right).count();
        shared as f64 / total as f64
    }

    fn name(&self) -> &'static str {
        "token-overlap"
    }
}
