use std::collections::BTreeSet;

use super::types::{NeedleDiff, Rename};
use crate::model::TestModule;
use crate::similarity::{best_match, SimilarityStrategy};

/// Needle set difference between two runs of the same module
///
/// Renames are detected as removal plus addition with similar names. They are
/// reported alongside, never instead of, the added/removed lists.
pub(super) fn diff(
    strategy: &dyn SimilarityStrategy,
    previous: &TestModule,
    current: &TestModule,
    rename_threshold: f64,
) -> NeedleDiff {
    let before = previous.needle_names();
    let after = current.needle_names();

    let added: Vec<&str> = after.difference(&before).copied().collect();
    let removed: Vec<&str> = before.difference(&after).copied().collect();
    let retagged: Vec<String> = before
        .intersection(&after)
        .filter(|name| {
            let old = previous.needle(name).map(|n| &n.tags);
            let new = current.needle(name).map(|n| &n.tags);
            old != new
        })
        .map(|name| name.to_string())
        .collect();

    let mut unclaimed: BTreeSet<&str> = added.iter().copied().collect();
    let mut renames = Vec::new();
    for name in &removed {
        if let Some((to, score)) =
            best_match(strategy, name, unclaimed.iter().copied(), rename_threshold)
        {
            unclaimed.remove(to);
            renames.push(Rename {
                from: name.to_string(),
                to: to.to_string(),
                score,
            });
        }
    }

    NeedleDiff {
        added: added.into_iter().map(str::to_string).collect(),
        removed: removed.into_iter().map(str::to_string).collect(),
        retagged,
        renames,
    }
}
