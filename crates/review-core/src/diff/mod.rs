//! Pairwise comparison of a build against its predecessor
//!
//! Produces one [`ComparisonResult`] per module name found in either build:
//! current modules first in reported order, then removed modules in the
//! previous build's order. All inputs are borrowed; nothing outside the two
//! builds is consulted, so repeated runs give identical output.

mod needles;
mod types;

pub use types::{ComparisonResult, NeedleDiff, Presence, Rename};

use std::collections::{BTreeMap, BTreeSet};

use crate::config::SimilarityConfig;
use crate::model::{Build, TestModule};
use crate::similarity::{best_match, SimilarityStrategy};

pub struct Differ<'a> {
    strategy: &'a dyn SimilarityStrategy,
    module_rename_threshold: f64,
    needle_rename_threshold: f64,
}

impl<'a> Differ<'a> {
    pub fn new(strategy: &'a dyn SimilarityStrategy, config: &SimilarityConfig) -> Self {
        Differ {
            strategy,
            module_rename_threshold: config.module_rename_threshold,
            needle_rename_threshold: config.needle_rename_threshold,
        }
    }

    #[tracing::instrument(skip_all, fields(current = %current.key(), previous = ?previous.map(|p| p.id().to_string())))]
    pub fn compare(&self, current: &Build, previous: Option<&Build>) -> Vec<ComparisonResult> {
        let Some(previous) = previous else {
            return current.modules().iter().map(first_build_entry).collect();
        };

        let (renamed_from, renamed_to) = self.module_renames(current, previous);
        let previous_revisions = previous.source_revisions();
        let previous_needles = previous.needle_catalog();

        let mut results = Vec::with_capacity(current.modules().len());

        for module in current.modules() {
            let result = match previous.module_by_name(&module.name) {
                Some(before) => self.compare_pair(module, before),
                None => {
                    let mut entry = new_module_entry(module, &previous_revisions, &previous_needles);
                    if let Some(rename) = renamed_from.get(module.name.as_str()) {
                        carry_predecessor(&mut entry, previous, rename);
                    }
                    entry
                }
            };
            results.push(result);
        }

        for module in previous.modules() {
            if current.module_by_name(&module.name).is_none() {
                let mut entry = removed_entry(module);
                entry.module_rename = renamed_to.get(module.name.as_str()).cloned();
                results.push(entry);
            }
        }

        tracing::debug!(modules = results.len(), "compared builds");
        results
    }

    fn compare_pair(&self, current: &TestModule, previous: &TestModule) -> ComparisonResult {
        let needles = needles::diff(
            self.strategy,
            previous,
            current,
            self.needle_rename_threshold,
        );

        ComparisonResult {
            module: current.name.clone(),
            presence: Presence::Both,
            source_changed: source_changed(
                previous.source_revision.as_deref(),
                current.source_revision.as_deref(),
            ),
            needle_changed: needles.is_changed(),
            needle_rename_score: needles.rename_score(),
            needles,
            outcome_changed: previous.outcome != current.outcome,
            previous_outcome: Some(previous.outcome),
            current_outcome: Some(current.outcome),
            module_rename: None,
            failure_reason: current.failure_reason.clone(),
        }
    }

    /// Pair removed modules with new ones by name similarity, one to one
    ///
    /// Returns (new name -> rename, removed name -> rename).
    fn module_renames<'b>(
        &self,
        current: &'b Build,
        previous: &'b Build,
    ) -> (BTreeMap<&'b str, Rename>, BTreeMap<&'b str, Rename>) {
        let mut available: BTreeSet<&str> = current
            .modules()
            .iter()
            .map(|m| m.name.as_str())
            .filter(|name| previous.module_by_name(name).is_none())
            .collect();

        let mut from = BTreeMap::new();
        let mut to = BTreeMap::new();

        for module in previous.modules() {
            if current.module_by_name(&module.name).is_some() {
                continue;
            }
            let Some((successor, score)) = best_match(
                self.strategy,
                &module.name,
                available.iter().copied(),
                self.module_rename_threshold,
            ) else {
                continue;
            };

            available.remove(successor);
            let rename = Rename {
                from: module.name.clone(),
                to: successor.to_string(),
                score,
            };
            tracing::debug!(from = %rename.from, to = %rename.to, score, "module rename candidate");
            from.insert(successor, rename.clone());
            to.insert(module.name.as_str(), rename);
        }

        (from, to)
    }
}

/// Unknown on both sides counts as unchanged; unknown on one side as changed
fn source_changed(previous: Option<&str>, current: Option<&str>) -> bool {
    previous != current
}

fn first_build_entry(module: &TestModule) -> ComparisonResult {
    ComparisonResult {
        module: module.name.clone(),
        presence: Presence::New,
        source_changed: true,
        needle_changed: true,
        needles: NeedleDiff {
            added: sorted_needle_names(module),
            ..Default::default()
        },
        needle_rename_score: None,
        outcome_changed: module.outcome.needs_review(),
        previous_outcome: None,
        current_outcome: Some(module.outcome),
        module_rename: None,
        failure_reason: module.failure_reason.clone(),
    }
}

/// A module the previous build did not run
///
/// Its inputs count as changed when its test revision was never seen in the
/// previous build, or when it references needles the previous build did not
/// know (or knew with different tags).
fn new_module_entry(
    module: &TestModule,
    previous_revisions: &BTreeSet<&str>,
    previous_needles: &BTreeMap<&str, &crate::model::NeedleRef>,
) -> ComparisonResult {
    let source_changed = match module.source_revision.as_deref() {
        Some(rev) => !previous_revisions.contains(rev),
        None => true,
    };

    let mut needles = NeedleDiff::default();
    for needle in &module.needles {
        match previous_needles.get(needle.name.as_str()) {
            None => needles.added.push(needle.name.clone()),
            Some(known) if known.tags != needle.tags => needles.retagged.push(needle.name.clone()),
            Some(_) => {}
        }
    }
    needles.added.sort();
    needles.retagged.sort();

    ComparisonResult {
        module: module.name.clone(),
        presence: Presence::New,
        source_changed,
        needle_changed: needles.is_changed(),
        needles,
        needle_rename_score: None,
        outcome_changed: module.outcome.needs_review(),
        previous_outcome: None,
        current_outcome: Some(module.outcome),
        module_rename: None,
        failure_reason: module.failure_reason.clone(),
    }
}

/// A renamed module inherits its predecessor's outcome so the transition
/// (for example failing to passing) can still be classified
fn carry_predecessor(entry: &mut ComparisonResult, previous: &Build, rename: &Rename) {
    let predecessor = previous.module_by_name(&rename.from).map(|m| m.outcome);
    if let Some(outcome) = predecessor {
        entry.previous_outcome = Some(outcome);
        entry.outcome_changed = entry.current_outcome != Some(outcome);
    }
    entry.module_rename = Some(rename.clone());
}

fn removed_entry(module: &TestModule) -> ComparisonResult {
    ComparisonResult {
        module: module.name.clone(),
        presence: Presence::Removed,
        source_changed: false,
        needle_changed: false,
        needles: NeedleDiff::default(),
        needle_rename_score: None,
        outcome_changed: true,
        previous_outcome: Some(module.outcome),
        current_outcome: None,
        module_rename: None,
        failure_reason: None,
    }
}

fn sorted_needle_names(module: &TestModule) -> Vec<String> {
    module
        .needle_names()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests;
