//! Classification of module comparisons
//!
//! A pure function of one [`ComparisonResult`] plus, optionally, the build
//! before the previous one. Verdicts come from the ordered [`rules::RULES`]
//! table; the rationale lists every signal that was consulted.

pub mod rules;
mod types;

pub use rules::{Rule, RuleInput, RULES};
pub use types::{Category, Classification, Signal};

use crate::diff::{ComparisonResult, Presence};
use crate::model::{Build, Outcome};

/// Whether a comparison yields a classification at all
///
/// Everything needing review in the current build does, and so does anything
/// that failed before: passing or skipped now, or removed (not renamed). A
/// renamed module's verdict is carried by its successor.
pub fn needs_classification(cmp: &ComparisonResult) -> bool {
    let previous_failing = cmp.previous_outcome.is_some_and(|o| o.is_failing());
    match cmp.current_outcome {
        Some(outcome) if outcome.needs_review() => true,
        Some(_) => previous_failing,
        None => cmp.is_confirmed_removal() && previous_failing,
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Classifier<'a> {
    /// Predecessor of the previous build, for drift context
    older: Option<&'a Build>,
}

impl<'a> Classifier<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(older: Option<&'a Build>) -> Self {
        Classifier { older }
    }

    /// Classify one comparison, `None` when it needs no verdict
    pub fn classify(&self, cmp: &ComparisonResult) -> Option<Classification> {
        if !needs_classification(cmp) {
            return None;
        }

        let input = RuleInput::from_comparison(cmp);
        let (rule, category) = rules::evaluate(&input);

        let mut rationale = gather_signals(cmp);
        if let Some(older) = self.older {
            rationale.push(Signal::EarlierOutcome {
                build: older.id().clone(),
                outcome: older.module_by_name(&cmp.module).map(|m| m.outcome),
            });
        }
        rationale.push(Signal::Rule {
            name: rule.name.to_string(),
        });

        Some(Classification {
            module: cmp.module.clone(),
            category,
            rationale,
            architectures: Vec::new(),
            promoted_from: None,
            outcome: cmp.current_outcome,
            failure_reason: cmp.failure_reason.clone(),
        })
    }

    /// Classify a full comparison set, keeping its order
    pub fn classify_all(&self, comparisons: &[ComparisonResult]) -> Vec<Classification> {
        comparisons.iter().filter_map(|c| self.classify(c)).collect()
    }
}

fn gather_signals(cmp: &ComparisonResult) -> Vec<Signal> {
    let mut signals = Vec::new();

    if let Some(outcome) = cmp.current_outcome {
        signals.push(Signal::CurrentOutcome { outcome });
    }

    match (cmp.presence, cmp.previous_outcome) {
        (Presence::Removed, Some(outcome)) => {
            signals.push(Signal::PreviousOutcome { outcome });
            signals.push(Signal::ModuleRemoved);
            return signals;
        }
        (_, Some(outcome)) => signals.push(Signal::PreviousOutcome { outcome }),
        (_, None) => signals.push(Signal::NoPreviousRun),
    }

    if let Some(rename) = &cmp.module_rename {
        signals.push(Signal::RenamedFrom {
            module: rename.from.clone(),
            score: rename.score,
        });
    }

    signals.push(if cmp.source_changed {
        Signal::SourceChanged
    } else {
        Signal::SourceUnchanged
    });

    if cmp.needle_changed {
        signals.push(Signal::NeedlesChanged {
            added: cmp.needles.added.len(),
            removed: cmp.needles.removed.len(),
            retagged: cmp.needles.retagged.len(),
        });
        signals.extend(cmp.needles.renames.iter().map(|r| Signal::NeedleRename {
            from: r.from.clone(),
            to: r.to.clone(),
            score: r.score,
        }));
    } else {
        signals.push(Signal::NeedlesUnchanged);
    }

    match cmp.current_outcome {
        Some(Outcome::SoftFailed) => signals.push(Signal::SoftFailure),
        Some(Outcome::Incomplete) => signals.push(Signal::IncompleteRun),
        _ => {}
    }

    signals
}
