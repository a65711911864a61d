use serde::{Deserialize, Serialize};

use crate::model::Outcome;

/// Where a module name was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Presence {
    /// In both builds
    Both,
    /// Only in the current build (or there is no previous build)
    New,
    /// Only in the previous build
    Removed,
}

/// A likely rename between two names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rename {
    pub from: String,
    pub to: String,
    pub score: f64,
}

/// Needle-level difference of one module between two builds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NeedleDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    /// Present in both builds with a different tag set
    pub retagged: Vec<String>,
    /// Removed needles that look like one of the added ones
    pub renames: Vec<Rename>,
}

impl NeedleDiff {
    pub fn is_changed(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty() || !self.retagged.is_empty()
    }

    /// Strongest rename signal, if any
    pub fn rename_score(&self) -> Option<f64> {
        self.renames.iter().map(|r| r.score).reduce(f64::max)
    }
}

/// Differ output for one module name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub module: String,
    pub presence: Presence,
    pub source_changed: bool,
    pub needle_changed: bool,
    pub needles: NeedleDiff,
    /// Soft rename signal for needles; `needle_changed` stays true regardless
    pub needle_rename_score: Option<f64>,
    pub outcome_changed: bool,
    /// For new modules only set when they renamed a previous module
    pub previous_outcome: Option<Outcome>,
    pub current_outcome: Option<Outcome>,
    /// For new modules: the removed module it likely replaces.
    /// For removed modules: the new module that likely replaces it.
    pub module_rename: Option<Rename>,
    pub failure_reason: Option<String>,
}

impl ComparisonResult {
    /// Removed outright, not renamed
    pub fn is_confirmed_removal(&self) -> bool {
        self.presence == Presence::Removed && self.module_rename.is_none()
    }
}
