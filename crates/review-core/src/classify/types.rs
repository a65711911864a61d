use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{BuildId, Outcome};

/// Verdict for one module of the current build
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    NewProductIssue,
    NewOpenqaIssue,
    KnownIssue,
    FixedIssue,
    CommonIssue,
    Unclassified,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::NewProductIssue => "new-product-issue",
            Category::NewOpenqaIssue => "new-openqa-issue",
            Category::KnownIssue => "known-issue",
            Category::FixedIssue => "fixed-issue",
            Category::CommonIssue => "common-issue",
            Category::Unclassified => "unclassified",
        }
    }

    /// Categories that describe a current failure
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Category::NewProductIssue
                | Category::NewOpenqaIssue
                | Category::KnownIssue
                | Category::CommonIssue
        )
    }

    /// New product or openQA issue
    pub fn is_new(&self) -> bool {
        matches!(self, Category::NewProductIssue | Category::NewOpenqaIssue)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One piece of evidence consulted for a verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "signal", rename_all = "kebab-case")]
pub enum Signal {
    CurrentOutcome { outcome: Outcome },
    PreviousOutcome { outcome: Outcome },
    NoPreviousRun,
    ModuleRemoved,
    RenamedFrom { module: String, score: f64 },
    SourceChanged,
    SourceUnchanged,
    NeedlesChanged { added: usize, removed: usize, retagged: usize },
    NeedlesUnchanged,
    NeedleRename { from: String, to: String, score: f64 },
    SoftFailure,
    IncompleteRun,
    EarlierOutcome { build: BuildId, outcome: Option<Outcome> },
    Rule { name: String },
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::CurrentOutcome { outcome } => write!(f, "current outcome: {}", outcome),
            Signal::PreviousOutcome { outcome } => write!(f, "previous outcome: {}", outcome),
            Signal::NoPreviousRun => write!(f, "no previous run"),
            Signal::ModuleRemoved => write!(f, "module removed"),
            Signal::RenamedFrom { module, score } => {
                write!(f, "possibly renamed from {} ({:.2})", module, score)
            }
            Signal::SourceChanged => write!(f, "source changed"),
            Signal::SourceUnchanged => write!(f, "source unchanged"),
            Signal::NeedlesChanged {
                added,
                removed,
                retagged,
            } => write!(
                f,
                "needle set changed (+{} -{} ~{})",
                added, removed, retagged
            ),
            Signal::NeedlesUnchanged => write!(f, "needle set unchanged"),
            Signal::NeedleRename { from, to, score } => {
                write!(f, "needle {} possibly renamed to {} ({:.2})", from, to, score)
            }
            Signal::SoftFailure => write!(f, "soft failure"),
            Signal::IncompleteRun => write!(f, "incomplete run"),
            Signal::EarlierOutcome { build, outcome } => match outcome {
                Some(outcome) => write!(f, "build {} outcome: {}", build, outcome),
                None => write!(f, "build {}: not run", build),
            },
            Signal::Rule { name } => write!(f, "rule: {}", name),
        }
    }
}

/// Final verdict for one module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub module: String,
    pub category: Category,
    /// Signals consulted, in the order they were considered
    pub rationale: Vec<Signal>,
    /// Variants sharing this module/category pair, sorted; filled by aggregation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub architectures: Vec<String>,
    /// Category before promotion to a common issue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promoted_from: Option<Category>,
    /// `None` for modules no longer run
    pub outcome: Option<Outcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl Classification {
    /// Category used to group across variants
    pub fn base_category(&self) -> Category {
        self.promoted_from.unwrap_or(self.category)
    }

    pub fn is_soft_failure(&self) -> bool {
        self.outcome == Some(Outcome::SoftFailed)
    }
}
