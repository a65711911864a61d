//! Ordered rule table: the first matching rule decides

use super::types::Category;
use crate::diff::{ComparisonResult, Presence};
use crate::model::Outcome;

/// The slice of a comparison the rules look at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleInput {
    pub current: Option<Outcome>,
    pub previous: Option<Outcome>,
    pub presence: Presence,
    pub source_changed: bool,
    pub needle_changed: bool,
    pub confirmed_removal: bool,
}

impl RuleInput {
    pub fn from_comparison(cmp: &ComparisonResult) -> Self {
        RuleInput {
            current: cmp.current_outcome,
            previous: cmp.previous_outcome,
            presence: cmp.presence,
            source_changed: cmp.source_changed,
            needle_changed: cmp.needle_changed,
            confirmed_removal: cmp.is_confirmed_removal(),
        }
    }

    fn current_failing(&self) -> bool {
        self.current.is_some_and(|o| o.is_failing())
    }

    fn current_passing(&self) -> bool {
        self.current.is_some_and(|o| o.is_passing())
    }

    fn previous_failing(&self) -> bool {
        self.previous.is_some_and(|o| o.is_failing())
    }

    fn previous_passing(&self) -> bool {
        self.previous.is_some_and(|o| o.is_passing())
    }

    fn inputs_changed(&self) -> bool {
        self.source_changed || self.needle_changed
    }
}

pub struct Rule {
    pub name: &'static str,
    pub applies: fn(&RuleInput) -> bool,
    pub verdict: fn(&RuleInput) -> Category,
}

/// Most specific first; the last rule matches everything
pub static RULES: &[Rule] = &[
    Rule {
        name: "fixed",
        applies: |i| i.current_passing() && i.previous_failing(),
        verdict: |_| Category::FixedIssue,
    },
    Rule {
        name: "fixed-by-removal",
        applies: |i| i.confirmed_removal && i.previous_failing(),
        verdict: |_| Category::FixedIssue,
    },
    Rule {
        name: "new-module",
        applies: |i| i.current_failing() && i.presence == Presence::New,
        verdict: |i| {
            if i.inputs_changed() {
                Category::NewProductIssue
            } else {
                Category::NewOpenqaIssue
            }
        },
    },
    Rule {
        name: "still-failing",
        applies: |i| i.current_failing() && i.previous_failing() && !i.inputs_changed(),
        verdict: |_| Category::KnownIssue,
    },
    Rule {
        name: "still-failing-inputs-changed",
        applies: |i| i.current_failing() && i.previous_failing() && i.inputs_changed(),
        verdict: |_| Category::NewProductIssue,
    },
    Rule {
        name: "regression",
        applies: |i| i.current_failing() && i.previous_passing(),
        verdict: |_| Category::NewProductIssue,
    },
    Rule {
        name: "unclassified",
        applies: |_| true,
        verdict: |_| Category::Unclassified,
    },
];

/// Evaluate the table; total over every input
pub fn evaluate(input: &RuleInput) -> (&'static Rule, Category) {
    let rule = RULES
        .iter()
        .find(|rule| (rule.applies)(input))
        .unwrap_or(&RULES[RULES.len() - 1]);
    (rule, (rule.verdict)(input))
}
