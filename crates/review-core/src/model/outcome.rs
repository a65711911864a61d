//! Test module outcomes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReviewError;

/// Result of one test module run
///
/// Soft failures are kept apart from hard failures and passes everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    Passed,
    Failed,
    SoftFailed,
    Incomplete,
    Skipped,
}

impl Outcome {
    pub const ALL: [Outcome; 5] = [
        Outcome::Passed,
        Outcome::Failed,
        Outcome::SoftFailed,
        Outcome::Incomplete,
        Outcome::Skipped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Passed => "passed",
            Outcome::Failed => "failed",
            Outcome::SoftFailed => "soft-failed",
            Outcome::Incomplete => "incomplete",
            Outcome::Skipped => "skipped",
        }
    }

    pub fn is_passing(&self) -> bool {
        matches!(self, Outcome::Passed)
    }

    /// Hard failure only
    pub fn is_failing(&self) -> bool {
        matches!(self, Outcome::Failed)
    }

    /// Outcomes that need a reviewer's attention in the current build
    pub fn needs_review(&self) -> bool {
        matches!(
            self,
            Outcome::Failed | Outcome::SoftFailed | Outcome::Incomplete
        )
    }
}

impl FromStr for Outcome {
    type Err = ReviewError;

    /// Accepts plain names as well as openQA's `result_*` class names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let name = lowered.strip_prefix("result_").unwrap_or(&lowered);
        match name {
            "passed" | "ok" => Ok(Outcome::Passed),
            "failed" | "fail" => Ok(Outcome::Failed),
            "softfailed" | "softfail" | "soft-failed" | "soft_failed" => Ok(Outcome::SoftFailed),
            "incomplete" => Ok(Outcome::Incomplete),
            "skipped" | "none" => Ok(Outcome::Skipped),
            _ => Err(ReviewError::invalid_value("outcome", s)),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_openqa_class_names() {
        assert_eq!("result_passed".parse::<Outcome>().unwrap(), Outcome::Passed);
        assert_eq!(
            "result_softfail".parse::<Outcome>().unwrap(),
            Outcome::SoftFailed
        );
        assert_eq!("Failed".parse::<Outcome>().unwrap(), Outcome::Failed);
        assert_eq!(
            "soft-failed".parse::<Outcome>().unwrap(),
            Outcome::SoftFailed
        );
    }

    #[test]
    fn test_parse_unknown_outcome() {
        assert!("exploded".parse::<Outcome>().is_err());
    }

    #[test]
    fn test_soft_failure_is_neither_pass_nor_fail() {
        assert!(!Outcome::SoftFailed.is_passing());
        assert!(!Outcome::SoftFailed.is_failing());
        assert!(Outcome::SoftFailed.needs_review());
        assert!(!Outcome::Skipped.needs_review());
    }
}
