//! Output format handling for openqa-review
//!
//! Supports three output formats:
//! - human: Markdown review, meant to be pasted as a job group comment
//! - json: Stable, machine-readable JSON
//! - records: Line-oriented format, one classification per line

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReviewError;

/// Output format for openqa-review commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown review (default)
    #[default]
    Human,
    /// JSON output for machine consumption
    Json,
    /// Line-oriented records
    Records,
}

impl FromStr for OutputFormat {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            "records" => Ok(OutputFormat::Records),
            other => Err(ReviewError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Human => write!(f, "human"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Records => write!(f, "records"),
        }
    }
}

/// Escape double quotes in a string for records format.
pub fn escape_quotes(s: &str) -> String {
    s.replace('\"', r#"\""#)
}

/// Records header line shared by every command
pub fn records_header(mode: &str, fields: &[(&str, String)]) -> String {
    let mut line = format!("H openqa-review=1 records=1 mode={}", mode);
    for (key, value) in fields {
        if value.contains(' ') {
            line.push_str(&format!(" {}=\"{}\"", key, escape_quotes(value)));
        } else {
            line.push_str(&format!(" {}={}", key, value));
        }
    }
    line
}
