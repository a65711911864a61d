//! Build identifiers with natural ordering

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque build identifier, totally ordered within a job group
///
/// openQA builds are usually zero-padded numbers (`0100`) but products such as
/// `SLE HA` use free-form identifiers, so ordering compares digit runs
/// numerically and everything else lexically. A redundant `Build` prefix is
/// dropped on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildId(String);

impl BuildId {
    pub fn new(raw: impl AsRef<str>) -> Self {
        let trimmed = raw.as_ref().trim();
        let id = trimmed.strip_prefix("Build").unwrap_or(trimmed).trim();
        BuildId(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for BuildId {
    fn from(value: &str) -> Self {
        BuildId::new(value)
    }
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Number(&'a str),
    Text(&'a str),
}

fn segments(s: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut digits: Option<bool> = None;

    for (idx, ch) in s.char_indices() {
        let is_digit = ch.is_ascii_digit();
        match digits {
            Some(prev) if prev != is_digit => {
                out.push(segment(&s[start..idx], prev));
                start = idx;
            }
            _ => {}
        }
        digits = Some(is_digit);
    }
    if let Some(prev) = digits {
        out.push(segment(&s[start..], prev));
    }
    out
}

fn segment(s: &str, digits: bool) -> Segment<'_> {
    if digits {
        Segment::Number(s)
    } else {
        Segment::Text(s)
    }
}

fn compare_numbers(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

impl Ord for BuildId {
    fn cmp(&self, other: &Self) -> Ordering {
        let left = segments(&self.0);
        let right = segments(&other.0);

        for (a, b) in left.iter().zip(right.iter()) {
            let ord = match (a, b) {
                (Segment::Number(a), Segment::Number(b)) => compare_numbers(a, b),
                (Segment::Text(a), Segment::Text(b)) => a.cmp(b),
                (Segment::Number(_), Segment::Text(_)) => Ordering::Less,
                (Segment::Text(_), Segment::Number(_)) => Ordering::Greater,
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }

        // Equal prefixes: shorter first, then raw text so Ord agrees with Eq
        left.len()
            .cmp(&right.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for BuildId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
