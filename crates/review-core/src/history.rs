//! Previous-build resolution
//!
//! "Previous" means the nearest lower build of the same job group, flavor and
//! architecture, never merely the next lower identifier. The lookup itself is
//! supplied by whoever holds the build data; candidates it returns are
//! validated here and ambiguity is an error rather than a guess.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ReviewError, Result};
use crate::model::{Build, BuildId, BuildKey};

/// Source of predecessor candidates, implemented by the data collaborator
pub trait PreviousBuildLookup {
    /// Builds that may precede `current`; may over-approximate
    fn previous_candidates(&self, current: &BuildKey) -> Vec<BuildKey>;
}

/// Resolve the predecessor of `current`
///
/// Explicit ancestors listed on the build win over identifier order. Returns
/// `Ok(None)` for the first build of a variant.
pub fn resolve_previous(
    lookup: &dyn PreviousBuildLookup,
    current: &Build,
) -> Result<Option<BuildKey>> {
    let key = current.key();
    let candidates: Vec<BuildKey> = lookup
        .previous_candidates(key)
        .into_iter()
        .filter(|candidate| {
            let valid = candidate.same_variant(key) && candidate.id < key.id;
            if !valid {
                tracing::trace!(current = %key, candidate = %candidate, "ignoring candidate");
            }
            valid
        })
        .collect();

    let chosen = current
        .ancestors()
        .iter()
        .find(|ancestor| candidates.iter().any(|c| &c.id == *ancestor))
        .or_else(|| candidates.iter().map(|c| &c.id).max());

    let Some(chosen) = chosen else {
        tracing::debug!(current = %key, "no previous build");
        return Ok(None);
    };

    let matching: Vec<&BuildKey> = candidates.iter().filter(|c| &c.id == chosen).collect();
    if matching.len() > 1 {
        return Err(ReviewError::AmbiguousPreviousBuild {
            build: key.to_string(),
            candidates: matching.iter().map(|c| c.to_string()).collect(),
        });
    }

    tracing::debug!(current = %key, previous = %chosen, "resolved previous build");
    Ok(matching.first().map(|c| (*c).clone()))
}

fn review_comment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[bB]uild:\**[ \t]*(?:Build)?([\w@.\-]+)")
            .expect("review comment pattern is valid")
    })
}

/// Build id of the most recent review comment, if any
///
/// `comments` are newest first, as shown on a job group page. A review comment
/// carries a `Build: <id>` line, optionally followed by `(reference <id>)`
/// naming the build it was compared against.
pub fn last_reviewed_build<'a, I>(comments: I) -> Option<BuildId>
where
    I: IntoIterator<Item = &'a str>,
{
    comments.into_iter().find_map(|comment| {
        review_comment_pattern()
            .captures(comment)
            .and_then(|caps| caps.get(1))
            .map(|m| BuildId::new(m.as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{build, raw};

    struct FixedLookup(Vec<BuildKey>);

    impl FixedLookup {
        fn new(keys: Vec<BuildKey>) -> Self {
            FixedLookup(keys)
        }
    }

    impl PreviousBuildLookup for FixedLookup {
        fn previous_candidates(&self, _current: &BuildKey) -> Vec<BuildKey> {
            self.0.clone()
        }
    }

    fn key(id: &str, arch: &str) -> BuildKey {
        BuildKey::new(crate::testing::GROUP, None, arch, id)
    }

    #[test]
    fn test_nearest_lower_build_of_same_arch() {
        let current = build("100", "x86_64", vec![]);
        let lookup = FixedLookup::new(vec![
            key("98", "x86_64"),
            key("99", "i586"),
            key("99", "x86_64"),
            key("101", "x86_64"),
        ]);

        let previous = resolve_previous(&lookup, &current).unwrap();
        assert_eq!(previous, Some(key("99", "x86_64")));
    }

    #[test]
    fn test_other_job_group_ignored() {
        let current = build("100", "x86_64", vec![]);
        let lookup = FixedLookup::new(vec![
            BuildKey::new("SLE 12", None, "x86_64", "99"),
            key("97", "x86_64"),
        ]);

        let previous = resolve_previous(&lookup, &current).unwrap();
        assert_eq!(previous, Some(key("97", "x86_64")));
    }

    #[test]
    fn test_first_build_has_no_previous() {
        let current = build("100", "x86_64", vec![]);
        let lookup = FixedLookup::new(vec![key("99", "aarch64")]);
        assert_eq!(resolve_previous(&lookup, &current).unwrap(), None);
    }

    #[test]
    fn test_duplicate_candidates_are_ambiguous() {
        let current = build("100", "x86_64", vec![]);
        let lookup = FixedLookup::new(vec![key("99", "x86_64"), key("99", "x86_64")]);

        let err = resolve_previous(&lookup, &current).unwrap_err();
        assert!(matches!(err, ReviewError::AmbiguousPreviousBuild { .. }));
    }

    #[test]
    fn test_explicit_ancestor_preferred() {
        let mut record = raw("100", "x86_64", vec![]);
        record.ancestors = vec![crate::model::RawId::Text("97".into())];
        let current = Build::load("test", &record).unwrap();
        let lookup = FixedLookup::new(vec![key("99", "x86_64"), key("97", "x86_64")]);

        let previous = resolve_previous(&lookup, &current).unwrap();
        assert_eq!(previous, Some(key("97", "x86_64")));
    }

    #[test]
    fn test_last_reviewed_build() {
        let comments = [
            "Looks fine, nothing to add",
            "**Date:** 2016-04-01 - 10:00\nBuild: 0100 (reference 0098)\n",
            "Build: 0090\n",
        ];
        assert_eq!(
            last_reviewed_build(comments.iter().copied()),
            Some(BuildId::new("0100"))
        );
    }

    #[test]
    fn test_last_reviewed_build_with_prefix_and_markdown() {
        assert_eq!(
            last_reviewed_build(["**Build:** Build1507"]),
            Some(BuildId::new("1507"))
        );
        assert_eq!(last_reviewed_build(["no review here"]), None);
    }
}
