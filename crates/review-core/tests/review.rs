//! End-to-end tests for the comparison and classification engine

use openqa_review_core::aggregate::{Aggregator, VariantClassifications};
use openqa_review_core::catalog::BuildCatalog;
use openqa_review_core::classify::{Category, Classifier};
use openqa_review_core::config::{AggregationConfig, ReviewConfig, SimilarityConfig};
use openqa_review_core::diff::Differ;
use openqa_review_core::error::ReviewError;
use openqa_review_core::model::{Build, BuildId, RawBuild, RawId, RawModule, RawNeedle};
use openqa_review_core::review::Reviewer;
use openqa_review_core::similarity::EditDistance;

const GROUP: &str = "openSUSE Tumbleweed";

fn module(name: &str, outcome: &str) -> RawModule {
    RawModule {
        name: Some(name.to_string()),
        outcome: Some(outcome.to_string()),
        source_revision: Some("abc123".to_string()),
        needles: vec![RawNeedle {
            name: Some(format!("{}-screen", name)),
            tags: vec![format!("ENV-{}", name)],
        }],
        failure_reason: None,
    }
}

fn raw(id: &str, arch: &str, modules: Vec<RawModule>) -> RawBuild {
    RawBuild {
        id: Some(RawId::Text(id.to_string())),
        job_group: Some(GROUP.to_string()),
        arch: Some(arch.to_string()),
        modules,
        ..Default::default()
    }
}

fn build(id: &str, arch: &str, modules: Vec<RawModule>) -> Build {
    Build::load("test", &raw(id, arch, modules)).unwrap()
}

fn classify_pair(current: &Build, previous: Option<&Build>) -> Vec<(String, Category)> {
    let strategy = EditDistance;
    let comparisons = Differ::new(&strategy, &SimilarityConfig::default()).compare(current, previous);
    Classifier::new()
        .classify_all(&comparisons)
        .into_iter()
        .map(|c| (c.module, c.category))
        .collect()
}

#[test]
fn test_still_failing_unchanged_is_known_issue() {
    let previous = build("99", "x86_64", vec![module("installer_vnc", "failed")]);
    let current = build("100", "x86_64", vec![module("installer_vnc", "failed")]);

    assert_eq!(
        classify_pair(&current, Some(&previous)),
        vec![("installer_vnc".to_string(), Category::KnownIssue)]
    );
}

#[test]
fn test_regression_is_new_product_issue() {
    let previous = build("99", "x86_64", vec![module("installer_vnc", "passed")]);
    let current = build("100", "x86_64", vec![module("installer_vnc", "failed")]);

    assert_eq!(
        classify_pair(&current, Some(&previous)),
        vec![("installer_vnc".to_string(), Category::NewProductIssue)]
    );
}

#[test]
fn test_passing_after_failure_is_fixed() {
    let previous = build("99", "x86_64", vec![module("bootloader", "failed")]);
    let current = build("100", "x86_64", vec![module("bootloader", "passed")]);

    assert_eq!(
        classify_pair(&current, Some(&previous)),
        vec![("bootloader".to_string(), Category::FixedIssue)]
    );
}

#[test]
fn test_failure_on_every_arch_becomes_common_issue() {
    let mut records = Vec::new();
    for arch in ["x86_64", "i586", "aarch64"] {
        records.push(raw("99", arch, vec![module("yast2_lan", "passed")]));
        records.push(raw("100", arch, vec![module("yast2_lan", "failed")]));
    }
    let (catalog, failures) = BuildCatalog::ingest(
        records
            .into_iter()
            .enumerate()
            .map(|(i, r)| (format!("{}.json", i), Ok::<_, ReviewError>(r))),
    );
    assert!(failures.is_empty());

    let review = Reviewer::new(ReviewConfig::default())
        .review_build(&catalog, GROUP, &BuildId::new("100"))
        .unwrap();

    assert_eq!(review.common_issues.len(), 1);
    let common = &review.common_issues[0];
    assert_eq!(common.module, "yast2_lan");
    assert_eq!(common.category, Category::NewProductIssue);
    assert_eq!(common.architectures, vec!["aarch64", "i586", "x86_64"]);

    let labels: Vec<_> = review.variants.iter().map(|v| v.variant.as_str()).collect();
    assert_eq!(labels, vec!["aarch64", "i586", "x86_64"]);
    for variant in &review.variants {
        assert_eq!(variant.classifications[0].category, Category::CommonIssue);
    }
}

#[test]
fn test_new_module_without_input_changes_is_new_openqa_issue() {
    let previous = build("99", "x86_64", vec![module("bootloader", "passed")]);
    let mut x = module("x", "failed");
    x.needles.clear();
    let current = build("100", "x86_64", vec![module("bootloader", "passed"), x]);

    assert_eq!(
        classify_pair(&current, Some(&previous)),
        vec![("x".to_string(), Category::NewOpenqaIssue)]
    );
}

#[test]
fn test_first_build_never_known_or_fixed() {
    let current = build(
        "1",
        "x86_64",
        vec![
            module("a", "failed"),
            module("b", "passed"),
            module("c", "softfailed"),
            module("d", "incomplete"),
        ],
    );

    let verdicts = classify_pair(&current, None);
    assert_eq!(verdicts.len(), 3);
    for (_, category) in verdicts {
        assert_ne!(category, Category::KnownIssue);
        assert_ne!(category, Category::FixedIssue);
    }
}

#[test]
fn test_repeated_runs_are_identical() {
    let previous = build(
        "99",
        "x86_64",
        vec![
            module("bootloader", "failed"),
            module("installer_vnc", "passed"),
            module("old_module", "failed"),
        ],
    );
    let current = build(
        "100",
        "x86_64",
        vec![
            module("installer_vnc", "failed"),
            module("bootloader", "passed"),
            module("yast2_lan", "softfailed"),
        ],
    );

    let strategy = EditDistance;
    let differ = Differ::new(&strategy, &SimilarityConfig::default());
    let first = differ.compare(&current, Some(&previous));
    let second = differ.compare(&current, Some(&previous));
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );

    let classifier = Classifier::new();
    assert_eq!(classifier.classify_all(&first), classifier.classify_all(&second));
}

#[test]
fn test_classifications_follow_current_build_order() {
    let previous = build(
        "99",
        "x86_64",
        vec![module("a", "passed"), module("b", "failed"), module("c", "passed")],
    );
    let current = build(
        "100",
        "x86_64",
        vec![module("c", "failed"), module("b", "passed"), module("a", "failed")],
    );

    let names: Vec<_> = classify_pair(&current, Some(&previous))
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(names, vec!["c", "b", "a"]);
}

#[test]
fn test_aggregation_ignores_input_order() {
    let reviewer = Reviewer::new(ReviewConfig::default());
    let per_arch: Vec<VariantClassifications> = ["x86_64", "i586", "aarch64", "s390x"]
        .iter()
        .map(|arch| {
            let current = build("100", arch, vec![module("m", "failed")]);
            let prev = build("99", arch, vec![module("m", "passed")]);
            let review = reviewer.review_variant(&current, Some(&prev), None);
            VariantClassifications {
                variant: review.variant,
                classifications: review.classifications,
            }
        })
        .collect();

    let aggregator = Aggregator::new(&AggregationConfig::default());
    let forward = aggregator.aggregate(&per_arch);
    let mut reversed = per_arch.clone();
    reversed.reverse();
    let backward = aggregator.aggregate(&reversed);

    assert_eq!(forward, backward);
    assert_eq!(
        forward.common_issues[0].architectures,
        vec!["aarch64", "i586", "s390x", "x86_64"]
    );
}

#[test]
fn test_malformed_build_does_not_block_siblings() {
    let mut broken = raw("100", "i586", vec![module("m", "failed")]);
    broken.modules[0].outcome = None;
    let records: Vec<(&str, Result<RawBuild, ReviewError>)> = vec![
        ("x86_64-99.json", Ok(raw("99", "x86_64", vec![module("m", "passed")]))),
        ("x86_64-100.json", Ok(raw("100", "x86_64", vec![module("m", "failed")]))),
        ("i586-100.json", Ok(broken)),
    ];

    let (catalog, failures) = BuildCatalog::ingest(records);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].source, "i586-100.json");

    let review = Reviewer::new(ReviewConfig::default())
        .review_build(&catalog, GROUP, &BuildId::new("100"))
        .unwrap();
    assert_eq!(review.variants.len(), 1);
    assert_eq!(
        review.variants[0].classifications[0].category,
        Category::NewProductIssue
    );
}

#[test]
fn test_ambiguous_previous_build_fails_loudly() {
    let records: Vec<(&str, Result<RawBuild, ReviewError>)> = vec![
        ("a.json", Ok(raw("99", "x86_64", vec![module("m", "failed")]))),
        ("b.json", Ok(raw("99", "x86_64", vec![module("m", "passed")]))),
        ("c.json", Ok(raw("100", "x86_64", vec![module("m", "failed")]))),
    ];
    let (catalog, _) = BuildCatalog::ingest(records);
    let current = catalog.variants_of(GROUP, &BuildId::new("100"))[0];

    let err = openqa_review_core::history::resolve_previous(&catalog, current).unwrap_err();
    assert!(matches!(err, ReviewError::AmbiguousPreviousBuild { .. }));
}
