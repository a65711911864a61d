use super::*;
use crate::config::SimilarityConfig;
use crate::model::Outcome;
use crate::similarity::EditDistance;
use crate::testing::{build, module, with_needles, with_revision};

fn differ(strategy: &EditDistance) -> Differ<'_> {
    Differ::new(strategy, &SimilarityConfig::default())
}

fn find<'a>(results: &'a [ComparisonResult], name: &str) -> &'a ComparisonResult {
    results
        .iter()
        .find(|r| r.module == name)
        .unwrap_or_else(|| panic!("no result for {name}"))
}

#[test]
fn test_unchanged_failure() {
    let strategy = EditDistance;
    let needles: &[(&str, &[&str])] = &[("inst-vnc-20160301", &["inst"])];
    let prev = build("99", "x86_64", vec![with_needles(module("installer_vnc", "failed"), needles)]);
    let cur = build("100", "x86_64", vec![with_needles(module("installer_vnc", "failed"), needles)]);

    let results = differ(&strategy).compare(&cur, Some(&prev));
    assert_eq!(results.len(), 1);
    let r = &results[0];
    assert_eq!(r.presence, Presence::Both);
    assert!(!r.source_changed);
    assert!(!r.needle_changed);
    assert!(!r.outcome_changed);
    assert_eq!(r.previous_outcome, Some(Outcome::Failed));
}

#[test]
fn test_source_revision_change() {
    let strategy = EditDistance;
    let prev = build("99", "x86_64", vec![with_revision(module("a", "failed"), "r1")]);
    let cur = build("100", "x86_64", vec![with_revision(module("a", "failed"), "r2")]);

    let results = differ(&strategy).compare(&cur, Some(&prev));
    assert!(results[0].source_changed);
}

#[test]
fn test_missing_revision_on_one_side_counts_as_changed() {
    let strategy = EditDistance;
    let mut unknown = module("a", "failed");
    unknown.source_revision = None;
    let prev = build("99", "x86_64", vec![unknown]);
    let cur = build("100", "x86_64", vec![module("a", "failed")]);

    assert!(differ(&strategy).compare(&cur, Some(&prev))[0].source_changed);
}

#[test]
fn test_retagged_needle_is_a_change() {
    let strategy = EditDistance;
    let prev = build(
        "99",
        "x86_64",
        vec![with_needles(module("a", "failed"), &[("n1", &["x"])])],
    );
    let cur = build(
        "100",
        "x86_64",
        vec![with_needles(module("a", "failed"), &[("n1", &["x", "y"])])],
    );

    let r = &differ(&strategy).compare(&cur, Some(&prev))[0];
    assert!(r.needle_changed);
    assert_eq!(r.needles.retagged, vec!["n1"]);
}

#[test]
fn test_needle_rename_is_soft_signal_and_still_changed() {
    let strategy = EditDistance;
    let prev = build(
        "99",
        "x86_64",
        vec![with_needles(module("a", "failed"), &[("inst-welcome-20160301", &["w"])])],
    );
    let cur = build(
        "100",
        "x86_64",
        vec![with_needles(module("a", "failed"), &[("inst-welcome-20160405", &["w"])])],
    );

    let r = &differ(&strategy).compare(&cur, Some(&prev))[0];
    assert!(r.needle_changed, "a rename must not look unchanged");
    assert_eq!(r.needles.renames.len(), 1);
    assert_eq!(r.needles.renames[0].from, "inst-welcome-20160301");
    assert_eq!(r.needles.renames[0].to, "inst-welcome-20160405");
    assert!(r.needle_rename_score.unwrap() > 0.8);
}

#[test]
fn test_unrelated_needles_are_not_renames() {
    let strategy = EditDistance;
    let prev = build(
        "99",
        "x86_64",
        vec![with_needles(module("a", "failed"), &[("grub2", &[])])],
    );
    let cur = build(
        "100",
        "x86_64",
        vec![with_needles(module("a", "failed"), &[("desktop-runner", &[])])],
    );

    let r = &differ(&strategy).compare(&cur, Some(&prev))[0];
    assert!(r.needle_changed);
    assert!(r.needles.renames.is_empty());
    assert_eq!(r.needle_rename_score, None);
}

#[test]
fn test_first_build_reports_everything_new_and_changed() {
    let strategy = EditDistance;
    let cur = build(
        "1",
        "x86_64",
        vec![module("bootloader", "passed"), module("x", "failed")],
    );

    let results = differ(&strategy).compare(&cur, None);
    assert_eq!(results.len(), 2);
    for r in &results {
        assert_eq!(r.presence, Presence::New);
        assert!(r.source_changed);
        assert!(r.needle_changed);
        assert_eq!(r.previous_outcome, None);
    }
    assert!(!find(&results, "bootloader").outcome_changed);
    assert!(find(&results, "x").outcome_changed);
}

#[test]
fn test_new_module_with_known_inputs() {
    let strategy = EditDistance;
    let needles: &[(&str, &[&str])] = &[("desktop", &["d"])];
    let prev = build("99", "x86_64", vec![with_needles(module("a", "passed"), needles)]);
    let cur = build(
        "100",
        "x86_64",
        vec![
            with_needles(module("a", "passed"), needles),
            with_needles(module("x", "failed"), needles),
        ],
    );

    let results = differ(&strategy).compare(&cur, Some(&prev));
    let x = find(&results, "x");
    assert_eq!(x.presence, Presence::New);
    assert!(!x.source_changed);
    assert!(!x.needle_changed);
    assert!(x.outcome_changed);
}

#[test]
fn test_new_module_with_unseen_revision() {
    let strategy = EditDistance;
    let prev = build("99", "x86_64", vec![module("a", "passed")]);
    let cur = build(
        "100",
        "x86_64",
        vec![module("a", "passed"), with_revision(module("x", "failed"), "rev-2")],
    );

    let x = find(&differ(&strategy).compare(&cur, Some(&prev)), "x").clone();
    assert!(x.source_changed);
}

#[test]
fn test_removed_and_renamed_modules() {
    let strategy = EditDistance;
    let prev = build(
        "99",
        "x86_64",
        vec![
            module("yast2_lan", "failed"),
            module("zypper_lr", "failed"),
        ],
    );
    let cur = build("100", "x86_64", vec![module("yast2_lan_restart", "failed")]);

    let config = SimilarityConfig {
        module_rename_threshold: 0.5,
        ..Default::default()
    };
    let results = Differ::new(&strategy, &config).compare(&cur, Some(&prev));
    let names: Vec<_> = results.iter().map(|r| r.module.as_str()).collect();
    assert_eq!(names, vec!["yast2_lan_restart", "yast2_lan", "zypper_lr"]);

    let renamed = find(&results, "yast2_lan");
    assert_eq!(renamed.presence, Presence::Removed);
    assert!(!renamed.is_confirmed_removal());
    assert_eq!(
        renamed.module_rename.as_ref().unwrap().to,
        "yast2_lan_restart"
    );

    let successor = find(&results, "yast2_lan_restart");
    assert_eq!(successor.module_rename.as_ref().unwrap().from, "yast2_lan");

    assert!(find(&results, "zypper_lr").is_confirmed_removal());
}

#[test]
fn test_renamed_module_carries_predecessor_outcome() {
    let strategy = EditDistance;
    let prev = build("99", "x86_64", vec![module("yast2_lan", "failed")]);
    let cur = build("100", "x86_64", vec![module("yast2_lan_restart", "passed")]);

    let config = SimilarityConfig {
        module_rename_threshold: 0.5,
        ..Default::default()
    };
    let results = Differ::new(&strategy, &config).compare(&cur, Some(&prev));

    let successor = find(&results, "yast2_lan_restart");
    assert_eq!(successor.presence, Presence::New);
    assert_eq!(successor.previous_outcome, Some(Outcome::Failed));
    assert!(successor.outcome_changed);

    let verdicts = crate::classify::Classifier::new().classify_all(&results);
    assert_eq!(verdicts.len(), 1);
    assert_eq!(verdicts[0].module, "yast2_lan_restart");
    assert_eq!(verdicts[0].category, crate::classify::Category::FixedIssue);
}

#[test]
fn test_compare_is_deterministic() {
    let strategy = EditDistance;
    let prev = build(
        "99",
        "x86_64",
        vec![
            with_needles(module("a", "failed"), &[("n-1", &[]), ("n-2", &[])]),
            module("gone", "failed"),
        ],
    );
    let cur = build(
        "100",
        "x86_64",
        vec![
            with_needles(module("a", "failed"), &[("n-3", &[]), ("n-1", &["t"])]),
            module("fresh", "failed"),
        ],
    );

    let d = differ(&strategy);
    let first = d.compare(&cur, Some(&prev));
    let second = d.compare(&cur, Some(&prev));
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
