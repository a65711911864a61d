use super::edit::levenshtein;
use super::*;

#[test]
fn test_levenshtein_basics() {
    assert_eq!(levenshtein("", ""), 0);
    assert_eq!(levenshtein("abc", ""), 3);
    assert_eq!(levenshtein("kitten", "sitting"), 3);
    assert_eq!(levenshtein("bootloader", "bootloader"), 0);
}

#[test]
fn test_edit_distance_identical_and_disjoint() {
    let s = EditDistance;
    assert_eq!(s.similarity("yast2_lan", "yast2_lan"), 1.0);
    assert_eq!(s.similarity("", ""), 1.0);
    assert_eq!(s.similarity("abc", "xyz"), 0.0);
}

#[test]
fn test_edit_distance_needle_rerecording() {
    let s = EditDistance;
    let score = s.similarity("inst-welcome-20160301", "inst-welcome-20160405");
    assert!(score > 0.8, "re-recorded needle should look similar, got {score}");
}

#[test]
fn test_token_overlap_ignores_dates() {
    let s = TokenOverlap;
    assert_eq!(
        s.similarity("inst-welcome-20160301", "inst-welcome-20160405"),
        1.0
    );
    let partial = s.similarity("inst-welcome-gnome", "inst-welcome-kde");
    assert!((partial - 0.5).abs() < 1e-9);
}

#[test]
fn test_token_overlap_symmetric() {
    let s = TokenOverlap;
    assert_eq!(
        s.similarity("desktop-runner", "runner-x11"),
        s.similarity("runner-x11", "desktop-runner")
    );
}

#[test]
fn test_tokenize_splits_on_punctuation() {
    assert_eq!(
        tokenize("Inst_Welcome-20160301"),
        vec!["inst", "welcome", "20160301"]
    );
}

#[test]
fn test_best_match_respects_threshold() {
    let s = EditDistance;
    let candidates = ["yast2_lan_restart", "zypper_up"];
    assert_eq!(
        best_match(&s, "yast2_lan", candidates.iter().copied(), 0.99),
        None
    );
    let (name, score) = best_match(&s, "yast2_lan", candidates.iter().copied(), 0.5).unwrap();
    assert_eq!(name, "yast2_lan_restart");
    assert!(score >= 0.5);
}

#[test]
fn test_best_match_tie_is_order_independent() {
    let s = EditDistance;
    let forward = best_match(&s, "abc", ["abx", "aby"].iter().copied(), 0.0);
    let backward = best_match(&s, "abc", ["aby", "abx"].iter().copied(), 0.0);
    assert_eq!(forward, backward);
    assert_eq!(forward.unwrap().0, "abx");
}

#[test]
fn test_strategy_kind_builds_named_strategy() {
    assert_eq!(StrategyKind::EditDistance.build().name(), "edit-distance");
    assert_eq!(StrategyKind::TokenOverlap.build().name(), "token-overlap");
}
