//! Markdown review report, ready to paste as a job group comment

use std::fmt::Write;

use chrono::Local;
use openqa_review_core::classify::{Category, Classification};
use openqa_review_core::review::{BuildReview, StatusBadge, VariantReview};

use super::build_label;

/// Section title and the categories listed under it, in report order
const SECTIONS: &[(&str, Category)] = &[
    ("New Product bugs", Category::NewProductIssue),
    ("Existing Product bugs", Category::KnownIssue),
    ("New openQA-issues", Category::NewOpenqaIssue),
    ("Common issues", Category::CommonIssue),
    ("Fixed issues", Category::FixedIssue),
    ("TODO: review", Category::Unclassified),
];

fn badge(status: StatusBadge) -> &'static str {
    match status {
        StatusBadge::Green => "<font color=\"green\">Green</font>",
        StatusBadge::Amber => "<font color=\"#FFBF00\">Amber</font>",
        StatusBadge::Red => "<font color=\"red\">Red</font>",
    }
}

pub fn render(review: &BuildReview, verbose: bool) -> String {
    let mut out = String::new();
    let now = Local::now().format("%Y-%m-%d - %H:%M");

    let _ = writeln!(out, "**Date:** {}  ", now);
    let _ = writeln!(out, "**Build:** {}", build_label(review));
    out.push('\n');
    out.push_str("**Common issues:**\n");
    out.push_str(&common_issues(review));
    out.push_str("\n<hr>\n");

    let variants: Vec<String> = review
        .variants
        .iter()
        .map(|v| render_variant(v, verbose))
        .collect();
    out.push_str(&variants.join("<hr>\n"));

    for skipped in &review.skipped {
        let _ = writeln!(
            out,
            "\n**Arch:** {} not reviewed: {}",
            skipped.variant, skipped.reason
        );
    }
    out
}

fn common_issues(review: &BuildReview) -> String {
    let mut lines = Vec::new();
    if !review.missing_variants.is_empty() {
        lines.push(format!(
            "* **Missing architectures**: {}",
            review.missing_variants.join(", ")
        ));
    }
    for issue in &review.common_issues {
        lines.push(format!(
            "* {} ({}): {}",
            issue.module,
            issue.category,
            issue.architectures.join(", ")
        ));
    }

    if lines.is_empty() {
        "None\n".to_string()
    } else {
        lines.join("\n") + "\n"
    }
}

/// Report for one architecture/flavor
pub fn render_variant(variant: &VariantReview, verbose: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n**Arch:** {}  ", variant.variant);
    let _ = writeln!(out, "**Status: {}**", badge(variant.status));

    let changes: Vec<String> = variant
        .outcome_deltas
        .iter()
        .filter(|(_, delta)| **delta != 0)
        .map(|(outcome, delta)| format!("{} {:+}", outcome, delta))
        .collect();
    if !changes.is_empty() {
        let _ = writeln!(out, "\n**Changes since last build:** {}", changes.join(", "));
    }

    if variant.classifications.is_empty() {
        out.push_str("\nNo issues.\n");
        return out;
    }

    for (title, category) in SECTIONS {
        let items: Vec<&Classification> = variant.by_category(*category).collect();
        if items.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n**{}:**\n", title);
        for c in items {
            out.push_str(&item_line(c, verbose));
        }
    }
    out
}

fn item_line(c: &Classification, verbose: bool) -> String {
    let mut line = format!("* {}", c.module);
    if c.is_soft_failure() {
        line.push_str(" (soft fail)");
    }
    if let Some(reason) = &c.failure_reason {
        let _ = write!(line, ": {}", reason);
    }
    if !c.architectures.is_empty() && c.promoted_from.is_none() {
        let _ = write!(line, " [also on: {}]", c.architectures.join(", "));
    }
    if let Some(from) = c.promoted_from {
        let _ = write!(line, " [{}]", from);
    }
    line.push('\n');

    if verbose {
        for signal in &c.rationale {
            let _ = writeln!(line, "  * {}", signal);
        }
    }
    line
}
