//! Records output for the report command
//!
//! One line per fact:
//! - `H` header
//! - `V` variant status and outcome changes
//! - `C` classification, `R` its rationale
//! - `G` common issue
//! - `S` skipped variant, `E` record that failed to load

use openqa_review_core::catalog::IngestFailure;
use openqa_review_core::format::{escape_quotes, records_header};
use openqa_review_core::review::{BuildReview, VariantReview};

pub fn output(review: &BuildReview, failures: &[IngestFailure]) {
    for line in lines(review, failures) {
        println!("{}", line);
    }
}

pub fn lines(review: &BuildReview, failures: &[IngestFailure]) -> Vec<String> {
    let mut fields = vec![
        ("group", review.job_group.clone()),
        ("build", review.build.to_string()),
    ];
    if let Some(reference) = &review.reference {
        fields.push(("reference", reference.to_string()));
    }
    fields.push(("variants", review.variants.len().to_string()));
    fields.push(("common", review.common_issues.len().to_string()));
    if !review.missing_variants.is_empty() {
        fields.push(("missing", review.missing_variants.join(",")));
    }

    let mut lines = vec![records_header("report", &fields)];
    for issue in &review.common_issues {
        lines.push(format!(
            "G {} {} archs={}",
            issue.module,
            issue.category,
            issue.architectures.join(",")
        ));
    }
    for variant in &review.variants {
        lines.extend(variant_lines(variant));
    }
    for skipped in &review.skipped {
        lines.push(format!(
            "S {} \"{}\"",
            skipped.variant,
            escape_quotes(&skipped.reason)
        ));
    }
    for failure in failures {
        lines.push(format!(
            "E {} \"{}\"",
            failure.source,
            escape_quotes(&failure.reason)
        ));
    }
    lines
}

pub fn variant_lines(variant: &VariantReview) -> Vec<String> {
    let mut line = format!("V {} status={}", variant.variant, variant.status);
    match &variant.previous {
        Some(previous) => line.push_str(&format!(" previous={}", previous)),
        None => line.push_str(" previous=-"),
    }
    for (outcome, delta) in &variant.outcome_deltas {
        line.push_str(&format!(" {}={:+}", outcome, delta));
    }

    let mut lines = vec![line];
    for c in &variant.classifications {
        let outcome = c
            .outcome
            .map(|o| o.to_string())
            .unwrap_or_else(|| "-".to_string());
        let mut line = format!(
            "C {} {} {} outcome={}",
            variant.variant, c.module, c.category, outcome
        );
        if !c.architectures.is_empty() {
            line.push_str(&format!(" archs={}", c.architectures.join(",")));
        }
        if let Some(from) = c.promoted_from {
            line.push_str(&format!(" promoted_from={}", from));
        }
        lines.push(line);

        let rationale: Vec<String> = c.rationale.iter().map(|s| s.to_string()).collect();
        lines.push(format!(
            "R {} {} \"{}\"",
            variant.variant,
            c.module,
            escape_quotes(&rationale.join("; "))
        ));
    }
    lines
}
