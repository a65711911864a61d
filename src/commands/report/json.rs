//! JSON output for the report command

use openqa_review_core::catalog::IngestFailure;
use openqa_review_core::error::Result;
use openqa_review_core::review::BuildReview;
use serde::Serialize;

#[derive(Serialize)]
struct ReportOutput<'a> {
    #[serde(flatten)]
    review: &'a BuildReview,
    ingest_failures: &'a [IngestFailure],
}

pub fn output(review: &BuildReview, failures: &[IngestFailure]) -> Result<()> {
    let output = ReportOutput {
        review,
        ingest_failures: failures,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
