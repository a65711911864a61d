use openqa_review_core::config::AggregationMode;
use openqa_review_core::format::OutputFormat;
use openqa_review_core::model::BuildId;

/// Parse output format from string
pub fn parse_format(s: &str) -> std::result::Result<OutputFormat, String> {
    s.parse::<OutputFormat>().map_err(|e| e.to_string())
}

/// Parse aggregation mode from string
pub fn parse_mode(s: &str) -> std::result::Result<AggregationMode, String> {
    s.parse::<AggregationMode>().map_err(|e| e.to_string())
}

/// Parse build identifier, rejecting empty ones
pub fn parse_build_id(s: &str) -> std::result::Result<BuildId, String> {
    let id = BuildId::new(s.trim());
    if id.is_empty() {
        return Err("build id must not be empty".to_string());
    }
    Ok(id)
}
