//! CLI commands for openqa-review

pub mod cache;
pub mod compare;
pub mod dispatch;
pub mod input;
pub mod report;
