//! openqa-review core library
//!
//! Comparison and classification engine for openQA build reviews: loads build
//! results, diffs them against their predecessor and classifies every failure.

pub mod aggregate;
pub mod cache;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod diff;
pub mod error;
pub mod format;
pub mod history;
pub mod logging;
pub mod model;
pub mod review;
pub mod similarity;

#[cfg(test)]
mod testing;
