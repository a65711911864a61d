//! Tracing setup and cache counters
//!
//! Log output always goes to stderr so that stdout carries only the report.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding filter directives, checked before `RUST_LOG`
pub const LOG_ENV: &str = "OPENQA_REVIEW_LOG";

/// Lookup and invalidation counters of one build cache
///
/// Counters are atomic, so `BuildCache::get` can record through `&self`.
#[derive(Debug, Default)]
pub struct CacheMetrics {
    hits: AtomicU64,
    misses: AtomicU64,
    invalidations: AtomicU64,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cache_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Count entries dropped by one invalidation
    pub fn record_invalidations(&self, count: u64) {
        self.invalidations.fetch_add(count, Ordering::Relaxed);
    }

    pub fn cache_hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn invalidations(&self) -> u64 {
        self.invalidations.load(Ordering::Relaxed)
    }

    /// Hits as a percentage of lookups; 0 before the first lookup
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.cache_hits() + self.cache_misses();
        if lookups == 0 {
            return 0.0;
        }
        self.cache_hits() as f64 * 100.0 / lookups as f64
    }
}

/// Emit a cache's counters as one debug event.
///
/// ```rust,ignore
/// log_cache_metrics!(cache.metrics(), "save_builds");
/// ```
#[macro_export]
macro_rules! log_cache_metrics {
    ($metrics:expr, $operation:expr) => {
        tracing::debug!(
            operation = $operation,
            hits = $metrics.cache_hits(),
            misses = $metrics.cache_misses(),
            hit_rate = $metrics.hit_rate(),
            invalidations = $metrics.invalidations(),
            "cache_metrics"
        );
    };
}

/// Trace the time elapsed since `$start`, with optional extra fields.
///
/// ```rust,ignore
/// trace_time!(start, "review_build", variants = reviews.len());
/// ```
#[macro_export]
macro_rules! trace_time {
    ($start:expr, $name:expr) => {
        tracing::trace!(elapsed = ?$start.elapsed(), $name);
    };
    ($start:expr, $name:expr $(, $field:ident = $value:expr)*) => {
        tracing::trace!(elapsed = ?$start.elapsed(), $($field = $value),*, $name);
    };
}

/// Install the global subscriber
///
/// `--log-level` wins over `--verbose`; both lose to `OPENQA_REVIEW_LOG` and
/// `RUST_LOG`. The default only lets warnings through.
pub fn init_tracing(
    verbose: bool,
    log_level: Option<&str>,
    log_json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = env_filter(verbose, log_level);
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false);
    let registry = tracing_subscriber::registry().with(filter);

    if log_json {
        registry.with(layer.json()).try_init()?;
    } else {
        registry.with(layer.compact()).try_init()?;
    }
    Ok(())
}

fn env_filter(verbose: bool, log_level: Option<&str>) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return filter;
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let level = log_level.unwrap_or(if verbose { "debug" } else { "warn" });
    EnvFilter::new(directives(level))
}

/// A bare level applies to both crates of the workspace; anything with `=`
/// is taken as a full directive list
fn directives(level: &str) -> String {
    if level.contains('=') {
        level.to_string()
    } else {
        format!("openqa_review={level},openqa_review_core={level}")
    }
}
