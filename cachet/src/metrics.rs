//! Metrics declaration and recording helpers.
//!
//! With the `metrics` feature disabled every helper is an empty inline
//! function.

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

use crate::status::CacheStatus;

#[cfg(feature = "metrics")]
lazy_static! {
    /// Track number of cache hit events.
    pub static ref CACHE_HIT_COUNTER: &'static str = {
        metrics::describe_counter!(
            "cachet_cache_hit_total",
            "Total number of requests served from the cache."
        );
        "cachet_cache_hit_total"
    };
    /// Track number of cache miss events.
    pub static ref CACHE_MISS_COUNTER: &'static str = {
        metrics::describe_counter!(
            "cachet_cache_miss_total",
            "Total number of cacheable requests forwarded upstream."
        );
        "cachet_cache_miss_total"
    };
    /// Track number of requests that bypassed the cache.
    pub static ref CACHE_BYPASS_COUNTER: &'static str = {
        metrics::describe_counter!(
            "cachet_cache_bypass_total",
            "Total number of requests not eligible for caching."
        );
        "cachet_cache_bypass_total"
    };
    /// Track backend failures by operation.
    pub static ref BACKEND_ERROR_COUNTER: &'static str = {
        metrics::describe_counter!(
            "cachet_backend_error_total",
            "Total number of failed backend reads and writes."
        );
        "cachet_backend_error_total"
    };
    /// Gauge of writes not yet settled.
    pub static ref WRITE_QUEUE_PENDING: &'static str = {
        metrics::describe_gauge!(
            "cachet_write_queue_pending",
            "Number of cache writes that have not settled yet."
        );
        "cachet_write_queue_pending"
    };
}

/// Count a request outcome.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_status(status: CacheStatus) {
    let counter = match status {
        CacheStatus::Hit => *CACHE_HIT_COUNTER,
        CacheStatus::Miss => *CACHE_MISS_COUNTER,
        CacheStatus::Bypass => *CACHE_BYPASS_COUNTER,
    };
    metrics::counter!(counter).increment(1);
}

/// No-op without the `metrics` feature.
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_status(_status: CacheStatus) {}

/// Count a backend failure. `operation` is `get` or `set`.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_backend_error(operation: &'static str) {
    metrics::counter!(*BACKEND_ERROR_COUNTER, "operation" => operation).increment(1);
}

/// No-op without the `metrics` feature.
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_backend_error(_operation: &'static str) {}

/// Publish the number of pending writes.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_pending_writes(pending: usize) {
    metrics::gauge!(*WRITE_QUEUE_PENDING).set(pending as f64);
}

/// No-op without the `metrics` feature.
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_pending_writes(_pending: usize) {}
