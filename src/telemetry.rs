use std::sync::Arc;
use std::time::Duration;

/// Structured, in-process event hook for observability.
///
/// This crate is a library; emitting logs directly (e.g. `println!`) is not
/// acceptable for production. Callers provide an implementation that forwards
/// these events to `tracing`, `log`, metrics, or custom sinks.
pub trait ReportEventListener: std::fmt::Debug + Send + Sync + 'static {
    fn on_event(&self, event: ReportEvent);
}

/// Structured events emitted by the report cache.
#[derive(Debug, Clone)]
pub enum ReportEvent {
    /// A fresh cached dataset was served without recomputation.
    CacheHit { key: String },
    /// The entry was armed (absent or expired) and a generation started.
    GenerationStarted { key: String },
    GenerationSucceeded { key: String, rows: usize, duration: Duration },
    /// The entry was rearmed; the next call retries instead of replaying
    /// this error.
    GenerationFailed { key: String, error: String },
    /// A caller joined an in-flight generation instead of starting its own.
    WaitedForFlight { key: String },
}

#[derive(Debug)]
pub struct NoopEventListener;

impl ReportEventListener for NoopEventListener {
    #[inline]
    fn on_event(&self, _event: ReportEvent) {}
}

pub fn noop_event_listener() -> Arc<dyn ReportEventListener> {
    Arc::new(NoopEventListener)
}

/// Metrics instrumentation built on the `metrics` facade.
///
/// Recording is effectively a no-op until the embedding process installs a
/// recorder, so the library stays silent by default.
pub mod report_metrics {
    use super::*;
    use ::metrics::{describe_counter, describe_gauge, describe_histogram, Unit};

    // Counters are exposed as `<name>_total` by Prometheus-style exporters.

    pub const CACHE_HITS: &str = "epiview_report_cache_hits";
    pub const CACHE_MISSES: &str = "epiview_report_cache_misses";
    pub const GENERATION_FAILURES: &str = "epiview_report_generation_failures";
    pub const GENERATION_DURATION_SECONDS: &str = "epiview_report_generation_duration_seconds";
    pub const CACHED_ROWS: &str = "epiview_report_cached_rows";

    #[inline]
    pub fn record_cache_hit() {
        ::metrics::counter!(CACHE_HITS).increment(1);
    }

    #[inline]
    pub fn record_cache_miss() {
        ::metrics::counter!(CACHE_MISSES).increment(1);
    }

    #[inline]
    pub fn record_generation(duration: Duration, rows: u64) {
        ::metrics::histogram!(GENERATION_DURATION_SECONDS).record(duration.as_secs_f64());
        ::metrics::gauge!(CACHED_ROWS).set(rows as f64);
    }

    #[inline]
    pub fn record_generation_failure() {
        ::metrics::counter!(GENERATION_FAILURES).increment(1);
    }

    /// Registers descriptions for all metrics this crate records. Call once
    /// after installing a recorder.
    pub fn describe_all() {
        describe_counter!(
            CACHE_HITS,
            Unit::Count,
            "Report requests served from a fresh cached dataset."
        );
        describe_counter!(
            CACHE_MISSES,
            Unit::Count,
            "Report requests that armed the entry and ran the generator."
        );
        describe_counter!(
            GENERATION_FAILURES,
            Unit::Count,
            "Generator executions that returned an error (entry rearmed)."
        );
        describe_histogram!(
            GENERATION_DURATION_SECONDS,
            Unit::Seconds,
            "Wall time of a single generator execution."
        );
        describe_gauge!(
            CACHED_ROWS,
            Unit::Count,
            "Row count of the most recently generated dataset."
        );
    }
}
