//! Report cache: key-to-dataset memoization with per-entry TTL and a
//! single-flight execution gate, so repeated requests for the same derived
//! view are served from memory and concurrent first requests collapse into
//! one generator run.

use crate::dataset::Dataset;
use crate::error::ReportError;
use crate::telemetry::{noop_event_listener, report_metrics, ReportEvent, ReportEventListener};

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

/// Configuration options for the report cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long a generated dataset stays fresh, measured from the moment the
    /// entry is armed.
    pub ttl: Duration,
    /// Structured event hook for observability (no-op by default).
    pub event_listener: Arc<dyn ReportEventListener>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            ttl: crate::DEFAULT_REPORT_TTL,
            event_listener: noop_event_listener(),
        }
    }
}

/// One in-flight generation, shared between the caller that runs the
/// generator and every caller that arrived while it was running. The result
/// is broadcast to all of them; each receives its own clone.
#[derive(Debug, Default)]
struct Flight {
    result: Mutex<Option<Result<Dataset, ReportError>>>,
    done: Condvar,
}

impl Flight {
    fn wait(&self) -> Result<Dataset, ReportError> {
        let mut guard = self.result.lock()?;
        loop {
            if let Some(result) = guard.as_ref() {
                return result.clone();
            }
            guard = self.done.wait(guard)?;
        }
    }

    fn complete(&self, result: Result<Dataset, ReportError>) {
        // A poisoned result slot means a waiter panicked while reading; the
        // remaining waiters will surface the poison as a LockError instead of
        // hanging, so there is nothing useful to do with the error here.
        if let Ok(mut guard) = self.result.lock() {
            *guard = Some(result);
        }
        self.done.notify_all();
    }
}

#[derive(Debug, Default)]
struct EntryInner {
    /// Last successfully generated dataset; `None` until the first success
    /// and after every rearm.
    value: Option<Dataset>,
    /// Freshness deadline, set when the entry is armed.
    expires_at: Option<Instant>,
    /// The gate: `Some` while a generation is running for this entry.
    flight: Option<Arc<Flight>>,
}

/// One cache slot. The entry-level lock is held only for bookkeeping; the
/// generator itself runs outside of it.
#[derive(Debug, Default)]
struct CacheEntry {
    inner: Mutex<EntryInner>,
}

/// Process-wide cache of generated report datasets, keyed by view name.
///
/// Entries expire after the configured TTL. Each entry guarantees at most one
/// concurrent generator execution: under N concurrent first-callers the
/// generator runs exactly once and all N observe its result. Successful
/// results are stored and handed out as independent clones, so callers may
/// filter, accumulate, or extend what they receive without affecting the
/// cached master. A failed generation rearms the entry immediately; the error
/// is never cached.
#[derive(Debug)]
pub struct ReportCache {
    entries: Mutex<HashMap<String, Arc<CacheEntry>>>,
    config: CacheConfig,
}

impl ReportCache {
    /// Creates a cache with the given TTL and default configuration.
    pub fn new(ttl: Duration) -> Self {
        Self::with_config(CacheConfig {
            ttl,
            ..CacheConfig::default()
        })
    }

    /// Creates a cache with the provided configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        ReportCache {
            entries: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Returns the cached dataset for `key`, generating it if the entry is
    /// absent, expired, or was rearmed by a failure.
    ///
    /// The caller that arms the entry runs `generate`; callers arriving while
    /// it runs block until it completes and observe the same outcome. Every
    /// successful return path yields an independent clone of the dataset.
    ///
    /// # Errors
    /// Propagates whatever `generate` returns, to the runner and to every
    /// waiter of that arming; the entry is rearmed so the next call retries.
    pub fn maybe_generate<F>(&self, key: &str, generate: F) -> Result<Dataset, ReportError>
    where
        F: FnOnce() -> Result<Dataset, ReportError>,
    {
        let entry = {
            let mut entries = self.entries.lock()?;
            Arc::clone(entries.entry(key.to_string()).or_default())
        };

        let events = &self.config.event_listener;
        let (flight, is_runner) = {
            let mut inner = entry.inner.lock()?;
            if let (Some(dataset), Some(expires_at)) = (&inner.value, inner.expires_at) {
                if Instant::now() < expires_at {
                    events.on_event(ReportEvent::CacheHit {
                        key: key.to_string(),
                    });
                    report_metrics::record_cache_hit();
                    return Ok(dataset.clone());
                }
            }
            match &inner.flight {
                Some(flight) => (Arc::clone(flight), false),
                None => {
                    // Arm: fresh gate, TTL runs from now. A stale value is
                    // dropped here rather than served alongside the rerun.
                    let flight = Arc::new(Flight::default());
                    inner.flight = Some(Arc::clone(&flight));
                    inner.expires_at = Some(Instant::now() + self.config.ttl);
                    inner.value = None;
                    (flight, true)
                }
            }
        };

        if !is_runner {
            events.on_event(ReportEvent::WaitedForFlight {
                key: key.to_string(),
            });
            return flight.wait();
        }

        events.on_event(ReportEvent::GenerationStarted {
            key: key.to_string(),
        });
        report_metrics::record_cache_miss();
        let started = Instant::now();
        let result = generate();

        // Broadcast before publishing so waiters can never hang on a
        // poisoned entry lock; a caller joining in between still finds the
        // completed flight and returns immediately.
        flight.complete(result.clone());

        {
            let mut inner = entry.inner.lock()?;
            match &result {
                Ok(dataset) => inner.value = Some(dataset.clone()),
                Err(_) => {
                    inner.value = None;
                    inner.expires_at = None;
                }
            }
            inner.flight = None;
        }

        let duration = started.elapsed();
        match &result {
            Ok(dataset) => {
                events.on_event(ReportEvent::GenerationSucceeded {
                    key: key.to_string(),
                    rows: dataset.size(),
                    duration,
                });
                report_metrics::record_generation(duration, dataset.size() as u64);
            }
            Err(error) => {
                events.on_event(ReportEvent::GenerationFailed {
                    key: key.to_string(),
                    error: error.to_string(),
                });
                report_metrics::record_generation_failure();
            }
        }

        result
    }

    /// Row counts of all currently cached, non-expired datasets. Diagnostic,
    /// intended for a metrics/health endpoint.
    pub fn stats(&self) -> Result<HashMap<String, usize>, ReportError> {
        let entries = self.entries.lock()?;
        let mut sizes = HashMap::new();
        for (key, entry) in entries.iter() {
            let inner = entry.inner.lock()?;
            if let (Some(dataset), Some(expires_at)) = (&inner.value, inner.expires_at) {
                if Instant::now() < expires_at {
                    sizes.insert(key.clone(), dataset.size());
                }
            }
        }
        Ok(sizes)
    }

    /// Returns a reference to the cache configuration.
    pub fn get_config(&self) -> &CacheConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn dataset_with_rows(rows: u64) -> Dataset {
        let mut ds = Dataset::new();
        for ts in 1..=rows {
            ds.add(ts * 100, "total", ts as f64);
        }
        ds
    }

    #[test]
    fn second_call_within_ttl_is_served_from_cache() {
        let cache = ReportCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);
        for _ in 0..3 {
            let mut ds = cache
                .maybe_generate("Cases", || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(dataset_with_rows(2))
                })
                .unwrap();
            assert_eq!(ds.get_values("total"), Some(vec![1.0, 2.0]));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn expired_entry_regenerates() {
        let cache = ReportCache::new(Duration::from_millis(20));
        let calls = AtomicUsize::new(0);
        let gen = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(dataset_with_rows(1))
        };
        cache.maybe_generate("Cases", gen).unwrap();
        std::thread::sleep(Duration::from_millis(40));
        cache.maybe_generate("Cases", gen).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failure_rearms_instead_of_caching_the_error() {
        let cache = ReportCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        let err = cache.maybe_generate("Cases", || {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ReportError::MissingSourceData("cases".to_string()))
        });
        assert_eq!(
            err,
            Err(ReportError::MissingSourceData("cases".to_string()))
        );

        // Well before the TTL would have elapsed, the next call retries.
        let ok = cache.maybe_generate("Cases", || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(dataset_with_rows(1))
        });
        assert!(ok.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn stats_reports_only_fresh_entries() {
        let cache = ReportCache::new(Duration::from_millis(100));
        cache
            .maybe_generate("Cases", || Ok(dataset_with_rows(3)))
            .unwrap();
        cache
            .maybe_generate("Deaths", || Ok(dataset_with_rows(5)))
            .unwrap();
        let _ = cache.maybe_generate("Broken", || {
            Err(ReportError::Generation("boom".to_string()))
        });

        let stats = cache.stats().unwrap();
        assert_eq!(stats.get("Cases"), Some(&3));
        assert_eq!(stats.get("Deaths"), Some(&5));
        assert!(!stats.contains_key("Broken"));

        std::thread::sleep(Duration::from_millis(150));
        assert!(cache.stats().unwrap().is_empty());
    }
}
