//! Raw-measurement source contract and an in-memory implementation.

use crate::types::Measurement;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// The raw-data collaborator the report generators pull from: a cache of
/// upstream API results, keyed by feed name (`"cases"`, `"vaccinations"`,
/// ...). `None` means the feed has not been fetched (yet); generators surface
/// that as a missing-source-data error, which is never cached.
pub trait MeasurementSource: Send + Sync {
    fn get(&self, name: &str) -> Option<Vec<Arc<dyn Measurement>>>;
}

/// HashMap-backed [`MeasurementSource`] for tests, benchmarks, and demos,
/// standing in for the upstream HTTP feed cache.
#[derive(Default)]
pub struct StaticSource {
    feeds: RwLock<HashMap<String, Vec<Arc<dyn Measurement>>>>,
}

impl StaticSource {
    pub fn new() -> Self {
        StaticSource::default()
    }

    /// Replaces the records of the named feed.
    pub fn insert(&self, name: &str, records: Vec<Arc<dyn Measurement>>) {
        if let Ok(mut feeds) = self.feeds.write() {
            feeds.insert(name.to_string(), records);
        }
    }
}

impl MeasurementSource for StaticSource {
    fn get(&self, name: &str) -> Option<Vec<Arc<dyn Measurement>>> {
        self.feeds.read().ok()?.get(name).cloned()
    }
}
