//! Named report views: the thin wiring between the raw-measurement source,
//! the grouping algorithms, and the report cache.

use crate::cache::{CacheConfig, ReportCache};
use crate::dataset::Dataset;
use crate::error::ReportError;
use crate::grouping::{group_by_attributes, group_by_field};
use crate::source::MeasurementSource;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Raw feed names as published by the upstream collaborator.
pub mod feed {
    pub const CASES: &str = "cases";
    pub const DEATHS: &str = "deaths";
    pub const HOSPITALISATIONS: &str = "hospitalisations";
    pub const TESTS: &str = "tests";
    pub const VACCINATIONS: &str = "vaccinations";
    pub const VACCINE_DELIVERIES: &str = "vaccine_deliveries";
}

/// Serves the standard dashboard views, memoized through a [`ReportCache`].
///
/// Each view is a generator over one raw feed: pull the records, run a
/// grouping algorithm, optionally derive extra columns. Cache keys are stable
/// per logical view (`"Cases"`, `"Cases-region"`, ...), so repeated requests
/// within the TTL window are served from memory.
pub struct Reporter {
    cache: ReportCache,
    source: Arc<dyn MeasurementSource>,
}

impl Reporter {
    pub fn new(source: Arc<dyn MeasurementSource>, ttl: Duration) -> Self {
        Reporter {
            cache: ReportCache::new(ttl),
            source,
        }
    }

    pub fn with_config(source: Arc<dyn MeasurementSource>, config: CacheConfig) -> Self {
        Reporter {
            cache: ReportCache::with_config(config),
            source,
        }
    }

    /// Confirmed cases per attribute (e.g. daily totals).
    pub fn cases(&self) -> Result<Dataset, ReportError> {
        self.attribute_view("Cases", feed::CASES)
    }

    /// Confirmed cases, one column per value of `field` (region, province,
    /// age group, ...).
    pub fn cases_by(&self, field: &str) -> Result<Dataset, ReportError> {
        self.field_view("Cases", feed::CASES, field)
    }

    /// Hospital intake per attribute.
    pub fn hospitalisations(&self) -> Result<Dataset, ReportError> {
        self.attribute_view("Hospitalisations", feed::HOSPITALISATIONS)
    }

    pub fn hospitalisations_by(&self, field: &str) -> Result<Dataset, ReportError> {
        self.field_view("Hospitalisations", feed::HOSPITALISATIONS, field)
    }

    pub fn deaths_by(&self, field: &str) -> Result<Dataset, ReportError> {
        self.field_view("Deaths", feed::DEATHS, field)
    }

    /// Administered tests per attribute, with a derived `"positivity rate"`
    /// column (`positive / total`, zero when no tests were taken).
    pub fn tests(&self) -> Result<Dataset, ReportError> {
        let source = &self.source;
        self.cache.maybe_generate("Tests", || {
            let records = source
                .get(feed::TESTS)
                .ok_or_else(|| ReportError::MissingSourceData(feed::TESTS.to_string()))?;
            let mut dataset = group_by_attributes(&records);
            dataset.add_column("positivity rate", positivity_rate);
            Ok(dataset)
        })
    }

    /// Administered vaccinations per attribute (partial, full, booster).
    pub fn vaccinations(&self) -> Result<Dataset, ReportError> {
        self.attribute_view("Vaccinations", feed::VACCINATIONS)
    }

    pub fn vaccinations_by(&self, field: &str) -> Result<Dataset, ReportError> {
        self.field_view("Vaccinations", feed::VACCINATIONS, field)
    }

    /// Delivered vaccine batches, one column per value of `field`
    /// (e.g. manufacturer).
    pub fn vaccine_deliveries_by(&self, field: &str) -> Result<Dataset, ReportError> {
        self.field_view("VaccineDeliveries", feed::VACCINE_DELIVERIES, field)
    }

    /// Row counts of currently cached views, for operational introspection.
    pub fn stats(&self) -> Result<HashMap<String, usize>, ReportError> {
        self.cache.stats()
    }

    fn attribute_view(&self, key: &str, feed: &str) -> Result<Dataset, ReportError> {
        let source = &self.source;
        self.cache.maybe_generate(key, || {
            let records = source
                .get(feed)
                .ok_or_else(|| ReportError::MissingSourceData(feed.to_string()))?;
            Ok(group_by_attributes(&records))
        })
    }

    fn field_view(&self, prefix: &str, feed: &str, field: &str) -> Result<Dataset, ReportError> {
        let key = format!("{}-{}", prefix, field);
        let source = &self.source;
        self.cache.maybe_generate(&key, || {
            let records = source
                .get(feed)
                .ok_or_else(|| ReportError::MissingSourceData(feed.to_string()))?;
            Ok(group_by_field(&records, field))
        })
    }
}

fn positivity_rate(row: &HashMap<String, f64>) -> f64 {
    let total = row.get("total").copied().unwrap_or(0.0);
    if total == 0.0 {
        0.0
    } else {
        row.get("positive").copied().unwrap_or(0.0) / total
    }
}
