#![doc = include_str!("../README.md")]
// Declare modules
pub mod cache;
pub mod dataset;
pub mod error;
pub mod grouping;
pub mod indexer;
pub mod report;
pub mod source;
pub mod telemetry;
pub mod types;

/// Configuration options for the report cache.
pub use crate::cache::CacheConfig;
/// TTL-expiring, single-flight cache of generated report datasets.
pub use crate::cache::ReportCache;
/// Time-indexed, column-indexed numeric table built from raw measurements.
pub use crate::dataset::Dataset;
/// Serializable snapshot of a dataset for dashboard adapters.
pub use crate::dataset::ReportTable;
/// Error type for report generation and caching.
pub use crate::error::ReportError;
/// Groups records by their own named attributes.
pub use crate::grouping::group_by_attributes;
/// Groups records by the value of a runtime-selected field.
pub use crate::grouping::group_by_field;
/// Bidirectional key-to-index mapping with a lazily sorted ordered view.
pub use crate::indexer::Indexer;
/// Standard dashboard views wired through the cache.
pub use crate::report::Reporter;
/// Raw-feed collaborator contract.
pub use crate::source::MeasurementSource;
/// In-memory measurement source for tests and demos.
pub use crate::source::StaticSource;
/// Structured event hook for observability.
pub use crate::telemetry::{ReportEvent, ReportEventListener};
/// One raw upstream record.
pub use crate::types::Measurement;
/// Type alias for a timestamp (nanoseconds since epoch).
pub use crate::types::Timestamp;
/// Type alias for a value in a time series (f64).
pub use crate::types::Value;

// Default TTL if not specified
use std::time::Duration;
/// The default freshness window for cached reports (5 minutes). The upstream
/// feeds publish daily snapshots, so the TTL only bounds how long an intra-day
/// re-publish can go unnoticed.
pub const DEFAULT_REPORT_TTL: Duration = Duration::from_secs(300);
