use thiserror::Error;

/// Custom error type for report generation and caching.
///
/// `Clone` is required because a single generation's outcome is broadcast to
/// every concurrent waiter of the same cache arming; each waiter receives its
/// own copy of the error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReportError {
    /// The raw-measurement collaborator has no data for the requested feed.
    /// Never cached; the next call retries the source.
    #[error("Missing source data: {0}")]
    MissingSourceData(String),

    #[error("Report generation failed: {0}")]
    Generation(String),

    #[error("Lock acquisition failed: {0}")]
    LockError(String),
}

// Implement conversion from lock poison errors for convenience
impl<T> From<std::sync::PoisonError<T>> for ReportError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        ReportError::LockError(format!("Mutex/Condvar poisoned: {}", err))
    }
}
