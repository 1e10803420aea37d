//! Error type for event-study runs.

use merton_analytics::AnalyticsError;
use merton_data::DataError;
use thiserror::Error;

/// Result type for event-study operations.
pub type Result<T> = std::result::Result<T, EventStudyError>;

/// Errors surfaced by the event-study engine.
#[derive(Debug, Error)]
pub enum EventStudyError {
    /// Price data could not be retrieved.
    #[error("data error: {0}")]
    Data(#[from] DataError),

    /// A computation inside the study pipeline failed.
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}
