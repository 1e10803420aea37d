//! Error types for the analytics engines.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Errors that can occur during return, market-model, valuation or
/// event-study computations.
///
/// Every failure is terminal for the single computation it occurs in, and
/// none is ever converted to a sentinel numeric value.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Too few observations to compute anything.
    #[error("insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Minimum number of observations required.
        required: usize,
        /// Number of observations provided.
        actual: usize,
    },

    /// A return is undefined because the prior price is zero or not finite.
    #[error("undefined return on {date}: prior price {prior} is unusable")]
    UndefinedReturn {
        /// Date the return would have been realized on.
        date: NaiveDate,
        /// The unusable prior price.
        prior: f64,
    },

    /// The market series carries no usable variation.
    #[error("degenerate market model: {0}")]
    DegenerateMarket(String),

    /// An input parameter is outside its valid domain.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Stock and market series disagree inside the event window.
    #[error("event window mismatch: {0}")]
    WindowMismatch(String),

    /// The estimation window holds at most one aligned observation.
    #[error("estimation sample has {actual} observation(s); at least 2 are required")]
    InsufficientEstimationSample {
        /// Number of aligned estimation-window observations found.
        actual: usize,
    },

    /// The event window holds no observations.
    #[error("event window contains no observations")]
    EmptyEventWindow,
}
