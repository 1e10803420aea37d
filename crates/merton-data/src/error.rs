//! Error types for market data retrieval.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while retrieving price data.
///
/// A fetch failure is terminal for the call that made it; retry policy
/// belongs to the caller.
#[derive(Debug, Error)]
pub enum DataError {
    /// Yahoo Finance API error
    #[error("Yahoo Finance API error: {0}")]
    YahooApi(String),

    /// No usable data came back for a ticker
    #[error("no data available for {symbol}: {reason}")]
    Unavailable {
        /// Ticker that was queried
        symbol: String,
        /// Reason for the missing data
        reason: String,
    },

    /// Invalid date range
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date of the range
        start: NaiveDate,
        /// End date of the range
        end: NaiveDate,
    },

    /// Invalid ticker symbol
    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Time conversion error
    #[error("time conversion error: {0}")]
    TimeConversion(String),
}

impl From<yahoo_finance_api::YahooError> for DataError {
    fn from(err: yahoo_finance_api::YahooError) -> Self {
        Self::YahooApi(err.to_string())
    }
}
