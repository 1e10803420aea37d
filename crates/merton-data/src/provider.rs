//! The price-series contract consumed by the analytics engines.

use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// A single observation in an adjusted closing price series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading date of the observation.
    pub date: NaiveDate,
    /// Split- and dividend-adjusted closing price.
    pub adjusted_close: f64,
}

impl PricePoint {
    /// Create a new price point.
    pub const fn new(date: NaiveDate, adjusted_close: f64) -> Self {
        Self {
            date,
            adjusted_close,
        }
    }
}

/// Sampling interval for a price series request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Interval {
    /// One observation per trading day.
    #[default]
    Daily,
    /// One observation per month.
    Monthly,
}

impl Interval {
    /// Interval code understood by the Yahoo Finance chart API.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "1d",
            Self::Monthly => "1mo",
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source of historical adjusted closing prices.
///
/// Implementations return one point per trading period, sorted ascending
/// and strictly increasing by date, covering `[start, end]` as closely as
/// the venue's calendar allows. Failures surface as [`crate::DataError`];
/// the consumers of this contract never retry internally.
pub trait PriceSeriesProvider {
    /// Fetch the adjusted price series for `ticker` over `[start, end]`.
    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> impl Future<Output = Result<Vec<PricePoint>>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_codes() {
        assert_eq!(Interval::Daily.as_str(), "1d");
        assert_eq!(Interval::Monthly.as_str(), "1mo");
        assert_eq!(Interval::default(), Interval::Daily);
    }

    #[test]
    fn test_price_point_ordering_by_date() {
        let a = PricePoint::new(NaiveDate::from_ymd_opt(2022, 8, 5).unwrap(), 61.0);
        let b = PricePoint::new(NaiveDate::from_ymd_opt(2022, 8, 8).unwrap(), 59.5);
        assert!(a.date < b.date);
    }
}
