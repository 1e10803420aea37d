//! Price data fetching from Yahoo Finance.

use crate::error::{DataError, Result};
use crate::provider::{Interval, PricePoint, PriceSeriesProvider};
use chrono::{DateTime, Days, NaiveDate, NaiveTime};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use yahoo_finance_api as yahoo;

/// Yahoo Finance price provider with rate limiting.
pub struct YahooQuoteProvider {
    provider: yahoo::YahooConnector,
    rate_limit_delay: Duration,
}

impl std::fmt::Debug for YahooQuoteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooQuoteProvider")
            .field("rate_limit_delay", &self.rate_limit_delay)
            .finish_non_exhaustive()
    }
}

impl YahooQuoteProvider {
    /// Create a new Yahoo Finance provider with default rate limiting (1 req/sec).
    pub fn new() -> Result<Self> {
        Self::with_rate_limit(Duration::from_millis(1000))
    }

    /// Create a new Yahoo Finance provider with custom rate limiting.
    pub fn with_rate_limit(rate_limit_delay: Duration) -> Result<Self> {
        Ok(Self {
            provider: yahoo::YahooConnector::new()?,
            rate_limit_delay,
        })
    }

    /// Fetch the adjusted closing price series for a single ticker.
    ///
    /// # Arguments
    /// * `ticker` - The ticker symbol (e.g., "IRBT", "^GSPC")
    /// * `start` - First date of the requested range (inclusive)
    /// * `end` - Last date of the requested range (inclusive)
    /// * `interval` - Daily or monthly sampling
    ///
    /// # Returns
    /// One `PricePoint` per period, sorted ascending and strictly
    /// increasing by date.
    pub async fn fetch_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<Vec<PricePoint>> {
        if ticker.is_empty() {
            return Err(DataError::InvalidSymbol("empty ticker".to_string()));
        }
        if start > end {
            return Err(DataError::InvalidDateRange { start, end });
        }

        let start_time = to_offset_datetime(start)?;
        // The chart API treats the end bound as exclusive; push it one day
        // out so the series covers `end` itself.
        let end_next = end
            .checked_add_days(Days::new(1))
            .ok_or_else(|| DataError::TimeConversion(format!("date overflow past {end}")))?;
        let end_time = to_offset_datetime(end_next)?;

        let response = self
            .provider
            .get_quote_history_interval(ticker, start_time, end_time, interval.as_str())
            .await?;

        let quotes = response
            .quotes()
            .map_err(|e| DataError::YahooApi(e.to_string()))?;

        if quotes.is_empty() {
            return Err(DataError::Unavailable {
                symbol: ticker.to_string(),
                reason: "no quotes returned from Yahoo Finance".to_string(),
            });
        }

        let mut points = Vec::with_capacity(quotes.len());
        for quote in &quotes {
            let date = DateTime::from_timestamp(quote.timestamp, 0)
                .ok_or_else(|| {
                    DataError::TimeConversion(format!("bad quote timestamp {}", quote.timestamp))
                })?
                .date_naive();
            points.push(PricePoint::new(date, quote.adjclose));
        }
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);

        // Apply rate limiting
        sleep(self.rate_limit_delay).await;

        Ok(points)
    }
}

impl PriceSeriesProvider for YahooQuoteProvider {
    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> impl Future<Output = Result<Vec<PricePoint>>> + Send {
        self.fetch_prices(ticker, start, end, interval)
    }
}

fn to_offset_datetime(date: NaiveDate) -> Result<time::OffsetDateTime> {
    let timestamp = date.and_time(NaiveTime::MIN).and_utc().timestamp();
    time::OffsetDateTime::from_unix_timestamp(timestamp)
        .map_err(|e| DataError::TimeConversion(e.to_string()))
}
