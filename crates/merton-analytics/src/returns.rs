//! Simple period-over-period return series derived from price series.

use crate::error::{AnalyticsError, Result};
use chrono::NaiveDate;
use merton_data::PricePoint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A dated return observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnObservation {
    /// Date the return is realized on.
    pub date: NaiveDate,
    /// Simple return for the period ending on `date`.
    pub value: f64,
}

impl ReturnObservation {
    /// Create a new observation.
    pub const fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// An ordered series of dated simple returns.
///
/// By construction a return series never contains an observation for the
/// first date of its source price series: the first price anchors the
/// series and has no defined return.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    observations: Vec<ReturnObservation>,
}

impl ReturnSeries {
    /// Build a series from observations, sorting them by date.
    pub fn from_observations(mut observations: Vec<ReturnObservation>) -> Self {
        observations.sort_by_key(|obs| obs.date);
        Self { observations }
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the series holds no observations.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// The observations in date order.
    pub fn observations(&self) -> &[ReturnObservation] {
        &self.observations
    }

    /// Observations with `start <= date < end`.
    pub fn window_half_open(&self, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            observations: self
                .observations
                .iter()
                .copied()
                .filter(|obs| obs.date >= start && obs.date < end)
                .collect(),
        }
    }

    /// Observations with `start <= date <= end`.
    pub fn window_inclusive(&self, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            observations: self
                .observations
                .iter()
                .copied()
                .filter(|obs| obs.date >= start && obs.date <= end)
                .collect(),
        }
    }

    /// Date-sorted intersection with another series.
    ///
    /// Observations present in only one series are discarded; the result is
    /// deterministic and ordered by date.
    pub fn align(&self, other: &Self) -> Vec<AlignedReturn> {
        let by_date: BTreeMap<NaiveDate, f64> = other
            .observations
            .iter()
            .map(|obs| (obs.date, obs.value))
            .collect();
        self.observations
            .iter()
            .filter_map(|obs| {
                by_date.get(&obs.date).map(|&rhs| AlignedReturn {
                    date: obs.date,
                    lhs: obs.value,
                    rhs,
                })
            })
            .collect()
    }
}

/// A pair of same-date returns from two aligned series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedReturn {
    /// Shared observation date.
    pub date: NaiveDate,
    /// Return from the series `align` was called on.
    pub lhs: f64,
    /// Return from the other series.
    pub rhs: f64,
}

/// Derive simple period-over-period returns from a price series.
///
/// `value[i] = price[i] / price[i-1] - 1`; the output is one observation
/// shorter than the input. Prices must be strictly increasing by date.
pub fn compute_returns(prices: &[PricePoint]) -> Result<ReturnSeries> {
    if prices.len() < 2 {
        return Err(AnalyticsError::InsufficientData {
            required: 2,
            actual: prices.len(),
        });
    }

    let mut observations = Vec::with_capacity(prices.len() - 1);
    for pair in prices.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        if curr.date <= prev.date {
            return Err(AnalyticsError::InvalidInput(format!(
                "price series dates must be strictly increasing ({} then {})",
                prev.date, curr.date
            )));
        }
        if prev.adjusted_close == 0.0
            || !prev.adjusted_close.is_finite()
            || !curr.adjusted_close.is_finite()
        {
            return Err(AnalyticsError::UndefinedReturn {
                date: curr.date,
                prior: prev.adjusted_close,
            });
        }
        observations.push(ReturnObservation::new(
            curr.date,
            curr.adjusted_close / prev.adjusted_close - 1.0,
        ));
    }

    Ok(ReturnSeries { observations })
}

/// Growth of each price relative to the first close: `price[i] / price[0] - 1`.
///
/// Puts a series on a common basis for reporting; unlike
/// [`compute_returns`] the first date is kept, with value zero.
pub fn normalize(prices: &[PricePoint]) -> Result<Vec<ReturnObservation>> {
    let first = prices.first().ok_or(AnalyticsError::InsufficientData {
        required: 1,
        actual: 0,
    })?;
    if first.adjusted_close == 0.0 || !first.adjusted_close.is_finite() {
        return Err(AnalyticsError::UndefinedReturn {
            date: first.date,
            prior: first.adjusted_close,
        });
    }
    Ok(prices
        .iter()
        .map(|p| ReturnObservation::new(p.date, p.adjusted_close / first.adjusted_close - 1.0))
        .collect())
}
