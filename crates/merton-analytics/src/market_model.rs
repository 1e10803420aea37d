//! Single-factor market model: beta estimation and CAPM cost of equity.

use crate::error::{AnalyticsError, Result};
use crate::returns::ReturnSeries;
use serde::{Deserialize, Serialize};

/// Market variance below this threshold is treated as numerically zero.
const MIN_MARKET_VARIANCE: f64 = 1e-18;

/// Result of a market-model beta estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketModelResult {
    /// Estimated market beta (covariance over market variance).
    pub beta: f64,
    /// Number of aligned observations the estimate used.
    pub estimation_sample_size: usize,
}

/// Estimate beta from two contemporaneous return series.
///
/// The series are aligned on their date intersection; observations present
/// in only one series are discarded. Beta is the sample covariance of the
/// aligned returns over the sample variance of the market returns.
pub fn estimate_beta(stock: &ReturnSeries, market: &ReturnSeries) -> Result<MarketModelResult> {
    let aligned = stock.align(market);
    let n = aligned.len();
    if n < 2 {
        return Err(AnalyticsError::DegenerateMarket(format!(
            "aligned sample has {n} observation(s); at least 2 are required"
        )));
    }

    let count = n as f64;
    let stock_mean = aligned.iter().map(|obs| obs.lhs).sum::<f64>() / count;
    let market_mean = aligned.iter().map(|obs| obs.rhs).sum::<f64>() / count;

    let mut covariance = 0.0;
    let mut market_variance = 0.0;
    for obs in &aligned {
        let stock_dev = obs.lhs - stock_mean;
        let market_dev = obs.rhs - market_mean;
        covariance += stock_dev * market_dev;
        market_variance += market_dev * market_dev;
    }
    // Sample (n-1) statistics; the divisor cancels in the ratio but keeps
    // the intermediates meaningful on their own.
    covariance /= count - 1.0;
    market_variance /= count - 1.0;

    if !market_variance.is_finite() || market_variance < MIN_MARKET_VARIANCE {
        return Err(AnalyticsError::DegenerateMarket(
            "market returns have zero variance over the estimation sample".to_string(),
        ));
    }

    Ok(MarketModelResult {
        beta: covariance / market_variance,
        estimation_sample_size: n,
    })
}

/// CAPM cost of equity: `rf + beta * (rm - rf)`.
pub fn capm_cost_of_equity(beta: f64, risk_free_rate: f64, market_return: f64) -> Result<f64> {
    if !beta.is_finite() {
        return Err(AnalyticsError::InvalidInput(format!(
            "beta must be finite, got {beta}"
        )));
    }
    Ok(risk_free_rate + beta * (market_return - risk_free_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::returns::ReturnObservation;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    fn series(values: &[f64]) -> ReturnSeries {
        ReturnSeries::from_observations(
            values
                .iter()
                .enumerate()
                .map(|(i, &value)| {
                    ReturnObservation::new(
                        NaiveDate::from_ymd_opt(2022, 1, 1 + i as u32).unwrap(),
                        value,
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn test_beta_of_identical_series_is_one() {
        let market = series(&[0.01, -0.02, 0.015, 0.003, -0.007]);
        let result = estimate_beta(&market, &market).unwrap();
        assert_abs_diff_eq!(result.beta, 1.0, epsilon = 1e-12);
        assert_eq!(result.estimation_sample_size, 5);
    }

    #[test]
    fn test_beta_of_scaled_series() {
        let market = series(&[0.01, -0.02, 0.015, 0.003, -0.007]);
        let stock = series(&[0.02, -0.04, 0.030, 0.006, -0.014]);
        let result = estimate_beta(&stock, &market).unwrap();
        assert_abs_diff_eq!(result.beta, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_market_is_degenerate() {
        let stock = series(&[0.01, -0.02, 0.015, 0.003]);
        let market = series(&[0.005, 0.005, 0.005, 0.005]);
        assert!(matches!(
            estimate_beta(&stock, &market),
            Err(AnalyticsError::DegenerateMarket(_))
        ));
    }

    #[test]
    fn test_single_aligned_observation_is_degenerate() {
        let stock = series(&[0.01]);
        let market = series(&[0.02]);
        assert!(matches!(
            estimate_beta(&stock, &market),
            Err(AnalyticsError::DegenerateMarket(_))
        ));
    }

    #[test]
    fn test_alignment_discards_unmatched_dates() {
        let stock = ReturnSeries::from_observations(vec![
            ReturnObservation::new(NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(), 0.02),
            ReturnObservation::new(NaiveDate::from_ymd_opt(2022, 1, 2).unwrap(), -0.04),
            // No stock observation on Jan 3.
            ReturnObservation::new(NaiveDate::from_ymd_opt(2022, 1, 4).unwrap(), 0.06),
        ]);
        let market = ReturnSeries::from_observations(vec![
            ReturnObservation::new(NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(), 0.01),
            ReturnObservation::new(NaiveDate::from_ymd_opt(2022, 1, 2).unwrap(), -0.02),
            ReturnObservation::new(NaiveDate::from_ymd_opt(2022, 1, 3).unwrap(), 0.50),
            ReturnObservation::new(NaiveDate::from_ymd_opt(2022, 1, 4).unwrap(), 0.03),
        ]);

        let result = estimate_beta(&stock, &market).unwrap();
        assert_eq!(result.estimation_sample_size, 3);
        assert_abs_diff_eq!(result.beta, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_capm_cost_of_equity() {
        let re = capm_cost_of_equity(0.77, 0.0333, 0.10).unwrap();
        assert_abs_diff_eq!(re, 0.0333 + 0.77 * (0.10 - 0.0333), epsilon = 1e-15);
    }

    #[test]
    fn test_capm_rejects_non_finite_beta() {
        assert!(matches!(
            capm_cost_of_equity(f64::NAN, 0.03, 0.10),
            Err(AnalyticsError::InvalidInput(_))
        ));
        assert!(matches!(
            capm_cost_of_equity(f64::INFINITY, 0.03, 0.10),
            Err(AnalyticsError::InvalidInput(_))
        ));
    }
}
