//! The market-model event study pipeline.
//!
//! For each event the engine runs five stages: window derivation, data
//! acquisition, beta estimation over the estimation window, expected and
//! abnormal returns over the event window, and aggregation with test
//! statistics.

use crate::error::Result;
use crate::windows::{EventSpec, EventWindows, WindowConfig};
use chrono::NaiveDate;
use merton_analytics::{
    AnalyticsError, MarketModelResult, ReturnObservation, compute_returns, estimate_beta,
};
use merton_data::{Interval, PriceSeriesProvider};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Abnormal-return analysis for one event, read-only once computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbnormalReturnResult {
    /// Label of the event this result belongs to.
    pub label: String,
    /// The event date the windows were derived from.
    pub event_date: NaiveDate,
    /// Resolved estimation and event windows.
    pub windows: EventWindows,
    /// Market-model estimate from the estimation window.
    pub market_model: MarketModelResult,
    /// Per-date abnormal returns over the event window.
    pub abnormal_returns: Vec<ReturnObservation>,
    /// Cumulative abnormal return over the event window.
    pub car: f64,
    /// Average abnormal return: CAR over the event window length.
    pub aar: f64,
    /// Standard deviation of the abnormal returns.
    pub std_ar: f64,
    /// Per-date t-statistics, in the same order as `abnormal_returns`.
    pub t_ar: Vec<f64>,
    /// Standard deviation of the CAR.
    pub std_car: f64,
    /// t-statistic of the CAR.
    pub t_car: f64,
}

/// Outcome of one event inside a batch run.
#[derive(Debug)]
pub struct EventOutcome {
    /// Label of the event.
    pub label: String,
    /// The event's own result; one failure never aborts the other events.
    pub result: Result<AbnormalReturnResult>,
}

/// Event-study engine for one (stock, market) ticker pair.
///
/// Each run is a pure function of the fetched price series; no state is
/// shared between events.
#[derive(Debug)]
pub struct EventStudyEngine<P> {
    provider: P,
    stock: String,
    market: String,
    config: WindowConfig,
}

impl<P: PriceSeriesProvider> EventStudyEngine<P> {
    /// Create an engine studying `stock` against `market`.
    pub fn new(
        provider: P,
        stock: impl Into<String>,
        market: impl Into<String>,
        config: WindowConfig,
    ) -> Self {
        Self {
            provider,
            stock: stock.into(),
            market: market.into(),
            config,
        }
    }

    /// Window configuration in use.
    pub const fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Run the full pipeline for a single event.
    pub async fn run_event(&self, event: &EventSpec) -> Result<AbnormalReturnResult> {
        let windows = self.config.windows_for(event.event_date)?;
        let (fetch_start, fetch_end) = self.config.fetch_range(&windows)?;

        let (stock_prices, market_prices) = tokio::try_join!(
            self.provider
                .fetch(&self.stock, fetch_start, fetch_end, Interval::Daily),
            self.provider
                .fetch(&self.market, fetch_start, fetch_end, Interval::Daily),
        )?;

        let stock_returns = compute_returns(&stock_prices)?;
        let market_returns = compute_returns(&market_prices)?;

        // Stage 3: beta over [estimation_start, estimation_end).
        let estimation_stock =
            stock_returns.window_half_open(windows.estimation_start, windows.estimation_end);
        let estimation_market =
            market_returns.window_half_open(windows.estimation_start, windows.estimation_end);

        // A one-observation estimation sample is reported as such, ahead of
        // the generic degenerate-market failure from the beta estimator.
        let aligned_estimation = estimation_stock.align(&estimation_market);
        if aligned_estimation.len() <= 1 {
            return Err(AnalyticsError::InsufficientEstimationSample {
                actual: aligned_estimation.len(),
            }
            .into());
        }
        let market_model = estimate_beta(&estimation_stock, &estimation_market)?;

        // Stage 4: abnormal returns over [event_start, event_end], both
        // bounds inclusive. Misalignment inside the event window is an
        // error, never a silent drop.
        let event_stock = stock_returns.window_inclusive(windows.event_start, windows.event_end);
        let event_market = market_returns.window_inclusive(windows.event_start, windows.event_end);
        if event_stock.len() != event_market.len() {
            return Err(AnalyticsError::WindowMismatch(format!(
                "stock has {} event-window observations, market has {}",
                event_stock.len(),
                event_market.len()
            ))
            .into());
        }

        let mut abnormal_returns = Vec::with_capacity(event_stock.len());
        for (stock_obs, market_obs) in event_stock
            .observations()
            .iter()
            .zip(event_market.observations())
        {
            if stock_obs.date != market_obs.date {
                return Err(AnalyticsError::WindowMismatch(format!(
                    "stock observation on {} paired with market observation on {}",
                    stock_obs.date, market_obs.date
                ))
                .into());
            }
            let expected = market_model.beta * market_obs.value;
            abnormal_returns.push(ReturnObservation::new(
                stock_obs.date,
                stock_obs.value - expected,
            ));
        }
        if abnormal_returns.is_empty() {
            return Err(AnalyticsError::EmptyEventWindow.into());
        }

        // Stage 5: aggregation and significance.
        let event_len = abnormal_returns.len() as f64;
        let car: f64 = abnormal_returns.iter().map(|obs| obs.value).sum();
        let aar = car / event_len;

        // Market-model significance convention: squared event-window
        // residuals over the estimation sample's degrees of freedom.
        let n_est = market_model.estimation_sample_size as f64;
        let var_ar = abnormal_returns
            .iter()
            .map(|obs| obs.value * obs.value)
            .sum::<f64>()
            / (n_est - 1.0);
        let std_ar = var_ar.sqrt();
        if std_ar == 0.0 || std_ar.is_nan() {
            return Err(AnalyticsError::DegenerateMarket(
                "abnormal returns carry no variation; test statistics are undefined".to_string(),
            )
            .into());
        }

        let t_ar: Vec<f64> = abnormal_returns
            .iter()
            .map(|obs| obs.value / std_ar)
            .collect();
        let std_car = (event_len * var_ar).sqrt();
        let t_car = car / std_car;

        Ok(AbnormalReturnResult {
            label: event.label.clone(),
            event_date: event.event_date,
            windows,
            market_model,
            abnormal_returns,
            car,
            aar,
            std_ar,
            t_ar,
            std_car,
            t_car,
        })
    }

    /// Run every event in the calendar, isolating failures per event.
    ///
    /// Duplicate labels are rejected up front; afterwards each event gets
    /// its own result, aggregated in input order under its label.
    pub async fn run_all(&self, events: &[EventSpec]) -> Result<Vec<EventOutcome>> {
        let mut seen = HashSet::new();
        for event in events {
            if !seen.insert(event.label.as_str()) {
                return Err(AnalyticsError::InvalidInput(format!(
                    "duplicate event label: {}",
                    event.label
                ))
                .into());
            }
        }

        let mut outcomes = Vec::with_capacity(events.len());
        for event in events {
            outcomes.push(EventOutcome {
                label: event.label.clone(),
                result: self.run_event(event).await,
            });
        }
        Ok(outcomes)
    }
}
