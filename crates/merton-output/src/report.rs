//! Plain-text summaries of study results.

use merton_analytics::{DcfParams, DcfValuation, MarketModelResult};
use merton_events::{AbnormalReturnResult, EventOutcome};

/// Render one event's abnormal-return analysis as a text block.
pub fn event_summary(result: &AbnormalReturnResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} ({})\n", result.label, result.event_date));
    out.push_str(&format!(
        "  estimation window: {} to {} ({} aligned observations)\n",
        result.windows.estimation_start,
        result.windows.estimation_end,
        result.market_model.estimation_sample_size
    ));
    out.push_str(&format!(
        "  event window:      {} to {} ({} observations)\n",
        result.windows.event_start,
        result.windows.event_end,
        result.abnormal_returns.len()
    ));
    out.push_str(&format!("  beta:  {:>9.4}\n", result.market_model.beta));
    out.push_str(&format!(
        "  CAR:   {:>9.4} (t = {:.3})\n",
        result.car, result.t_car
    ));
    out.push_str(&format!("  AAR:   {:>9.4}\n", result.aar));
    out.push_str("  date          AR      t(AR)\n");
    for (obs, t) in result.abnormal_returns.iter().zip(&result.t_ar) {
        out.push_str(&format!("  {}  {:>8.4}  {:>8.3}\n", obs.date, obs.value, t));
    }
    out
}

/// Render a whole batch run, one block per event, failures included.
pub fn study_summary(stock: &str, market: &str, outcomes: &[EventOutcome]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Event study: {stock} vs {market}\n"));
    out.push_str(&format!("{} event(s)\n\n", outcomes.len()));
    for outcome in outcomes {
        match &outcome.result {
            Ok(result) => out.push_str(&event_summary(result)),
            Err(err) => out.push_str(&format!("{}\n  failed: {err}\n", outcome.label)),
        }
        out.push('\n');
    }
    out
}

/// Render a CAPM cost-of-equity estimate, with the WACC when the capital
/// structure was supplied.
pub fn cost_of_capital_summary(
    ticker: &str,
    model: &MarketModelResult,
    cost_of_equity: f64,
    wacc: Option<f64>,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("Cost of capital: {ticker}\n"));
    out.push_str(&format!(
        "  beta:           {:>8.4} ({} observations)\n",
        model.beta, model.estimation_sample_size
    ));
    out.push_str(&format!(
        "  cost of equity: {:>8.4} ({:.2}%)\n",
        cost_of_equity,
        cost_of_equity * 100.0
    ));
    if let Some(wacc) = wacc {
        out.push_str(&format!(
            "  WACC:           {:>8.4} ({:.2}%)\n",
            wacc,
            wacc * 100.0
        ));
    }
    out
}

/// Render a DCF valuation next to its inputs.
pub fn valuation_summary(params: &DcfParams, valuation: &DcfValuation) -> String {
    let mut out = String::new();
    out.push_str("DCF valuation\n");
    out.push_str(&format!(
        "  forecast periods:  {:>12}\n",
        params.free_cash_flows.len()
    ));
    out.push_str(&format!("  discount rate:     {:>12.4}\n", params.discount_rate));
    out.push_str(&format!("  growth rate:       {:>12.4}\n", params.growth_rate));
    out.push_str(&format!(
        "  enterprise value:  {:>12.2}\n",
        valuation.enterprise_value
    ));
    out.push_str(&format!("  net debt:          {:>12.2}\n", params.net_debt));
    out.push_str(&format!("  equity value:      {:>12.2}\n", valuation.equity_value));
    out.push_str(&format!("  share price:       {:>12.2}\n", valuation.share_price));
    out
}

/// Render a growth-rate sweep as a two-column table.
pub fn curve_summary(curve: &[(f64, f64)]) -> String {
    let mut out = String::new();
    out.push_str("  growth     share price\n");
    for (growth, price) in curve {
        out.push_str(&format!("  {growth:.4}    {price:>12.2}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use merton_analytics::{ReturnObservation, dcf_share_price};
    use merton_events::WindowConfig;

    fn sample_result() -> AbnormalReturnResult {
        let event_date = NaiveDate::from_ymd_opt(2022, 8, 5).unwrap();
        let windows = WindowConfig::default().windows_for(event_date).unwrap();
        AbnormalReturnResult {
            label: "Merger Announced".to_string(),
            event_date,
            windows,
            market_model: MarketModelResult {
                beta: 0.85,
                estimation_sample_size: 120,
            },
            abnormal_returns: vec![ReturnObservation::new(event_date, 0.345)],
            car: 0.345,
            aar: 0.345,
            std_ar: 0.02,
            t_ar: vec![17.25],
            std_car: 0.02,
            t_car: 17.25,
        }
    }

    #[test]
    fn test_event_summary_contains_headline_numbers() {
        let text = event_summary(&sample_result());
        assert!(text.contains("Merger Announced (2022-08-05)"));
        assert!(text.contains("0.8500"));
        assert!(text.contains("CAR:"));
        assert!(text.contains("17.250"));
    }

    #[test]
    fn test_study_summary_renders_failures() {
        let outcomes = vec![
            EventOutcome {
                label: "Merger Announced".to_string(),
                result: Ok(sample_result()),
            },
            EventOutcome {
                label: "Broken".to_string(),
                result: Err(merton_analytics::AnalyticsError::EmptyEventWindow.into()),
            },
        ];
        let text = study_summary("IRBT", "^GSPC", &outcomes);
        assert!(text.contains("IRBT vs ^GSPC"));
        assert!(text.contains("2 event(s)"));
        assert!(text.contains("Merger Announced"));
        assert!(text.contains("Broken\n  failed:"));
    }

    #[test]
    fn test_cost_of_capital_summary_with_and_without_wacc() {
        let model = MarketModelResult {
            beta: 0.77,
            estimation_sample_size: 60,
        };
        let without = cost_of_capital_summary("IRBT", &model, 0.0846, None);
        assert!(without.contains("cost of equity"));
        assert!(!without.contains("WACC"));

        let with = cost_of_capital_summary("IRBT", &model, 0.0846, Some(0.0795));
        assert!(with.contains("WACC"));
        assert!(with.contains("7.95%"));
    }

    #[test]
    fn test_valuation_summary_shows_price() {
        let params = DcfParams {
            free_cash_flows: vec![100.0, 110.0],
            shares_outstanding: 10.0,
            net_debt: 500.0,
            growth_rate: 0.05,
            discount_rate: 0.10,
        };
        let valuation = dcf_share_price(&params).unwrap();
        let text = valuation_summary(&params, &valuation);
        assert!(text.contains("share price"));
        assert!(text.contains("150.00"));
        assert!(text.contains("2000.00"));
    }

    #[test]
    fn test_curve_summary_lists_every_rate() {
        let text = curve_summary(&[(0.035, 141.2), (0.040, 148.9)]);
        assert!(text.contains("0.0350"));
        assert!(text.contains("0.0400"));
        assert!(text.contains("148.90"));
    }
}
