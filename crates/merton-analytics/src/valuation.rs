//! WACC and discounted-cash-flow share price estimation.

use crate::error::{AnalyticsError, Result};
use serde::{Deserialize, Serialize};

/// Weighted average cost of capital from the capital-structure split.
pub fn wacc(
    cost_of_equity: f64,
    cost_of_debt: f64,
    equity_value: f64,
    debt_value: f64,
) -> Result<f64> {
    let total = equity_value + debt_value;
    if !total.is_finite() || total <= 0.0 {
        return Err(AnalyticsError::InvalidInput(format!(
            "total capital must be positive, got {total}"
        )));
    }
    Ok(cost_of_equity * (equity_value / total) + cost_of_debt * (debt_value / total))
}

/// Inputs to the multi-period DCF share-price model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcfParams {
    /// Explicit-period free cash flow forecasts, in order (at least two).
    pub free_cash_flows: Vec<f64>,
    /// Shares outstanding, on the same unit basis as the cash flows.
    pub shares_outstanding: f64,
    /// Debt net of cash, subtracted from enterprise value.
    pub net_debt: f64,
    /// Perpetuity growth rate applied after the final explicit period.
    pub growth_rate: f64,
    /// Discount rate, typically the WACC.
    pub discount_rate: f64,
}

/// Output of a DCF valuation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DcfValuation {
    /// Present value of the forecast cash flows plus terminal value.
    pub enterprise_value: f64,
    /// Enterprise value less net debt.
    pub equity_value: f64,
    /// Equity value per share.
    pub share_price: f64,
}

/// Value the firm from explicit cash-flow forecasts plus a terminal value.
///
/// The terminal value `cf_n / (r - g)` is realized together with the final
/// explicit cash flow and the pair is discounted once at period `n`; the
/// earlier periods are discounted individually. There is no extra terminal
/// period.
pub fn dcf_share_price(params: &DcfParams) -> Result<DcfValuation> {
    let n = params.free_cash_flows.len();
    if n < 2 {
        return Err(AnalyticsError::InvalidInput(format!(
            "at least two explicit cash flows are required, got {n}"
        )));
    }
    if params.shares_outstanding <= 0.0 {
        return Err(AnalyticsError::InvalidInput(format!(
            "shares outstanding must be positive, got {}",
            params.shares_outstanding
        )));
    }
    let spread = params.discount_rate - params.growth_rate;
    if spread <= 0.0 {
        return Err(AnalyticsError::InvalidInput(format!(
            "discount rate {} must exceed growth rate {} for the perpetuity to converge",
            params.discount_rate, params.growth_rate
        )));
    }

    let last = params.free_cash_flows[n - 1];
    let terminal_value = last / spread;

    let discount = 1.0 + params.discount_rate;
    let explicit: f64 = params.free_cash_flows[..n - 1]
        .iter()
        .enumerate()
        .map(|(i, cf)| cf / discount.powi(i as i32 + 1))
        .sum();
    let terminal = (last + terminal_value) / discount.powi(n as i32);

    let enterprise_value = explicit + terminal;
    let equity_value = enterprise_value - params.net_debt;
    let share_price = equity_value / params.shares_outstanding;

    Ok(DcfValuation {
        enterprise_value,
        equity_value,
        share_price,
    })
}

/// Share price at each growth rate, preserving input order.
///
/// A single non-convergent rate fails the whole sweep; no partial output.
pub fn share_price_curve(params: &DcfParams, growth_rates: &[f64]) -> Result<Vec<(f64, f64)>> {
    growth_rates
        .iter()
        .map(|&growth_rate| {
            let point = DcfParams {
                growth_rate,
                ..params.clone()
            };
            dcf_share_price(&point).map(|valuation| (growth_rate, valuation.share_price))
        })
        .collect()
}

/// Unlevered free cash flow from financial-statement lines:
/// `EBIT * (1 - tax) + depreciation - capex - change in working capital`.
pub const fn free_cash_flow(
    ebit: f64,
    tax_rate: f64,
    depreciation: f64,
    capex: f64,
    change_in_working_capital: f64,
) -> f64 {
    ebit * (1.0 - tax_rate) + depreciation - capex - change_in_working_capital
}
