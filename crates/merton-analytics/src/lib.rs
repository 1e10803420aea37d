#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/mertonlabs/merton/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod market_model;
pub mod returns;
pub mod valuation;

pub use error::{AnalyticsError, Result};
pub use market_model::{MarketModelResult, capm_cost_of_equity, estimate_beta};
pub use returns::{AlignedReturn, ReturnObservation, ReturnSeries, compute_returns, normalize};
pub use valuation::{
    DcfParams, DcfValuation, dcf_share_price, free_cash_flow, share_price_curve, wacc,
};
