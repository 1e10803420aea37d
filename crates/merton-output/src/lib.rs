#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/mertonlabs/merton/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod report;

pub use export::{
    AbnormalReturnRecord, ExportError, ExportFormat, Exporter, abnormal_return_records,
    write_abnormal_returns_csv, write_results_json,
};
pub use report::{
    cost_of_capital_summary, curve_summary, event_summary, study_summary, valuation_summary,
};
