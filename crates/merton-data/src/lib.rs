#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/mertonlabs/merton/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod provider;
pub mod yahoo;

pub use error::{DataError, Result};
pub use provider::{Interval, PricePoint, PriceSeriesProvider};
pub use yahoo::YahooQuoteProvider;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
