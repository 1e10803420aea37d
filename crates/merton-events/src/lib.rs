#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/mertonlabs/merton/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod study;
pub mod windows;

pub use error::{EventStudyError, Result};
pub use study::{AbnormalReturnResult, EventOutcome, EventStudyEngine};
pub use windows::{EventSpec, EventWindows, WindowConfig};
