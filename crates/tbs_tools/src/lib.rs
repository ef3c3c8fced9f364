//! # TBS Development Tools
//!
//! Command-line tools for scenario authors:
//! - Scenario validation
//! - Attachment audit export
//! - Condition and national objective reports

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod error;
pub mod report;
pub mod validate;
