//! Asset allocation report for brokerage holdings exports.
//!
//! Holdings are read from a statement CSV, classified by a `SYMBOL:CLASS`
//! lookup file and summarised as value and percentage per asset class.

pub mod config;
pub mod csv;
pub mod domain;
pub mod error;
pub mod report;
