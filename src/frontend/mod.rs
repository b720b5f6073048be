//! The frontend module turns text into measurements.
//!
//! This module provides:
//! - **label**: Parsing and formatting of range labels (`p0p50`)
//! - **table**: Pest-based parser for semicolon-delimited tables
//! - **dataset**: Header cleanup and grouping of rows by (year, series)

pub mod label;
pub mod table;
pub mod dataset;
