//! # Percentile Closure
//!
//! Derives every percentile-range share implied by sparse breakpoint
//! measurements of a distribution. Given, say, "the bottom 90% holds 60% of
//! total mass" and "the top 10% holds 40%", the closure adds every other range
//! that follows from them.
//!
//! ## Architecture
//!
//! The system is organized into several modules:
//!
//! - **engine**: The closure core. Measurements become a signed graph over
//!   breakpoints; offsets are propagated from percentile 0, missing pairs are
//!   derived, and forward ranges are extracted
//! - **frontend**: Range labels, delimited tables and per-distribution grouping
//! - **prep**: Single-gap repair, range selection, stacked-bar layout and batch
//!   processing
//! - **export**: Nested year → series → ranges documents
//!
//! ## Usage
//!
//! ```rust,ignore
//! use percentile_closure::compute_implicit_ranges;
//!
//! let ranges = compute_implicit_ranges(&[("p0p90", "0.6"), ("p0p50", "0.3"), ("p90p100", "0.4")])?;
//! // ranges now also holds ("p50p90", "0.3") and ("p50p100", "0.7").
//! ```

#![forbid(unsafe_code)]

pub mod engine;
pub mod frontend;
pub mod prep;
pub mod export;

// Re-export commonly used types
pub use engine::breakpoint::{Breakpoint, Range};
pub use engine::builder::Measurement;
pub use engine::closure::{compute_closure, compute_implicit_ranges, Closure, ClosureStats};
pub use engine::config::{ClosureConfig, ConflictPolicy, LayoutConfig, TableConfig};
pub use engine::errors::ClosureError;
pub use engine::format::RangeRecord;
pub use frontend::dataset::{Dataset, SeriesKey};
pub use prep::batch::{close_dataset, BatchOptions, ClosedDataset};
pub use prep::select::RangeSelection;

/// Parses semicolon-delimited source text and closes every distribution in it.
///
/// This is a convenience function that combines table parsing, grouping by
/// (year, series) and [`close_dataset`]. Only table-level problems are
/// errors; distributions that fail to close are listed in
/// [`ClosedDataset::failed`].
///
/// # Example
///
/// ```rust,ignore
/// use percentile_closure::{close_source, BatchOptions, TableConfig};
///
/// let source = "meta\nPercentile;Year;France\np0p50;2019;0.22\n";
/// let closed = close_source(source, &TableConfig::default(), &BatchOptions::default())?;
/// assert_eq!(closed.len(), 1);
/// ```
pub fn close_source(
    source: &str,
    table: &TableConfig,
    options: &BatchOptions,
) -> Result<ClosedDataset, ClosureError> {
    let dataset = Dataset::from_source(source, table)?;
    Ok(close_dataset(&dataset, options))
}
