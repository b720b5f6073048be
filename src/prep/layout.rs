//! Stacked-bar layout of selected ranges.
//!
//! Places each range of a series on a horizontal bar spanning the total mass:
//! a range `[lower, upper]` occupies `[size_lower, size_upper]`, where
//! `size_lower` is the mass below percentile `lower`. Ranges are laid out in
//! `(lower, upper)` order starting from bound `0 → 0.0`, so the lower bound of
//! every range must have been reached by an earlier one.

use rustc_hash::FxHashMap;

use crate::engine::breakpoint::{Breakpoint, Range, ORIGIN};
use crate::engine::config::LayoutConfig;
use crate::engine::errors::ClosureError;
use crate::engine::format::RangeRecord;

/// One segment of a stacked bar.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BarSegment {
    /// Series (or reference-bar descriptor) the segment belongs to
    pub series: String,
    pub range: Range,
    pub size: f64,
    /// Cumulative mass below `range.lower`
    pub size_lower: f64,
    /// Cumulative mass below `range.upper`
    pub size_upper: f64,
}

/// Lays out `records` as a stacked bar for `series`.
///
/// When a bound is reached twice with values differing by more than
/// `config.consistency_threshold` (relative), a warning is logged and the later
/// value wins.
///
/// # Errors
///
/// Returns [`ClosureError::Layout`] when a range starts at a breakpoint that no
/// earlier range ends at.
pub fn stack_ranges(
    series: &str,
    records: &[RangeRecord],
    config: &LayoutConfig,
) -> Result<Vec<BarSegment>, ClosureError> {
    let mut sorted: Vec<RangeRecord> = records.to_vec();
    sorted.sort_unstable_by(|a, b| a.range.cmp(&b.range));

    let mut bounds: FxHashMap<Breakpoint, f64> = FxHashMap::default();
    bounds.insert(ORIGIN, 0.0);

    let mut out = Vec::with_capacity(sorted.len());
    for record in sorted {
        let range = record.range;
        let size_lower = *bounds.get(&range.lower).ok_or_else(|| {
            ClosureError::Layout(format!(
                "series '{}': lower bound {} of range {} is not reached by any earlier range",
                series, range.lower, range
            ))
        })?;
        let size_upper = size_lower + record.size;

        if let Some(&existing) = bounds.get(&range.upper) {
            if relative_difference(size_upper, existing) > config.consistency_threshold {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    series,
                    percentile = %range.upper,
                    computed = size_upper,
                    previous = existing,
                    "inconsistent stacked-bar bound"
                );
            }
        }
        bounds.insert(range.upper, size_upper);

        out.push(BarSegment {
            series: series.to_string(),
            range,
            size: record.size,
            size_lower,
            size_upper,
        });
    }
    Ok(out)
}

fn relative_difference(computed: f64, previous: f64) -> f64 {
    if computed == 0.0 {
        (computed - previous).abs()
    } else {
        ((computed - previous) / computed).abs()
    }
}
