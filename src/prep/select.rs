//! Ranges of interest.
//!
//! A closure usually holds far more ranges than a caller wants to show. A
//! [`RangeSelection`] names the ones to keep, either as explicit labels or as a
//! percent-bar descriptor such as `percentBar-0-90-99-99.9-100`, which selects
//! the consecutive ranges `[0,90]`, `[90,99]`, `[99,99.9]` and `[99.9,100]`.

use rustc_hash::FxHashSet;

use crate::engine::breakpoint::{Breakpoint, Range, ORIGIN, TOTAL};
use crate::engine::closure::Closure;
use crate::engine::errors::ClosureError;
use crate::engine::format::RangeRecord;
use crate::frontend::label::parse_range_label;
use crate::prep::layout::BarSegment;

/// Prefix of a percent-bar descriptor.
pub const PERCENT_BAR_PREFIX: &str = "percentBar";

const PERCENT_BAR_SEPARATOR: char = '-';

/// An ordered set of ranges to keep from a closure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeSelection {
    ranges: Vec<Range>,
}

impl RangeSelection {
    /// Selects the ranges named by `labels`, in the given order. Duplicates are
    /// dropped.
    pub fn from_labels<I, S>(labels: I, marker: char) -> Result<Self, ClosureError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ranges = Vec::new();
        for label in labels {
            ranges.push(parse_range_label(label.as_ref().trim(), marker)?);
        }
        Ok(Self::from_ranges(ranges))
    }

    /// Selects the consecutive ranges of a percent-bar descriptor.
    pub fn from_percent_bar(descriptor: &str) -> Result<Self, ClosureError> {
        let breakpoints = parse_percent_bar(descriptor)?;
        Ok(Self::from_ranges(
            breakpoints
                .windows(2)
                .filter_map(|w| Range::new(w[0], w[1]))
                .collect(),
        ))
    }

    pub fn from_ranges(ranges: Vec<Range>) -> Self {
        let mut seen = FxHashSet::default();
        let ranges = ranges.into_iter().filter(|r| seen.insert(*r)).collect();
        Self { ranges }
    }

    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn contains(&self, range: &Range) -> bool {
        self.ranges.contains(range)
    }

    /// Records of the selected ranges present in `closure`, in selection order.
    ///
    /// Selected ranges that the closure could not derive are skipped.
    pub fn filter(&self, closure: &Closure) -> Vec<RangeRecord> {
        self.ranges
            .iter()
            .filter_map(|r| closure.size(r).map(|size| RangeRecord { range: *r, size }))
            .collect()
    }

    /// Selected ranges that `closure` could not derive.
    pub fn missing(&self, closure: &Closure) -> Vec<Range> {
        self.ranges
            .iter()
            .filter(|r| closure.size(r).is_none())
            .copied()
            .collect()
    }
}

/// Whether `s` looks like a percent-bar descriptor.
pub fn is_percent_bar(s: &str) -> bool {
    s.starts_with(PERCENT_BAR_PREFIX)
}

/// Parses `percentBar-0-x2-…-100` into its strictly increasing breakpoints.
pub fn parse_percent_bar(descriptor: &str) -> Result<Vec<Breakpoint>, ClosureError> {
    let invalid = |reason: &str| {
        ClosureError::ValidationError(format!(
            "invalid percent-bar descriptor '{}': {}",
            descriptor, reason
        ))
    };

    let mut parts = descriptor.split(PERCENT_BAR_SEPARATOR);
    if parts.next() != Some(PERCENT_BAR_PREFIX) {
        return Err(invalid("missing 'percentBar' prefix"));
    }
    let breakpoints = parts
        .map(|p| p.parse::<Breakpoint>().map_err(|e| invalid(&e)))
        .collect::<Result<Vec<_>, _>>()?;

    if breakpoints.first() != Some(&ORIGIN) || breakpoints.last() != Some(&TOTAL) {
        return Err(invalid("must start at 0 and end at 100"));
    }
    if breakpoints.windows(2).any(|w| w[0] >= w[1]) {
        return Err(invalid("breakpoints must be strictly increasing"));
    }
    Ok(breakpoints)
}

/// The uniform reference bar of a percent-bar descriptor: every segment's size
/// equals its width as a share of the population.
pub fn percent_bar_segments(descriptor: &str) -> Result<Vec<BarSegment>, ClosureError> {
    let breakpoints = parse_percent_bar(descriptor)?;
    let mut out = Vec::with_capacity(breakpoints.len().saturating_sub(1));
    let mut size_lower = 0.0;
    for w in breakpoints.windows(2) {
        let Some(range) = Range::new(w[0], w[1]) else {
            continue;
        };
        let size = range.width() / 100.0;
        out.push(BarSegment {
            series: descriptor.to_string(),
            range,
            size,
            size_lower,
            size_upper: size_lower + size,
        });
        size_lower += size;
    }
    Ok(out)
}
