//! Graph construction from raw range measurements.

use crate::engine::breakpoint::Range;
use crate::engine::config::ClosureConfig;
use crate::engine::errors::ClosureError;
use crate::engine::graph::RangeGraph;
use crate::frontend::label::{format_range_label, parse_range_label};

/// A raw `(range-label, size)` pair as read from a table.
///
/// A blank `size` means the range was not measured.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measurement {
    pub label: String,
    pub size: String,
}

impl Measurement {
    pub fn new(label: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            size: size.into(),
        }
    }

    /// Whether this measurement carries no value.
    pub fn is_blank(&self) -> bool {
        self.size.trim().is_empty()
    }

    /// Parses the label and size, or returns `Ok(None)` for a blank measurement.
    pub fn parse(&self, marker: char) -> Result<Option<(Range, f64)>, ClosureError> {
        if self.is_blank() {
            return Ok(None);
        }
        let range = parse_range_label(&self.label, marker)?;
        let size = parse_size(&self.label, &self.size)?;
        Ok(Some((range, size)))
    }
}

impl<L: Into<String>, S: Into<String>> From<(L, S)> for Measurement {
    fn from((label, size): (L, S)) -> Self {
        Measurement::new(label, size)
    }
}

/// Parses a size as a finite decimal.
pub(crate) fn parse_size(label: &str, text: &str) -> Result<f64, ClosureError> {
    let invalid = || ClosureError::InvalidSize {
        label: label.to_string(),
        text: text.to_string(),
    };
    let value: f64 = text.trim().parse().map_err(|_| invalid())?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid())
    }
}

/// Builds the signed range graph for one distribution.
///
/// The total-mass edge `0 ↔ 100 = 1.0` is seeded first. Blank measurements are
/// skipped; every other measurement writes the edge pair `lower ↔ upper`. When
/// the same range is measured twice the values are reconciled under
/// `config.conflicts` and the later value is kept.
pub fn build_graph(
    measurements: &[Measurement],
    config: &ClosureConfig,
) -> Result<RangeGraph, ClosureError> {
    let mut graph = RangeGraph::seeded();
    let mut skipped = 0usize;

    for m in measurements {
        let Some((range, size)) = m.parse(config.marker)? else {
            skipped += 1;
            continue;
        };
        if let Some(previous) = graph.weight(range.lower, range.upper) {
            config.reconcile(previous, size, || ClosureError::ConflictingMeasurement {
                label: format_range_label(&range, config.marker),
                previous,
                current: size,
            })?;
        }
        graph.set_range(range.lower, range.upper, size);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        measurements = measurements.len(),
        blank = skipped,
        breakpoints = graph.breakpoint_count(),
        ranges = graph.range_count(),
        "built range graph"
    );
    #[cfg(not(feature = "tracing"))]
    let _ = skipped;

    Ok(graph)
}
