//! Extraction of forward ranges from the completed graph.

use crate::engine::breakpoint::Range;
use crate::engine::graph::RangeGraph;
use crate::engine::propagate::Propagation;
use crate::frontend::label::format_range_label;

/// A range with its size (share of total mass).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeRecord {
    pub range: Range,
    pub size: f64,
}

impl RangeRecord {
    pub fn label(&self, marker: char) -> String {
        format_range_label(&self.range, marker)
    }

    /// Size rendered as the shortest round-trip decimal.
    pub fn size_text(&self) -> String {
        format!("{}", self.size)
    }
}

/// Emits one record per edge pair whose endpoints were both reached from the
/// origin, in ascending orientation, sorted by `(lower, upper)`.
///
/// Only the `lower → upper` direction of each pair is read, so every unordered
/// pair appears exactly once and no record has `upper <= lower`. For
/// non-negative shares this is exactly the set of non-negative edges.
pub fn format_ranges(graph: &RangeGraph, propagation: &Propagation) -> Vec<RangeRecord> {
    let mut out: Vec<RangeRecord> = graph
        .edges()
        .filter(|(from, to, _)| {
            propagation.offsets.contains_key(from) && propagation.offsets.contains_key(to)
        })
        .filter_map(|(from, to, size)| Range::new(from, to).map(|range| RangeRecord { range, size }))
        .collect();
    out.sort_unstable_by(|a, b| a.range.cmp(&b.range));
    out
}
