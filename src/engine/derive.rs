//! Pairwise range derivation from origin offsets.

use crate::engine::breakpoint::Breakpoint;
use crate::engine::graph::RangeGraph;
use crate::engine::propagate::Propagation;

/// Fills in the range between every pair of reached, non-origin breakpoints.
///
/// For a missing pair `(v1, v2)` the edge pair is written as
/// `v1 → v2 = offset(v2) - offset(v1)`. Existing edges, whether measured or
/// synthesised during propagation, are never overwritten. Breakpoints that were
/// not reached from the origin have no offset and are skipped.
///
/// Returns the number of ranges added. Runs in O(B²) for B reached breakpoints.
pub fn derive_pairwise(graph: &mut RangeGraph, propagation: &Propagation) -> usize {
    let reached: Vec<(Breakpoint, f64)> = propagation
        .reached()
        .into_iter()
        .filter(|b| !b.is_origin())
        .filter_map(|b| graph.offset(b).map(|o| (b, o)))
        .collect();

    let mut added = 0usize;
    for (i, &(v1, o1)) in reached.iter().enumerate() {
        for &(v2, o2) in &reached[i + 1..] {
            if graph.insert_if_missing(v1, v2, o2 - o1) {
                added += 1;
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(breakpoints = reached.len(), derived = added, "derived pairwise ranges");

    added
}
