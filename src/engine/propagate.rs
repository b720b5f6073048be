//! Origin offset propagation.
//!
//! Walks the connected component containing the origin and gives every reached
//! breakpoint `v` a direct edge `ORIGIN → v` whose weight is the offset of `v`
//! (the mass below percentile `v`). Breakpoints outside that component are left
//! untouched and drop out of every later phase.
//!
//! The walk is a depth-first search over an explicit stack of frames. Each frame
//! carries the offset implied by the path that pushed it, so no path list has to
//! be kept and no recursion depth is assumed.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::engine::breakpoint::{Breakpoint, ORIGIN, TOTAL, TOTAL_MASS};
use crate::engine::config::ClosureConfig;
use crate::engine::errors::ClosureError;
use crate::engine::graph::RangeGraph;

/// A pending visit: `breakpoint` reached with the offset implied by its path.
#[derive(Debug, Clone, Copy)]
struct Frame {
    breakpoint: Breakpoint,
    offset: f64,
}

/// Result of the propagation phase.
#[derive(Debug, Clone, Default)]
pub struct Propagation {
    /// Offsets of every breakpoint reached from the origin, origin included.
    pub offsets: FxHashMap<Breakpoint, f64>,
    /// Breakpoints that received a traversal-synthesised origin edge.
    pub synthesized: Vec<Breakpoint>,
}

impl Propagation {
    /// Reached breakpoints, sorted ascending.
    pub fn reached(&self) -> Vec<Breakpoint> {
        let mut out: Vec<Breakpoint> = self.offsets.keys().copied().collect();
        out.sort_unstable();
        out
    }
}

/// Assigns an origin offset to every breakpoint reachable from [`ORIGIN`].
///
/// A breakpoint that already has a direct edge to the origin keeps it: measured
/// inputs take precedence over traversal-derived values. Otherwise the
/// edge pair `ORIGIN ↔ v` is inserted with the path offset, together with the
/// complement pair `v ↔ TOTAL = 1.0 - offset` when that pair is missing.
///
/// Each breakpoint is processed exactly once. Every other path that reaches an
/// already-processed breakpoint is checked against its assigned offset and
/// reconciled under `config.conflicts`.
pub fn propagate_origin(
    graph: &mut RangeGraph,
    config: &ClosureConfig,
) -> Result<Propagation, ClosureError> {
    let mut result = Propagation::default();
    result.offsets.insert(ORIGIN, 0.0);

    let mut stack: SmallVec<[Frame; 32]> = SmallVec::new();
    push_neighbors(graph, ORIGIN, 0.0, &mut stack);

    while let Some(Frame { breakpoint: peek, offset }) = stack.pop() {
        if let Some(&assigned) = result.offsets.get(&peek) {
            config.reconcile(assigned, offset, || inconsistent(peek, assigned, offset))?;
            continue;
        }

        let assigned = match graph.weight(ORIGIN, peek) {
            Some(direct) => {
                config.reconcile(direct, offset, || inconsistent(peek, direct, offset))?;
                direct
            }
            None => {
                graph.set_range(ORIGIN, peek, offset);
                if peek != TOTAL {
                    graph.insert_if_missing(peek, TOTAL, TOTAL_MASS - offset);
                }
                result.synthesized.push(peek);
                offset
            }
        };
        result.offsets.insert(peek, assigned);
        push_neighbors(graph, peek, assigned, &mut stack);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        reached = result.offsets.len(),
        synthesized = result.synthesized.len(),
        unreachable = graph.breakpoint_count().saturating_sub(result.offsets.len()),
        "propagated origin offsets"
    );

    Ok(result)
}

fn push_neighbors(
    graph: &RangeGraph,
    from: Breakpoint,
    from_offset: f64,
    stack: &mut SmallVec<[Frame; 32]>,
) {
    // Reverse so the smallest neighbour is popped first.
    for (breakpoint, weight) in graph.sorted_neighbors(from).into_iter().rev() {
        stack.push(Frame {
            breakpoint,
            offset: from_offset + weight,
        });
    }
}

fn inconsistent(breakpoint: Breakpoint, assigned: f64, derived: f64) -> ClosureError {
    ClosureError::InconsistentPath {
        breakpoint: breakpoint.to_string(),
        assigned,
        derived,
    }
}
