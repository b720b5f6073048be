//! # Range Graph
//!
//! Signed weighted graph over percentile breakpoints.
//!
//! Every known range `(lower, upper, size)` is stored as two directed edges:
//! `lower → upper` with weight `+size` and `upper → lower` with weight `-size`.
//! The graph is therefore anti-symmetric: for any connected pair `(a, b)`,
//! `weight(a → b) == -weight(b → a)` holds exactly, because both directions are
//! always written together through [`RangeGraph::set_range`].
//!
//! The weight of the edge `ORIGIN → v` is the offset of `v`: the cumulative mass
//! below percentile `v`.
//!
//! A graph is built fresh for each distribution and owned exclusively by one
//! closure computation.

use rustc_hash::FxHashMap;

use crate::engine::breakpoint::{Breakpoint, ORIGIN, TOTAL, TOTAL_MASS};

/// Signed weighted graph keyed by breakpoint.
#[derive(Debug, Clone, Default)]
pub struct RangeGraph {
    adjacency: FxHashMap<Breakpoint, FxHashMap<Breakpoint, f64>>,
}

impl RangeGraph {
    /// Creates a graph holding only the total-mass edge `ORIGIN ↔ TOTAL = 1.0`.
    pub fn seeded() -> Self {
        let mut g = Self::default();
        g.set_range(ORIGIN, TOTAL, TOTAL_MASS);
        g
    }

    /// Writes the edge pair `from → to = weight`, `to → from = -weight`,
    /// overwriting any prior edges between the two breakpoints.
    ///
    /// Self-edges are ignored.
    pub fn set_range(&mut self, from: Breakpoint, to: Breakpoint, weight: f64) {
        if from == to {
            return;
        }
        self.adjacency.entry(from).or_default().insert(to, weight);
        self.adjacency.entry(to).or_default().insert(from, -weight);
    }

    /// Writes the edge pair only if no edge exists between the two breakpoints.
    ///
    /// Returns `true` if the edges were inserted.
    pub fn insert_if_missing(&mut self, from: Breakpoint, to: Breakpoint, weight: f64) -> bool {
        if from == to || self.has_edge(from, to) {
            return false;
        }
        self.set_range(from, to, weight);
        true
    }

    /// Weight of the directed edge `from → to`, if present.
    pub fn weight(&self, from: Breakpoint, to: Breakpoint) -> Option<f64> {
        self.adjacency.get(&from).and_then(|n| n.get(&to)).copied()
    }

    pub fn has_edge(&self, from: Breakpoint, to: Breakpoint) -> bool {
        self.weight(from, to).is_some()
    }

    /// Offset of `v` relative to the origin, i.e. `weight(ORIGIN → v)`.
    ///
    /// The origin itself has offset `0.0`.
    pub fn offset(&self, v: Breakpoint) -> Option<f64> {
        if v.is_origin() {
            Some(0.0)
        } else {
            self.weight(ORIGIN, v)
        }
    }

    /// Outgoing edges of `v`, sorted by neighbour breakpoint.
    ///
    /// Sorting makes every traversal independent of insertion order.
    pub fn sorted_neighbors(&self, v: Breakpoint) -> Vec<(Breakpoint, f64)> {
        let mut out: Vec<(Breakpoint, f64)> = self
            .adjacency
            .get(&v)
            .map(|n| n.iter().map(|(k, w)| (*k, *w)).collect())
            .unwrap_or_default();
        out.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        out
    }

    /// All breakpoints that appear in at least one edge, sorted ascending.
    pub fn breakpoints(&self) -> Vec<Breakpoint> {
        let mut out: Vec<Breakpoint> = self.adjacency.keys().copied().collect();
        out.sort_unstable();
        out
    }

    /// Number of breakpoints in the graph.
    pub fn breakpoint_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of unordered breakpoint pairs joined by an edge.
    pub fn range_count(&self) -> usize {
        self.adjacency.values().map(|n| n.len()).sum::<usize>() / 2
    }

    /// Iterates over every directed edge as `(from, to, weight)` in arbitrary order.
    pub fn edges(&self) -> impl Iterator<Item = (Breakpoint, Breakpoint, f64)> + '_ {
        self.adjacency
            .iter()
            .flat_map(|(from, n)| n.iter().map(move |(to, w)| (*from, *to, *w)))
    }
}
