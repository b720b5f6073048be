//! # Closure Pipeline
//!
//! Runs the four phases over one distribution:
//!
//! 1. [`build_graph`]: measurements become a signed graph over breakpoints
//! 2. [`propagate_origin`]: every breakpoint reachable from 0 gets an offset
//! 3. [`derive_pairwise`]: missing pairs are filled from offsets
//! 4. [`format_ranges`]: forward ranges are extracted
//!
//! Each call owns its graph exclusively, so independent distributions can be
//! closed concurrently without coordination.

use rustc_hash::FxHashMap;

use crate::engine::breakpoint::{Breakpoint, Range};
use crate::engine::builder::{build_graph, Measurement};
use crate::engine::config::ClosureConfig;
use crate::engine::derive::derive_pairwise;
use crate::engine::errors::ClosureError;
use crate::engine::format::{format_ranges, RangeRecord};
use crate::engine::propagate::propagate_origin;
use crate::frontend::label::parse_range_label;

/// Counters describing one closure computation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClosureStats {
    /// Distinct breakpoints named by non-blank measurements, plus 0 and 100
    pub breakpoints: usize,
    /// Breakpoints connected to the origin
    pub reached: usize,
    /// Breakpoints dropped because no path leads back to the origin
    pub unreachable: usize,
    /// Origin edges synthesised during propagation
    pub synthesized: usize,
    /// Ranges filled in by pairwise derivation
    pub derived: usize,
}

/// The full set of forward ranges derivable from one distribution's measurements.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Closure {
    records: Vec<RangeRecord>,
    #[cfg_attr(feature = "serde", serde(skip))]
    index: FxHashMap<Range, usize>,
    stats: ClosureStats,
}

impl Closure {
    fn new(records: Vec<RangeRecord>, stats: ClosureStats) -> Self {
        let index = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.range, i))
            .collect();
        Self { records, index, stats }
    }

    /// Records sorted by `(lower, upper)`.
    pub fn records(&self) -> &[RangeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stats(&self) -> ClosureStats {
        self.stats
    }

    /// Size of `range`, if it is part of the closure.
    pub fn size(&self, range: &Range) -> Option<f64> {
        self.index.get(range).map(|&i| self.records[i].size)
    }

    /// Size of the range between two breakpoints, in either order.
    pub fn size_between(&self, a: Breakpoint, b: Breakpoint) -> Option<f64> {
        Range::new(a.min(b), a.max(b)).and_then(|r| self.size(&r))
    }

    /// Size of the range named by `label`.
    pub fn size_of(&self, label: &str, marker: char) -> Result<Option<f64>, ClosureError> {
        Ok(self.size(&parse_range_label(label, marker)?))
    }

    /// Breakpoints present in the closure, sorted ascending.
    pub fn breakpoints(&self) -> Vec<Breakpoint> {
        let mut out: Vec<Breakpoint> = self
            .records
            .iter()
            .flat_map(|r| [r.range.lower, r.range.upper])
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// `(label, size-text)` pairs in record order.
    pub fn to_labeled(&self, marker: char) -> Vec<(String, String)> {
        self.records
            .iter()
            .map(|r| (r.label(marker), r.size_text()))
            .collect()
    }
}

/// Computes the closure of one distribution's measurements.
///
/// # Errors
///
/// * [`ClosureError::MalformedLabel`] / [`ClosureError::InvalidSize`] for a
///   non-blank measurement that does not parse.
/// * [`ClosureError::ConflictingMeasurement`] / [`ClosureError::InconsistentPath`]
///   when measurements disagree and `config.conflicts` is `Reject`.
///
/// # Example
///
/// ```rust,ignore
/// use percentile_closure::{compute_closure, ClosureConfig, Measurement};
///
/// let closure = compute_closure(&[Measurement::new("p0p50", "0.3")], &ClosureConfig::default())?;
/// assert_eq!(closure.len(), 3);
/// ```
pub fn compute_closure(
    measurements: &[Measurement],
    config: &ClosureConfig,
) -> Result<Closure, ClosureError> {
    let mut graph = build_graph(measurements, config)?;
    let breakpoints = graph.breakpoint_count();

    let propagation = propagate_origin(&mut graph, config)?;
    let derived = derive_pairwise(&mut graph, &propagation);
    let records = format_ranges(&graph, &propagation);

    let reached = propagation.offsets.len();
    let stats = ClosureStats {
        breakpoints,
        reached,
        unreachable: breakpoints.saturating_sub(reached),
        synthesized: propagation.synthesized.len(),
        derived,
    };

    #[cfg(feature = "tracing")]
    tracing::debug!(ranges = records.len(), ?stats, "computed closure");

    Ok(Closure::new(records, stats))
}

/// String-in, string-out closure with the default configuration.
///
/// Takes `(range-label, size-or-blank)` pairs and returns `(range-label, size)`
/// pairs for every derivable forward range.
pub fn compute_implicit_ranges<L, S>(pairs: &[(L, S)]) -> Result<Vec<(String, String)>, ClosureError>
where
    L: AsRef<str>,
    S: AsRef<str>,
{
    let config = ClosureConfig::default();
    let measurements: Vec<Measurement> = pairs
        .iter()
        .map(|(l, s)| Measurement::new(l.as_ref(), s.as_ref()))
        .collect();
    Ok(compute_closure(&measurements, &config)?.to_labeled(config.marker))
}
