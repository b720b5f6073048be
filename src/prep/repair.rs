//! Single-gap series repair.
//!
//! When a series lists the sizes of ranges that partition `[0, 100]` and exactly
//! one of them is blank, the blank can be recovered as the remaining mass:
//! `1.0 - Σ(others)`. This is a heuristic over the whole series, independent of
//! the graph closure, and only valid when the listed ranges form a partition.

use crate::engine::breakpoint::TOTAL_MASS;
use crate::engine::builder::{parse_size, Measurement};
use crate::engine::errors::ClosureError;

/// Outcome of [`repair_single_gap`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SeriesRepair {
    /// Every size is blank; the series carries no information.
    Empty,
    /// No size is blank.
    Complete,
    /// The single blank size was filled in.
    Repaired { label: String, size: f64 },
    /// More than one size is blank.
    Unrepairable { missing: usize },
}

impl SeriesRepair {
    /// Whether the series still holds at least one measurement.
    pub fn is_usable(&self) -> bool {
        !matches!(self, SeriesRepair::Empty)
    }
}

/// Fills the single blank size of a partitioning series with the remaining mass.
///
/// `measurements` is only modified in the [`SeriesRepair::Repaired`] case.
pub fn repair_single_gap(measurements: &mut [Measurement]) -> Result<SeriesRepair, ClosureError> {
    let missing: Vec<usize> = measurements
        .iter()
        .enumerate()
        .filter(|(_, m)| m.is_blank())
        .map(|(i, _)| i)
        .collect();

    if measurements.is_empty() || missing.len() == measurements.len() {
        return Ok(SeriesRepair::Empty);
    }
    match missing.as_slice() {
        [] => Ok(SeriesRepair::Complete),
        [index] => {
            let mut others = 0.0;
            for m in measurements.iter().filter(|m| !m.is_blank()) {
                others += parse_size(&m.label, &m.size)?;
            }
            let size = TOTAL_MASS - others;
            let target = &mut measurements[*index];
            target.size = format!("{}", size);

            #[cfg(feature = "tracing")]
            tracing::debug!(label = %target.label, size, "repaired single missing size");

            Ok(SeriesRepair::Repaired {
                label: target.label.clone(),
                size,
            })
        }
        many => Ok(SeriesRepair::Unrepairable { missing: many.len() }),
    }
}
