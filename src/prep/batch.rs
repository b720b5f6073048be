//! Closing every distribution of a dataset.
//!
//! Each `(year, series)` group is closed independently: optional single-gap
//! repair, then the closure pipeline, then optional selection of the ranges of
//! interest. Groups share no state, so with the `rayon` feature they are closed
//! in parallel. A group that fails is recorded in [`ClosedDataset::failed`]
//! and the others are still closed.

use std::collections::BTreeMap;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::engine::breakpoint::Range;
use crate::engine::builder::Measurement;
use crate::engine::closure::{compute_closure, Closure};
use crate::engine::config::ClosureConfig;
use crate::engine::errors::ClosureError;
use crate::engine::format::RangeRecord;
use crate::frontend::dataset::{Dataset, SeriesKey};
use crate::prep::repair::{repair_single_gap, SeriesRepair};
use crate::prep::select::RangeSelection;

/// Options for [`close_dataset`].
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub closure: ClosureConfig,
    /// Fill a single blank size per series before closing
    pub repair: bool,
    /// Keep only these ranges in [`ClosedSeries::records`]
    pub selection: Option<RangeSelection>,
}

/// One closed distribution.
#[derive(Debug, Clone)]
pub struct ClosedSeries {
    pub closure: Closure,
    /// Outcome of the repair step, when enabled
    pub repair: Option<SeriesRepair>,
    /// Selected records, or every closure record without a selection
    pub records: Vec<RangeRecord>,
    /// Selected ranges the closure could not derive
    pub missing: Vec<Range>,
}

impl ClosedSeries {
    /// Whether every selected range was derived.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Every closed distribution of a dataset.
#[derive(Debug, Default)]
pub struct ClosedDataset {
    pub series: BTreeMap<SeriesKey, ClosedSeries>,
    /// Groups without a single measured size
    pub skipped: Vec<SeriesKey>,
    /// Groups whose measurements could not be closed
    pub failed: Vec<(SeriesKey, ClosureError)>,
}

impl ClosedDataset {
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn get(&self, key: &SeriesKey) -> Option<&ClosedSeries> {
        self.series.get(key)
    }

    /// Fails with the first recorded group failure, wrapped in
    /// [`ClosureError::Group`].
    pub fn require_all_closed(mut self) -> Result<Self, ClosureError> {
        if self.failed.is_empty() {
            return Ok(self);
        }
        let (key, source) = self.failed.swap_remove(0);
        Err(ClosureError::Group {
            key: key.to_string(),
            source: Box::new(source),
        })
    }
}

enum GroupOutcome {
    Closed(SeriesKey, ClosedSeries),
    Skipped(SeriesKey),
    Failed(SeriesKey, ClosureError),
}

/// Closes every group of `dataset`.
///
/// Groups whose sizes are all blank are listed in [`ClosedDataset::skipped`];
/// groups that fail to close are listed with their error in
/// [`ClosedDataset::failed`]. Use [`ClosedDataset::require_all_closed`] to
/// turn any failure into an error.
pub fn close_dataset(dataset: &Dataset, options: &BatchOptions) -> ClosedDataset {
    #[cfg(feature = "rayon")]
    let outcomes: Vec<GroupOutcome> = dataset
        .groups
        .par_iter()
        .map(|(key, measurements)| close_group(key, measurements, options))
        .collect();
    #[cfg(not(feature = "rayon"))]
    let outcomes: Vec<GroupOutcome> = dataset
        .groups
        .iter()
        .map(|(key, measurements)| close_group(key, measurements, options))
        .collect();

    let mut out = ClosedDataset::default();
    for outcome in outcomes {
        match outcome {
            GroupOutcome::Closed(key, closed) => {
                out.series.insert(key, closed);
            }
            GroupOutcome::Skipped(key) => out.skipped.push(key),
            GroupOutcome::Failed(key, err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(distribution = %key, error = %err, "distribution not closed");
                out.failed.push((key, err));
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::info!(
        closed = out.series.len(),
        skipped = out.skipped.len(),
        failed = out.failed.len(),
        "closed dataset"
    );

    out
}

fn close_group(key: &SeriesKey, measurements: &[Measurement], options: &BatchOptions) -> GroupOutcome {
    if measurements.iter().all(Measurement::is_blank) {
        return GroupOutcome::Skipped(key.clone());
    }
    match close_measurements(measurements, options) {
        Ok(closed) => GroupOutcome::Closed(key.clone(), closed),
        Err(err) => GroupOutcome::Failed(key.clone(), err),
    }
}

fn close_measurements(measurements: &[Measurement], options: &BatchOptions) -> Result<ClosedSeries, ClosureError> {
    let mut measurements = measurements.to_vec();
    let repair = if options.repair {
        Some(repair_single_gap(&mut measurements)?)
    } else {
        None
    };

    let closure = compute_closure(&measurements, &options.closure)?;
    let (records, missing) = match &options.selection {
        Some(selection) => (selection.filter(&closure), selection.missing(&closure)),
        None => (closure.records().to_vec(), Vec::new()),
    };

    Ok(ClosedSeries {
        closure,
        repair,
        records,
        missing,
    })
}
