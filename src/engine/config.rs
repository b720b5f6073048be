//! Configuration for closure computation, dataset reading and bar layout.

use crate::engine::errors::ClosureError;

/// Default label marker: `p0p50` is the range from percentile 0 to 50.
pub const DEFAULT_MARKER: char = 'p';

/// Default absolute tolerance when comparing two values for the same quantity.
pub const DEFAULT_TOLERANCE: f64 = 1e-7;

/// What to do when measurements disagree with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ConflictPolicy {
    /// Fail with [`ClosureError::ConflictingMeasurement`] or
    /// [`ClosureError::InconsistentPath`].
    #[default]
    Reject,
    /// Log a warning and continue. Repeated measurements of a range keep the
    /// last value; a breakpoint keeps the first offset assigned to it.
    Warn,
}

impl std::str::FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reject" => Ok(ConflictPolicy::Reject),
            "warn" => Ok(ConflictPolicy::Warn),
            other => Err(format!("unknown conflict policy '{}' (expected reject or warn)", other)),
        }
    }
}

/// Configuration for a single closure computation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClosureConfig {
    /// Character separating the breakpoints in a range label
    pub marker: char,
    /// Absolute tolerance for conflict detection
    pub tolerance: f64,
    /// Handling of disagreeing measurements
    pub conflicts: ConflictPolicy,
}

impl Default for ClosureConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER,
            tolerance: DEFAULT_TOLERANCE,
            conflicts: ConflictPolicy::Reject,
        }
    }
}

impl ClosureConfig {
    pub fn with_marker(mut self, marker: char) -> Self {
        self.marker = marker;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_conflicts(mut self, conflicts: ConflictPolicy) -> Self {
        self.conflicts = conflicts;
        self
    }

    /// Checks that two values for the same quantity agree within tolerance.
    ///
    /// Under [`ConflictPolicy::Reject`] a disagreement becomes the error built by
    /// `make_err`; under [`ConflictPolicy::Warn`] it is logged and `Ok(())` is
    /// returned.
    pub(crate) fn reconcile(
        &self,
        existing: f64,
        incoming: f64,
        make_err: impl FnOnce() -> ClosureError,
    ) -> Result<(), ClosureError> {
        if (existing - incoming).abs() <= self.tolerance {
            return Ok(());
        }
        match self.conflicts {
            ConflictPolicy::Reject => Err(make_err()),
            ConflictPolicy::Warn => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %make_err(), "tolerating inconsistent measurement");
                #[cfg(not(feature = "tracing"))]
                let _ = make_err;
                Ok(())
            }
        }
    }
}

/// Default relative threshold for stacked-bar bound discrepancies (1%).
pub const DEFAULT_LAYOUT_THRESHOLD: f64 = 0.01;

/// Configuration for stacked-bar layout.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutConfig {
    /// Relative difference above which a recomputed bound is reported
    pub consistency_threshold: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            consistency_threshold: DEFAULT_LAYOUT_THRESHOLD,
        }
    }
}

/// Configuration for reading a delimited dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableConfig {
    /// Metadata rows preceding the column-name row
    pub header_rows_to_skip: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            header_rows_to_skip: 1,
        }
    }
}
