//! Error types for percentile closure computation.

use thiserror::Error;

/// Errors that can occur while parsing inputs or computing a closure.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in the future without breaking changes.
///
/// Every public API returns `Result<T, ClosureError>`; the core never panics on
/// malformed input and never attempts partial recovery.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ClosureError {
    /// A range label that does not split into exactly a lower and an upper
    /// numeric breakpoint, or whose breakpoints are out of order or out of
    /// the [0, 100] domain.
    #[error("malformed range label '{label}': {reason}")]
    MalformedLabel { label: String, reason: String },

    /// A size that is present but is not a finite decimal.
    #[error("invalid size '{text}' for range '{label}'")]
    InvalidSize { label: String, text: String },

    /// Two measurements of the same range disagree beyond tolerance.
    #[error("conflicting measurements for range '{label}': {previous} then {current}")]
    ConflictingMeasurement {
        label: String,
        previous: f64,
        current: f64,
    },

    /// Two paths from the origin imply different offsets for a breakpoint.
    ///
    /// Raised when the measurements are individually well formed but not
    /// mutually consistent (e.g. `p0p50 = 0.3`, `p50p100 = 0.6`).
    #[error("inconsistent measurements at breakpoint {breakpoint}: offset {assigned} already assigned, path implies {derived}")]
    InconsistentPath {
        breakpoint: String,
        assigned: f64,
        derived: f64,
    },

    /// Syntax error in a delimited table.
    #[error("parse error: {0}")]
    ParseError(String),

    /// Structurally invalid dataset or selection (bad header, ragged rows,
    /// malformed percent-bar descriptor).
    #[error("validation error: {0}")]
    ValidationError(String),

    /// A stacked-bar layout could not place a range.
    #[error("layout error: {0}")]
    Layout(String),

    /// Failure while closing one distribution of a dataset.
    #[error("distribution '{key}': {source}")]
    Group {
        key: String,
        #[source]
        source: Box<ClosureError>,
    },

    /// Internal error (programmer error, not user error).
    #[error("internal error: {0}")]
    Internal(String),
}
