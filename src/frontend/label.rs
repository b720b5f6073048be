//! Range labels of the form `<marker><lower><marker><upper>`.
//!
//! With the default marker `p`, `p0p50` names the bottom half of a distribution
//! and `p99.9p100` the top 0.1%.

use crate::engine::breakpoint::{Breakpoint, Range};
use crate::engine::errors::ClosureError;

/// Parses a range label into a forward [`Range`].
///
/// The label must consist of exactly two marker-prefixed numeric components
/// with `lower < upper`, both in `[0, 100]`.
pub fn parse_range_label(label: &str, marker: char) -> Result<Range, ClosureError> {
    let malformed = |reason: String| ClosureError::MalformedLabel {
        label: label.to_string(),
        reason,
    };

    let mut parts = label.split(marker);
    match parts.next() {
        Some("") => {}
        _ => return Err(malformed(format!("must start with '{}'", marker))),
    }
    let (lower, upper) = match (parts.next(), parts.next(), parts.next()) {
        (Some(l), Some(u), None) => (l, u),
        _ => {
            return Err(malformed(format!(
                "expected exactly two '{}'-prefixed breakpoints",
                marker
            )))
        }
    };

    let lower: Breakpoint = lower.parse().map_err(malformed)?;
    let upper: Breakpoint = upper.parse().map_err(malformed)?;
    Range::new(lower, upper)
        .ok_or_else(|| malformed(format!("lower bound {} is not below upper bound {}", lower, upper)))
}

/// Formats a range as a label, e.g. `p99p99.9`.
pub fn format_range_label(range: &Range, marker: char) -> String {
    format!("{}{}{}{}", marker, range.lower, marker, range.upper)
}
