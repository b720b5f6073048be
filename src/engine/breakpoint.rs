//! Percentile breakpoints and the ranges between them.
//!
//! A [`Breakpoint`] is a percentile position in `[0, 100]`. Identity is numeric,
//! so `0`, `0.0` and `00` all name the origin. Breakpoints order totally and hash
//! on their normalised bit pattern so they can key graph adjacency maps.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A percentile position in `[0, 100]`.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct Breakpoint(f64);

/// The origin breakpoint (percentile 0).
pub const ORIGIN: Breakpoint = Breakpoint(0.0);

/// The upper universal bound (percentile 100).
pub const TOTAL: Breakpoint = Breakpoint(100.0);

/// Total mass of a distribution: the size of the range `(ORIGIN, TOTAL)`.
pub const TOTAL_MASS: f64 = 1.0;

impl Breakpoint {
    /// Creates a breakpoint, returning `None` when `value` is not a finite
    /// number in `[0, 100]`.
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && (0.0..=100.0).contains(&value) {
            // Collapse -0.0 onto 0.0 so equality and hashing agree.
            Some(Breakpoint(if value == 0.0 { 0.0 } else { value }))
        } else {
            None
        }
    }

    /// The percentile value.
    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_origin(self) -> bool {
        self == ORIGIN
    }

    pub fn is_total(self) -> bool {
        self == TOTAL
    }
}

impl PartialEq for Breakpoint {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Breakpoint {}

impl Hash for Breakpoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for Breakpoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Breakpoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // f64's Display is the shortest round-trip form: 0, 50, 99.9, 100.
        write!(f, "{}", self.0)
    }
}

impl FromStr for Breakpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not a number", s))?;
        Breakpoint::new(value).ok_or_else(|| format!("{} is outside [0, 100]", s))
    }
}

impl TryFrom<f64> for Breakpoint {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Breakpoint::new(value).ok_or_else(|| format!("{} is outside [0, 100]", value))
    }
}

impl From<Breakpoint> for f64 {
    fn from(b: Breakpoint) -> f64 {
        b.0
    }
}

/// A forward range between two breakpoints (`lower < upper`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub lower: Breakpoint,
    pub upper: Breakpoint,
}

impl Range {
    /// Creates a forward range, or `None` when `lower >= upper`.
    pub fn new(lower: Breakpoint, upper: Breakpoint) -> Option<Self> {
        (lower < upper).then_some(Range { lower, upper })
    }

    /// The range spanning the whole distribution.
    pub fn full() -> Self {
        Range { lower: ORIGIN, upper: TOTAL }
    }

    /// Width in percentile points.
    pub fn width(&self) -> f64 {
        self.upper.value() - self.lower.value()
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}
