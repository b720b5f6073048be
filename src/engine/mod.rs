//! The closure engine for percentile-range measurements.
//!
//! This module provides:
//! - **errors**: Error types for parsing and closure failures
//! - **breakpoint**: Percentile breakpoints and ranges
//! - **config**: Closure, table and layout configuration
//! - **graph**: Signed weighted graph over breakpoints
//! - **builder**: Graph construction from measurements
//! - **propagate**: Origin offset propagation
//! - **derive**: Pairwise range derivation
//! - **format**: Forward range extraction
//! - **closure**: The four-phase pipeline

pub mod errors;
pub mod breakpoint;
pub mod config;
pub mod graph;
pub mod builder;
pub mod propagate;
pub mod derive;
pub mod format;
pub mod closure;
