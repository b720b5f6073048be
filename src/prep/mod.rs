//! Preparation steps around the closure engine.
//!
//! This module provides:
//! - **repair**: single-gap repair of partitioning series
//! - **select**: ranges of interest and percent-bar descriptors
//! - **layout**: stacked-bar bounds of selected ranges
//! - **batch**: closing every distribution of a dataset

pub mod repair;
pub mod select;
pub mod layout;
pub mod batch;
