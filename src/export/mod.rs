//! Export of closed datasets.
//!
//! Builds the nested `year → series → ranges` document consumed by charting
//! front ends, tagged with version metadata for compatibility checking.

use std::collections::BTreeMap;

use crate::engine::config::LayoutConfig;
use crate::engine::errors::ClosureError;
use crate::frontend::dataset::SeriesKey;
use crate::prep::batch::ClosedDataset;
use crate::prep::layout::{stack_ranges, BarSegment};
use crate::prep::select::percent_bar_segments;

/// Metadata included in exported documents for compatibility checking.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExportMetadata {
    /// Crate version string
    pub version: String,
    /// Feature flags enabled when the document was created
    pub features: Vec<String>,
}

impl ExportMetadata {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            features: get_enabled_features(),
        }
    }
}

/// One `(label, size)` entry of an exported series.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeEntry {
    pub label: String,
    pub size: f64,
}

/// Closed ranges of every series, keyed by year then series.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExportDocument {
    pub metadata: ExportMetadata,
    pub years: BTreeMap<String, BTreeMap<String, Vec<RangeEntry>>>,
}

impl ExportDocument {
    /// Builds the document from the (possibly selected) records of each series.
    pub fn from_closed(closed: &ClosedDataset, marker: char) -> Self {
        let mut years: BTreeMap<String, BTreeMap<String, Vec<RangeEntry>>> = BTreeMap::new();
        for (key, series) in &closed.series {
            let entries = series
                .records
                .iter()
                .map(|r| RangeEntry {
                    label: r.label(marker),
                    size: r.size,
                })
                .collect();
            years
                .entry(key.year.clone())
                .or_default()
                .insert(key.series.clone(), entries);
        }
        Self {
            metadata: ExportMetadata::current(),
            years,
        }
    }

    /// Validates that this document was produced by the current crate version
    /// with every feature it relies on.
    pub fn validate_compatibility(&self) -> Result<(), ClosureError> {
        validate_metadata(&self.metadata)
    }

    pub fn series_count(&self) -> usize {
        self.years.values().map(BTreeMap::len).sum()
    }
}

/// Stacked-bar layout of every series, keyed by year then series.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutDocument {
    pub metadata: ExportMetadata,
    pub years: BTreeMap<String, BTreeMap<String, Vec<BarSegment>>>,
    /// Series lacking at least one selected range, shown without a bar
    pub no_data: Vec<SeriesKey>,
}

impl LayoutDocument {
    /// Lays out the records of every series. When `reference_bar` names a
    /// percent-bar descriptor, its uniform bar is added to every year under the
    /// descriptor itself as series name.
    ///
    /// A selection is all-or-nothing per series: a series missing any selected
    /// range is listed in `no_data` instead of being laid out.
    pub fn from_closed(
        closed: &ClosedDataset,
        config: &LayoutConfig,
        reference_bar: Option<&str>,
    ) -> Result<Self, ClosureError> {
        let mut years: BTreeMap<String, BTreeMap<String, Vec<BarSegment>>> = BTreeMap::new();
        let mut no_data = Vec::new();
        for (key, series) in &closed.series {
            if !series.is_complete() {
                no_data.push(key.clone());
                continue;
            }
            let segments = stack_ranges(&key.series, &series.records, config)?;
            years
                .entry(key.year.clone())
                .or_default()
                .insert(key.series.clone(), segments);
        }
        if let Some(descriptor) = reference_bar {
            let reference = percent_bar_segments(descriptor)?;
            for by_series in years.values_mut() {
                by_series.insert(descriptor.to_string(), reference.clone());
            }
        }
        Ok(Self {
            metadata: ExportMetadata::current(),
            years,
            no_data,
        })
    }
}

fn validate_metadata(metadata: &ExportMetadata) -> Result<(), ClosureError> {
    let current_version = env!("CARGO_PKG_VERSION");
    if metadata.version != current_version {
        return Err(ClosureError::ValidationError(format!(
            "document version mismatch: created with version {}, current version is {}",
            metadata.version, current_version
        )));
    }

    let current_features = get_enabled_features();
    for required_feature in &metadata.features {
        if !current_features.contains(required_feature) {
            return Err(ClosureError::ValidationError(format!(
                "document requires feature '{}' which is not enabled",
                required_feature
            )));
        }
    }
    Ok(())
}

/// Returns a list of enabled feature flags.
fn get_enabled_features() -> Vec<String> {
    #[allow(unused_mut)]
    let mut features = Vec::new();

    #[cfg(feature = "rayon")]
    features.push("rayon".to_string());

    #[cfg(feature = "serde")]
    features.push("serde".to_string());

    #[cfg(feature = "tracing")]
    features.push("tracing".to_string());

    features
}

/// Serialises an export document to pretty-printed JSON.
#[cfg(feature = "serde")]
pub fn save_export_json(document: &ExportDocument) -> Result<String, ClosureError> {
    serde_json::to_string_pretty(document)
        .map_err(|e| ClosureError::Internal(format!("failed to serialize export: {}", e)))
}

/// Loads an export document from JSON and checks its compatibility.
#[cfg(feature = "serde")]
pub fn load_export_json(json: &str) -> Result<ExportDocument, ClosureError> {
    let document: ExportDocument = serde_json::from_str(json)
        .map_err(|e| ClosureError::ValidationError(format!("failed to deserialize export: {}", e)))?;
    document.validate_compatibility()?;
    Ok(document)
}

/// Serialises a layout document to pretty-printed JSON.
#[cfg(feature = "serde")]
pub fn save_layout_json(document: &LayoutDocument) -> Result<String, ClosureError> {
    serde_json::to_string_pretty(document)
        .map_err(|e| ClosureError::Internal(format!("failed to serialize layout: {}", e)))
}
