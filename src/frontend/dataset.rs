//! Grouping of a parsed table into per-distribution measurement lists.
//!
//! The expected layout is one metadata row, then a column-name row starting with
//! `Percentile;Year`, then one row per (percentile range, year) holding one size
//! per series:
//!
//! ```text
//! Percentile;Year;"Pre-tax national income\nFrance";"Pre-tax national income\nUSA"
//! p0p50;2019;0.22;0.13
//! p50p90;2019;;0.42
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::engine::builder::Measurement;
use crate::engine::config::TableConfig;
use crate::engine::errors::ClosureError;
use crate::frontend::table::{parse_table, Table};

const PERCENTILE_COLUMN: &str = "Percentile";
const YEAR_COLUMN: &str = "Year";

/// Identifies one distribution: a series (e.g. a country) in a given year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeriesKey {
    pub year: String,
    pub series: String,
}

impl SeriesKey {
    pub fn new(year: impl Into<String>, series: impl Into<String>) -> Self {
        Self {
            year: year.into(),
            series: series.into(),
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.year, self.series)
    }
}

/// Reduces every column name to its last line and checks the leading
/// `Percentile`, `Year` columns.
pub fn clean_column_names(header: &[String]) -> Result<Vec<String>, ClosureError> {
    let names: Vec<String> = header
        .iter()
        .map(|n| n.lines().last().unwrap_or("").trim().to_string())
        .collect();

    match (names.first(), names.get(1)) {
        (Some(p), Some(y)) if p == PERCENTILE_COLUMN && y == YEAR_COLUMN => Ok(names),
        _ => Err(ClosureError::ValidationError(format!(
            "header must start with '{};{}', found {:?}",
            PERCENTILE_COLUMN,
            YEAR_COLUMN,
            names.iter().take(2).collect::<Vec<_>>()
        ))),
    }
}

/// Measurements grouped by distribution.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Cleaned series names, in column order
    pub series: Vec<String>,
    /// Measurements per distribution, in row order
    pub groups: BTreeMap<SeriesKey, Vec<Measurement>>,
}

impl Dataset {
    /// Parses and groups delimited source text.
    pub fn from_source(source: &str, config: &TableConfig) -> Result<Self, ClosureError> {
        Self::from_table(&parse_table(source)?, config)
    }

    /// Groups the rows of a parsed table by `(year, series)`.
    pub fn from_table(table: &Table, config: &TableConfig) -> Result<Self, ClosureError> {
        let mut rows = table.rows.iter().skip(config.header_rows_to_skip);
        let header = rows.next().ok_or_else(|| {
            ClosureError::ValidationError(format!(
                "table has no column-name row after {} metadata row(s)",
                config.header_rows_to_skip
            ))
        })?;
        let columns = clean_column_names(header)?;
        let series: Vec<String> = columns[2..].to_vec();

        let mut groups: BTreeMap<SeriesKey, Vec<Measurement>> = BTreeMap::new();
        for (line, row) in rows.enumerate() {
            if row.len() != columns.len() {
                return Err(ClosureError::ValidationError(format!(
                    "data row {} has {} fields, expected {}",
                    line + 1,
                    row.len(),
                    columns.len()
                )));
            }
            let label = row[0].trim();
            let year = row[1].trim();
            for (name, size) in series.iter().zip(&row[2..]) {
                groups
                    .entry(SeriesKey::new(year, name.as_str()))
                    .or_default()
                    .push(Measurement::new(label, size.trim()));
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(series = series.len(), groups = groups.len(), "grouped dataset");

        Ok(Self { series, groups })
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Distinct years, sorted.
    pub fn years(&self) -> Vec<&str> {
        let mut years: Vec<&str> = self.groups.keys().map(|k| k.year.as_str()).collect();
        years.dedup();
        years
    }

    /// Keeps only the groups accepted by `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&SeriesKey) -> bool) {
        self.groups.retain(|k, _| keep(k));
    }

    pub fn get(&self, key: &SeriesKey) -> Option<&[Measurement]> {
        self.groups.get(key).map(Vec::as_slice)
    }
}
