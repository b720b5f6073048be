//! # Delimited Table Parser
//!
//! Parses semicolon-delimited tables as exported by inequality databases, using
//! the Pest grammar in `grammar/table.pest`.
//!
//! Fields may be double-quoted; a quoted field can hold the delimiter, line
//! breaks (header cells often carry a description line above the series name)
//! and doubled quotes. Blank lines are dropped.

use pest::Parser;
use pest_derive::Parser;

use crate::engine::errors::ClosureError;

#[derive(Parser)]
#[grammar = "grammar/table.pest"]
struct TableParser;

/// A parsed table: one `Vec<String>` per non-blank line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parses semicolon-delimited source text into a [`Table`].
///
/// # Errors
///
/// Returns [`ClosureError::ParseError`] with line/column information when the
/// source is not well formed (e.g. an unterminated quoted field).
pub fn parse_table(source: &str) -> Result<Table, ClosureError> {
    let mut pairs = TableParser::parse(Rule::table, source)
        .map_err(|e| ClosureError::ParseError(e.to_string()))?;

    let table_pair = pairs
        .next()
        .ok_or_else(|| ClosureError::Internal("empty parse tree".to_string()))?;

    let mut rows = Vec::new();
    for record in table_pair.into_inner() {
        if record.as_rule() != Rule::record {
            continue;
        }
        let fields: Vec<String> = record.into_inner().map(build_field).collect();
        if fields.len() == 1 && fields[0].is_empty() {
            continue;
        }
        rows.push(fields);
    }
    Ok(Table { rows })
}

fn build_field(pair: pest::iterators::Pair<Rule>) -> String {
    match pair.as_rule() {
        Rule::quoted => pair
            .into_inner()
            .next()
            .map(|inner| inner.as_str().replace("\"\"", "\""))
            .unwrap_or_default(),
        _ => pair.as_str().to_string(),
    }
}
