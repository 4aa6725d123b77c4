//! Tabular parser for the delimited impact files.
//!
//! The dashboard's datasets are shipped as plain comma-separated text with a
//! header line. Fields may be wrapped in RFC-4180-style double quotes, in
//! which case delimiters inside the quotes are literal data. Values stay
//! text at this layer; numeric conversion is the aggregator's concern.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// A single parsed record, keyed by header name.
///
/// Rows are immutable once parsed. A row produced from a line with fewer
/// fields than the header simply has no entry for the trailing columns;
/// surplus fields on a long line are dropped. This tolerance is deliberate:
/// a malformed line only ever affects its own derived values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    values: BTreeMap<String, String>,
}

impl Row {
    /// Looks up a field by column name.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    /// Looks up a field and parses it as a number.
    ///
    /// Returns `None` for a missing column or an unparseable value; callers
    /// decide whether that means "skip" or "zero".
    #[must_use]
    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(|v| v.parse::<f64>().ok())
    }

    /// True if the row carries a value for the given column.
    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// Number of populated fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the row has no populated fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn from_fields(headers: &[String], fields: Vec<String>) -> Self {
        let values = headers
            .iter()
            .zip(fields)
            .map(|(h, f)| (h.clone(), f))
            .collect();
        Self { values }
    }
}

/// An ordered sequence of rows plus the header that keyed them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Column names, in file order.
    pub headers: Vec<String>,
    /// Data rows, in file order.
    pub rows: Vec<Row>,
}

impl Table {
    /// Parses comma-separated text with a header line.
    ///
    /// Blank lines are skipped. A header with no data lines yields an empty
    /// row sequence.
    ///
    /// # Errors
    ///
    /// Returns `DataError::EmptyInput` if the input contains no header line.
    pub fn parse(text: &str) -> Result<Self, DataError> {
        Self::parse_delimited(text, ',')
    }

    /// Parses delimited text with an arbitrary single-character delimiter.
    ///
    /// # Errors
    ///
    /// Returns `DataError::EmptyInput` if the input contains no header line.
    pub fn parse_delimited(text: &str, delimiter: char) -> Result<Self, DataError> {
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());

        let header_line = lines.next().ok_or(DataError::EmptyInput)?;
        let headers = split_line(header_line, delimiter);

        let rows = lines
            .map(|line| Row::from_fields(&headers, split_line(line, delimiter)))
            .collect();

        Ok(Self { headers, rows })
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True if the header contains the given column.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }
}

/// Splits one line on the delimiter, honoring double-quoted fields.
///
/// A double quote toggles the "inside quoted field" state; a delimiter seen
/// while inside a quoted field is literal data. The delimiting quotes are
/// not part of the value. Each field is trimmed of surrounding whitespace.
fn split_line(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        if ch == '"' {
            in_quotes = !in_quotes;
        } else if ch == delimiter && !in_quotes {
            fields.push(current.trim().to_string());
            current = String::new();
        } else {
            current.push(ch);
        }
    }
    fields.push(current.trim().to_string());

    fields
}
