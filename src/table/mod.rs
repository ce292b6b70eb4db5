//! In-memory tables loaded from spreadsheet and CSV files.
//!
//! A [`Table`] is an ordered list of rows. Row `0` is the header and is only
//! ever copied through; data rows are addressed by their 1-based row number,
//! which is also their index into [`Table::rows`].
//!
//! Columns are addressed 1-based in the public API, the same way a
//! spreadsheet user counts them.
//!
//! # Example
//!
//! ```
//! use sheetdupe::table::Table;
//!
//! let table = Table::from_strings(vec![
//!     vec!["id", "name", "value"],
//!     vec!["1", "a", "x"],
//! ]);
//!
//! assert_eq!(table.column_count(), 3);
//! assert_eq!(table.data_row_count(), 1);
//! assert_eq!(table.text(1, 2), "a");
//! ```

pub mod reader;

use serde::Serialize;

pub use reader::{load_table, TableError};

/// A single cell value. `None` is an empty or null cell.
pub type Cell = Option<String>;

/// An ordered sequence of cells.
pub type Row = Vec<Cell>;

/// Rectangular table with a header row at position 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    rows: Vec<Row>,
    columns: usize,
}

impl Table {
    /// Build a table from rows, padding short rows with empty cells so that
    /// every row has the width of the widest one.
    #[must_use]
    pub fn from_rows(mut rows: Vec<Row>) -> Self {
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(columns, None);
        }
        Self { rows, columns }
    }

    /// Build a table from string literals. Empty strings become empty cells.
    #[must_use]
    pub fn from_strings<S: AsRef<str>>(rows: Vec<Vec<S>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|value| {
                        let value = value.as_ref();
                        (!value.is_empty()).then(|| value.to_string())
                    })
                    .collect()
            })
            .collect();
        Self::from_rows(rows)
    }

    /// Create a table containing only the given header.
    #[must_use]
    pub fn with_header(header: Row) -> Self {
        Self::from_rows(vec![header])
    }

    /// Number of columns shared by every row.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns
    }

    /// Number of rows including the header.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the table has no rows at all, not even a header.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows after the header.
    #[must_use]
    pub fn data_row_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    /// The header row, if present.
    #[must_use]
    pub fn header(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Row by row number (0 is the header).
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&Row> {
        self.rows.get(row)
    }

    /// All rows, header first.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Iterate over `(row_number, row)` for every data row.
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &Row)> {
        self.rows.iter().enumerate().skip(1)
    }

    /// Cell at `row` and 1-based `column`. Missing cells read as `None`.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        if column == 0 {
            return None;
        }
        self.rows
            .get(row)
            .and_then(|r| r.get(column - 1))
            .and_then(|c| c.as_deref())
    }

    /// Textual value of a cell, with empty and missing cells as `""`.
    #[must_use]
    pub fn text(&self, row: usize, column: usize) -> &str {
        self.cell(row, column).unwrap_or("")
    }

    /// Append a row, padding or truncating it to the table width.
    ///
    /// The first row pushed into an empty table fixes the width.
    pub fn push_row(&mut self, mut row: Row) {
        if self.rows.is_empty() {
            self.columns = row.len();
        }
        row.resize(self.columns, None);
        self.rows.push(row);
    }

    /// Convert every cell to an owned string, empty cells as `""`.
    #[must_use]
    pub fn to_strings(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|c| c.clone().unwrap_or_default()).collect())
            .collect()
    }
}
