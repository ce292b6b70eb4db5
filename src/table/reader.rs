//! Loading tables from disk.
//!
//! Spreadsheet formats go through [`calamine`] (first worksheet only), CSV
//! files through the [`csv`] crate. Every cell is converted to its display
//! string so that the classifier only ever compares text.
//!
//! Worksheet tables are anchored at cell A1: blank leading rows and columns
//! are kept as empty cells, so column numbers and the header row match what
//! the sheet shows.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, DataType, Reader};
use thiserror::Error;

use super::{Cell, Row, Table};

/// Spreadsheet extensions handled by calamine.
const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Errors that can occur while loading a table.
#[derive(Debug, Error)]
pub enum TableError {
    /// The file extension is not a supported table format.
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(PathBuf),

    /// The workbook could not be opened or parsed.
    #[error("Failed to open workbook {path}: {source}")]
    Workbook {
        /// Path of the workbook
        path: PathBuf,
        /// The underlying calamine error
        #[source]
        source: calamine::Error,
    },

    /// The workbook has no worksheets.
    #[error("No worksheet found in {0}")]
    NoWorksheet(PathBuf),

    /// The CSV file could not be read.
    #[error("Failed to read CSV {path}: {source}")]
    Csv {
        /// Path of the CSV file
        path: PathBuf,
        /// The underlying CSV error
        #[source]
        source: csv::Error,
    },

    /// The file contains no rows, not even a header.
    #[error("No rows found in {0}")]
    NoRows(PathBuf),
}

/// Load the first sheet of a spreadsheet, or a CSV file, into a [`Table`].
///
/// The format is chosen from the file extension (case-insensitive).
///
/// # Errors
///
/// Returns [`TableError`] if the format is unsupported, the file cannot be
/// read, or it contains no rows.
pub fn load_table(path: &Path) -> Result<Table, TableError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let table = if extension == "csv" {
        load_csv(path)?
    } else if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
        load_workbook(path)?
    } else {
        return Err(TableError::UnsupportedFormat(path.to_path_buf()));
    };

    if table.is_empty() {
        return Err(TableError::NoRows(path.to_path_buf()));
    }

    log::debug!(
        "Loaded {}: {} data rows, {} columns",
        path.display(),
        table.data_row_count(),
        table.column_count()
    );
    Ok(table)
}

fn load_workbook(path: &Path) -> Result<Table, TableError> {
    let workbook_error = |source| TableError::Workbook {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(workbook_error)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TableError::NoWorksheet(path.to_path_buf()))?
        .map_err(workbook_error)?;

    // calamine ranges start at the first used cell, not A1
    let (top, left) = range
        .start()
        .map(|(row, col)| (row as usize, col as usize))
        .unwrap_or_default();

    let mut rows: Vec<Row> = vec![Vec::new(); top];
    rows.extend(range.rows().map(|row| {
        std::iter::repeat(None)
            .take(left)
            .chain(row.iter().map(data_to_cell))
            .collect::<Row>()
    }));

    Ok(Table::from_rows(rows))
}

fn load_csv(path: &Path) -> Result<Table, TableError> {
    let csv_error = |source| TableError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        rows.push(
            record
                .iter()
                .map(|field| (!field.is_empty()).then(|| field.to_string()))
                .collect(),
        );
    }

    Ok(Table::from_rows(rows))
}

/// Convert a calamine cell to its display string.
///
/// Whole floats print without a fractional part and booleans print as
/// `True`/`False`, matching what a spreadsheet shows. Date-times print as
/// ISO 8601 (`2024-01-01T12:00:00`).
fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Bool(true) => Some("True".to_string()),
        Data::Bool(false) => Some("False".to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(f.to_string()),
        Data::DateTime(_) => Some(
            data.as_datetime()
                .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string())
                .unwrap_or_else(|| data.to_string()),
        ),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
