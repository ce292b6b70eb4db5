//! CSV output writer for result sheets.
//!
//! Each [`Sheet`] becomes one CSV file: the copied header on the first line,
//! then every ordered row with all source columns. Empty cells are written as
//! empty fields.
//!
//! # Example
//!
//! ```
//! use sheetdupe::output::{CsvOutput, Sheet};
//! use sheetdupe::table::Table;
//!
//! let sheet = Sheet {
//!     name: "Duplicates".to_string(),
//!     table: Table::from_strings(vec![vec!["id", "name"], vec!["1", "a"]]),
//! };
//!
//! let csv = CsvOutput::new(&sheet).to_string().unwrap();
//! assert_eq!(csv, "id,name\n1,a\n");
//! ```

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::Sheet;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// I/O error while creating an output file.
    #[error("Failed to create {path}: {source}")]
    Create {
        /// Path of the output file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),
}

/// CSV output formatter for a single sheet.
pub struct CsvOutput<'a> {
    sheet: &'a Sheet,
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(sheet: &'a Sheet) -> Self {
        Self { sheet }
    }

    /// File name for this sheet, e.g. `Duplicates.csv`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.sheet.name)
    }

    /// Write the CSV output to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = ::csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(writer);

        for row in self.sheet.table.rows() {
            csv_writer.write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Write the sheet into `dir` as `<name>.csv` and return the file path.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if the file cannot be created or written.
    pub fn write_into(&self, dir: &Path) -> Result<PathBuf, CsvOutputError> {
        let path = dir.join(self.file_name());
        let file = File::create(&path).map_err(|source| CsvOutputError::Create {
            path: path.clone(),
            source,
        })?;
        self.write_to(io::BufWriter::new(file))?;
        log::debug!(
            "Wrote {} rows to {}",
            self.sheet.data_row_count(),
            path.display()
        );
        Ok(path)
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;
    use tempfile::TempDir;

    fn sheet(rows: Vec<Vec<&str>>) -> Sheet {
        Sheet {
            name: "Repeats".to_string(),
            table: Table::from_strings(rows),
        }
    }

    #[test]
    fn test_csv_output_header_only() {
        let s = sheet(vec![vec!["a", "b"]]);
        assert_eq!(CsvOutput::new(&s).to_string().unwrap(), "a,b\n");
    }

    #[test]
    fn test_csv_output_empty_cells() {
        let s = sheet(vec![vec!["a", "b", "c"], vec!["", "x", ""]]);
        assert_eq!(CsvOutput::new(&s).to_string().unwrap(), "a,b,c\n,x,\n");
    }

    #[test]
    fn test_csv_output_quoting() {
        let s = sheet(vec![vec!["name"], vec!["with,comma"]]);
        let csv_str = CsvOutput::new(&s).to_string().unwrap();
        assert!(csv_str.contains("\"with,comma\""));
    }

    #[test]
    fn test_csv_write_into_dir() {
        let dir = TempDir::new().unwrap();
        let s = sheet(vec![vec!["h"], vec!["v"]]);

        let path = CsvOutput::new(&s).write_into(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("Repeats.csv"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "h\nv\n");
    }

    #[test]
    fn test_csv_write_into_missing_dir() {
        let dir = TempDir::new().unwrap();
        let s = sheet(vec![vec!["h"]]);

        let result = CsvOutput::new(&s).write_into(&dir.path().join("missing"));
        assert!(matches!(result, Err(CsvOutputError::Create { .. })));
    }
}
