//! XLSX output writer for result sheets.
//!
//! Both sheets of one input land in a single workbook, one worksheet per
//! [`Sheet`] named after it. Cell text that is a plain number (it prints back
//! exactly as written) is stored as a number so spreadsheet sorting and
//! formulas keep working; everything else is stored as text.
//!
//! # Example
//!
//! ```no_run
//! use sheetdupe::output::{Sheet, XlsxOutput};
//! use sheetdupe::table::Table;
//!
//! let sheet = Sheet {
//!     name: "Duplicates".to_string(),
//!     table: Table::from_strings(vec![vec!["id", "name"], vec!["1", "a"]]),
//! };
//!
//! XlsxOutput::new([&sheet]).write_file("Output/orders.xlsx".as_ref()).unwrap();
//! ```

use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use thiserror::Error;

use super::Sheet;

/// Errors that can occur during XLSX output generation.
#[derive(Debug, Error)]
pub enum XlsxOutputError {
    /// The sheet does not fit in a worksheet.
    #[error("Sheet '{sheet}' has {rows} rows and {columns} columns, more than a worksheet holds")]
    TooLarge {
        /// Sheet name
        sheet: String,
        /// Rows including the header
        rows: usize,
        /// Columns
        columns: usize,
    },

    /// Error from the workbook writer, including invalid sheet names.
    #[error("XLSX error: {0}")]
    Xlsx(#[from] XlsxError),
}

/// XLSX output formatter for the sheets of one input file.
pub struct XlsxOutput<'a> {
    sheets: Vec<&'a Sheet>,
}

impl<'a> XlsxOutput<'a> {
    /// Create a workbook writer for `sheets`, in worksheet order.
    #[must_use]
    pub fn new(sheets: impl IntoIterator<Item = &'a Sheet>) -> Self {
        Self {
            sheets: sheets.into_iter().collect(),
        }
    }

    /// Number of worksheets that will be written.
    #[must_use]
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Build the workbook in memory.
    ///
    /// # Errors
    ///
    /// Returns `XlsxOutputError` if a sheet is too large or has an invalid
    /// or repeated name.
    pub fn workbook(&self) -> Result<Workbook, XlsxOutputError> {
        let mut workbook = Workbook::new();
        for sheet in &self.sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&sheet.name)?;
            write_sheet(worksheet, sheet)?;
        }
        Ok(workbook)
    }

    /// Write the workbook to `path`.
    ///
    /// # Errors
    ///
    /// Returns `XlsxOutputError` if the workbook cannot be built or saved.
    pub fn write_file(&self, path: &Path) -> Result<(), XlsxOutputError> {
        self.workbook()?.save(path)?;
        log::debug!(
            "Wrote {} worksheets to {}",
            self.sheets.len(),
            path.display()
        );
        Ok(())
    }

    /// Generate the workbook as bytes.
    ///
    /// # Errors
    ///
    /// Returns `XlsxOutputError` if the workbook cannot be built.
    pub fn to_buffer(&self) -> Result<Vec<u8>, XlsxOutputError> {
        Ok(self.workbook()?.save_to_buffer()?)
    }
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &Sheet) -> Result<(), XlsxOutputError> {
    let too_large = || XlsxOutputError::TooLarge {
        sheet: sheet.name.clone(),
        rows: sheet.table.len(),
        columns: sheet.table.column_count(),
    };

    for (r, row) in sheet.table.rows().iter().enumerate() {
        let r = u32::try_from(r).map_err(|_| too_large())?;
        for (c, cell) in row.iter().enumerate() {
            let Some(text) = cell else { continue };
            let c = u16::try_from(c).map_err(|_| too_large())?;
            match as_number(text) {
                Some(n) => worksheet.write_number(r, c, n)?,
                None => worksheet.write_string(r, c, text)?,
            };
        }
    }
    Ok(())
}

/// A number whose display form is exactly `text`; "007" or "1e3" stay text.
fn as_number(text: &str) -> Option<f64> {
    text.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && n.to_string() == text)
}
