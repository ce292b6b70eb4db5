//! Output writers for classification results.
//!
//! Results are materialized as two named [`Sheet`]s, "Duplicates" and
//! "Repeats", each holding the source header followed by the ordered rows.
//! They can be written as:
//! - XLSX, one workbook per input file with a worksheet per sheet
//! - CSV, one file per sheet
//! - JSON, one report per input file
//!
//! # Example
//!
//! ```
//! use sheetdupe::duplicates::{ClassifierConfig, ResultOrderer, RowClassifier};
//! use sheetdupe::output::{build_sheets, SheetNames};
//! use sheetdupe::table::Table;
//!
//! let table = Table::from_strings(vec![
//!     vec!["id", "a", "b"],
//!     vec!["1", "x", "y"],
//!     vec!["2", "x", "y"],
//! ]);
//!
//! let classification = RowClassifier::new(ClassifierConfig::new(2, 3))
//!     .classify(&table)
//!     .unwrap();
//! let sheets = build_sheets(
//!     &table,
//!     &classification,
//!     &ResultOrderer::new(2, 3),
//!     &SheetNames::default(),
//! );
//!
//! assert_eq!(sheets.duplicates.name, "Duplicates");
//! assert_eq!(sheets.duplicates.table.data_row_count(), 2);
//! assert_eq!(sheets.repeats.table.data_row_count(), 0);
//! ```

pub mod csv;
pub mod json;
pub mod xlsx;

use serde::{Deserialize, Serialize};

use crate::duplicates::{Classification, ResultOrderer};
use crate::table::Table;

pub use self::csv::{CsvOutput, CsvOutputError};
pub use self::json::{JsonOutput, JsonOutputError, JsonReport};
pub use self::xlsx::{XlsxOutput, XlsxOutputError};

/// A named output table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    /// Sheet name, used as the worksheet name and the CSV file stem
    pub name: String,
    /// Header plus ordered rows
    pub table: Table,
}

impl Sheet {
    /// Number of rows after the header.
    #[must_use]
    pub fn data_row_count(&self) -> usize {
        self.table.data_row_count()
    }
}

/// Names of the two result sheets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetNames {
    /// Name of the duplicate rows sheet
    pub duplicates: String,
    /// Name of the repeated values sheet
    pub repeats: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            duplicates: "Duplicates".to_string(),
            repeats: "Repeats".to_string(),
        }
    }
}

/// Both result sheets for one input table.
#[derive(Debug, Clone)]
pub struct ResultSheets {
    /// Duplicate rows ordered by group
    pub duplicates: Sheet,
    /// Repeat candidates ordered by the first compared column
    pub repeats: Sheet,
}

impl ResultSheets {
    /// Iterate over both sheets, duplicates first.
    pub fn iter(&self) -> impl Iterator<Item = &Sheet> {
        [&self.duplicates, &self.repeats].into_iter()
    }
}

/// Order both result sets and copy them into named sheets.
#[must_use]
pub fn build_sheets(
    table: &Table,
    classification: &Classification,
    orderer: &ResultOrderer,
    names: &SheetNames,
) -> ResultSheets {
    let duplicates = orderer.order_and_copy(
        table,
        &classification.duplicates,
        Some(&classification.groups),
    );
    let repeats = orderer.order_and_copy(table, &classification.repeats, None);

    ResultSheets {
        duplicates: Sheet {
            name: names.duplicates.clone(),
            table: duplicates,
        },
        repeats: Sheet {
            name: names.repeats.clone(),
            table: repeats,
        },
    }
}
