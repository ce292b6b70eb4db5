//! JSON report writer.
//!
//! Provides one machine-readable report per input file.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "source": "Input/orders.xlsx",
//!   "generated_at": "2024-01-01T00:00:00+00:00",
//!   "settings": { "columns_to_skip": 3, "min_repeats": 3, "sort_column": 3 },
//!   "summary": {
//!     "total_rows": 120,
//!     "unique_fingerprints": 110,
//!     "duplicate_groups": 4,
//!     "duplicate_rows": 14,
//!     "repeat_rows": 2,
//!     "repeats_shadowed_by_duplicates": 0
//!   },
//!   "repeated_values": [ { "row": 7, "value": "n/a", "count": 4 } ],
//!   "sheets": [
//!     { "name": "Duplicates", "rows": [["id", "name"], ["3", "x"]] },
//!     { "name": "Repeats", "rows": [["id", "name"]] }
//!   ]
//! }
//! ```

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use super::{ResultSheets, Sheet};
use crate::duplicates::{Classification, ClassificationStats, ClassifierConfig};

/// Errors that can occur during JSON output generation.
#[derive(Debug, Error)]
pub enum JsonOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during JSON serialization.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings the report was produced with.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSettings {
    /// First compared column
    pub columns_to_skip: usize,
    /// Repeat threshold
    pub min_repeats: usize,
    /// Duplicate group tie-break column
    pub sort_column: usize,
}

/// The repeated value that flagged a row.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRepeat {
    /// Source row number (header is row 0)
    pub row: usize,
    /// Repeated cell text
    pub value: String,
    /// Occurrences in the compared range
    pub count: usize,
}

/// A result sheet as rows of strings, header first.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSheet {
    /// Sheet name
    pub name: String,
    /// Header plus data rows
    pub rows: Vec<Vec<String>>,
}

impl From<&Sheet> for JsonSheet {
    fn from(sheet: &Sheet) -> Self {
        Self {
            name: sheet.name.clone(),
            rows: sheet.table.to_strings(),
        }
    }
}

/// Complete JSON report for one input table.
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport {
    /// Input file path
    pub source: String,
    /// Report creation time (RFC 3339)
    pub generated_at: String,
    /// Classification settings
    pub settings: JsonSettings,
    /// Classification counters
    pub summary: ClassificationStats,
    /// Repeated value per repeat candidate, in ascending row order
    pub repeated_values: Vec<JsonRepeat>,
    /// Result sheets, duplicates first
    pub sheets: Vec<JsonSheet>,
}

/// JSON output formatter.
pub struct JsonOutput {
    report: JsonReport,
}

impl JsonOutput {
    /// Build the report for one classified table.
    #[must_use]
    pub fn new(
        source: &Path,
        config: &ClassifierConfig,
        sort_column: usize,
        classification: &Classification,
        sheets: &ResultSheets,
    ) -> Self {
        let repeated_values = classification
            .repeats
            .iter()
            .filter_map(|row| {
                classification.repeated_values.get(row).map(|v| JsonRepeat {
                    row: *row,
                    value: v.value.clone(),
                    count: v.count,
                })
            })
            .collect();

        Self {
            report: JsonReport {
                source: source.display().to_string(),
                generated_at: Utc::now().to_rfc3339(),
                settings: JsonSettings {
                    columns_to_skip: config.columns_to_skip,
                    min_repeats: config.min_repeats,
                    sort_column,
                },
                summary: classification.stats.clone(),
                repeated_values,
                sheets: sheets.iter().map(JsonSheet::from).collect(),
            },
        }
    }

    /// The underlying report.
    #[must_use]
    pub fn report(&self) -> &JsonReport {
        &self.report
    }

    /// Serialize to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns `JsonOutputError` if serialization fails.
    pub fn to_json(&self) -> Result<String, JsonOutputError> {
        Ok(serde_json::to_string(&self.report)?)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `JsonOutputError` if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, JsonOutputError> {
        Ok(serde_json::to_string_pretty(&self.report)?)
    }

    /// Write pretty-printed JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns `JsonOutputError` if serialization or writing fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), JsonOutputError> {
        serde_json::to_writer_pretty(&mut writer, &self.report)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Write the report to `path`.
    ///
    /// # Errors
    ///
    /// Returns `JsonOutputError` if the file cannot be created or written.
    pub fn write_file(&self, path: &Path) -> Result<(), JsonOutputError> {
        let file = File::create(path)?;
        self.write_to(io::BufWriter::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duplicates::{ResultOrderer, RowClassifier};
    use crate::output::{build_sheets, SheetNames};
    use crate::table::Table;

    fn report_for(table: &Table) -> JsonOutput {
        let config = ClassifierConfig::new(2, 3);
        let classification = RowClassifier::new(config).classify(table).unwrap();
        let sheets = build_sheets(
            table,
            &classification,
            &ResultOrderer::new(2, 3),
            &SheetNames::default(),
        );
        JsonOutput::new(
            Path::new("input.csv"),
            &config,
            3,
            &classification,
            &sheets,
        )
    }

    #[test]
    fn test_json_report_fields() {
        let table = Table::from_strings(vec![
            vec!["id", "a", "b", "c"],
            vec!["1", "x", "x", "x"],
            vec!["2", "y", "z", "w"],
            vec!["3", "y", "z", "w"],
        ]);
        let output = report_for(&table);
        let value: serde_json::Value = serde_json::from_str(&output.to_json().unwrap()).unwrap();

        assert_eq!(value["source"], "input.csv");
        assert_eq!(value["settings"]["columns_to_skip"], 2);
        assert_eq!(value["summary"]["duplicate_rows"], 2);
        assert_eq!(value["summary"]["repeat_rows"], 1);
        assert_eq!(value["repeated_values"][0]["row"], 1);
        assert_eq!(value["repeated_values"][0]["value"], "x");
        assert_eq!(value["repeated_values"][0]["count"], 3);
        assert_eq!(value["sheets"][0]["name"], "Duplicates");
        assert_eq!(value["sheets"][0]["rows"].as_array().unwrap().len(), 3);
        assert_eq!(value["sheets"][1]["rows"][1][0], "1");
    }

    #[test]
    fn test_json_write_to_ends_with_newline() {
        let table = Table::from_strings(vec![vec!["id", "a"]]);
        let mut buffer = Vec::new();
        report_for(&table).write_to(&mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.ends_with("}\n"));
        assert!(text.contains("\"sheets\""));
    }
}
