//! Row classification into duplicates and repeat candidates.
//!
//! # Overview
//!
//! Classification runs two passes over the data rows of a [`Table`]:
//!
//! 1. **Fingerprint pass**: every row is fingerprinted over its compared range
//!    and grouped (see [`crate::duplicates::groups`]).
//! 2. **Repeat pass**: every row's non-blank values are tallied. A row whose
//!    most frequent value reaches `min_repeats` is a repeat candidate, but
//!    only if its fingerprint group has a single row.
//!
//! Duplicate status takes precedence: a row is never reported both as a
//! duplicate and as a repeat candidate.
//!
//! # Example
//!
//! ```
//! use sheetdupe::duplicates::{ClassifierConfig, RowClassifier};
//! use sheetdupe::table::Table;
//!
//! let table = Table::from_strings(vec![
//!     vec!["id", "a", "b", "c"],
//!     vec!["1", "p", "p", "p"],
//!     vec!["2", "q", "r", "s"],
//!     vec!["3", "q", "r", "s"],
//! ]);
//!
//! let classifier = RowClassifier::new(ClassifierConfig::new(2, 3));
//! let result = classifier.classify(&table).unwrap();
//!
//! assert_eq!(result.duplicates, vec![2, 3]);
//! assert_eq!(result.repeats, vec![1]);
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::groups::{compared_range, fingerprint, group_by_fingerprint, FingerprintIndex};
use crate::table::{Row, Table};

/// Default first compared column (1-based).
pub const DEFAULT_COLUMNS_TO_SKIP: usize = 3;

/// Default number of occurrences that flags a repeated value.
pub const DEFAULT_MIN_REPEATS: usize = 3;

/// Errors that can occur during classification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    /// A configuration value is out of its valid range.
    #[error("Invalid value for {field}: {value} (must be at least 1)")]
    InvalidConfig {
        /// Name of the offending setting
        field: &'static str,
        /// The rejected value
        value: usize,
    },

    /// The first compared column lies beyond the last column of the table.
    #[error("columns_to_skip is {columns_to_skip} but the table only has {columns} columns")]
    ColumnsToSkipOutOfRange {
        /// Configured first compared column
        columns_to_skip: usize,
        /// Column count of the table
        columns: usize,
    },
}

/// Settings for [`RowClassifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// First compared column, 1-based. Columns before it are ignored.
    pub columns_to_skip: usize,
    /// Minimum occurrences of one value within a row to flag the row.
    pub min_repeats: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            columns_to_skip: DEFAULT_COLUMNS_TO_SKIP,
            min_repeats: DEFAULT_MIN_REPEATS,
        }
    }
}

impl ClassifierConfig {
    /// Create a configuration.
    #[must_use]
    pub fn new(columns_to_skip: usize, min_repeats: usize) -> Self {
        Self {
            columns_to_skip,
            min_repeats,
        }
    }

    /// Check the configuration against a table with `columns` columns.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::InvalidConfig`] for zero values and
    /// [`ClassifyError::ColumnsToSkipOutOfRange`] when the first compared
    /// column does not exist.
    pub fn validate(&self, columns: usize) -> Result<(), ClassifyError> {
        if self.columns_to_skip == 0 {
            return Err(ClassifyError::InvalidConfig {
                field: "columns_to_skip",
                value: 0,
            });
        }
        if self.min_repeats == 0 {
            return Err(ClassifyError::InvalidConfig {
                field: "min_repeats",
                value: 0,
            });
        }
        if self.columns_to_skip > columns {
            return Err(ClassifyError::ColumnsToSkipOutOfRange {
                columns_to_skip: self.columns_to_skip,
                columns,
            });
        }
        Ok(())
    }
}

/// The most frequent non-blank value of a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepeatedValue {
    /// The repeated cell text
    pub value: String,
    /// How often it occurs in the compared range
    pub count: usize,
}

/// Find the most frequent non-blank value in a row's compared range.
///
/// Empty and whitespace-only cells are ignored. When several values share the
/// highest count, the one seen first wins. Returns `None` if every compared
/// cell is blank.
#[must_use]
pub fn repeat_tally(row: &Row, columns_to_skip: usize) -> Option<RepeatedValue> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for value in compared_range(row, columns_to_skip).iter().flatten() {
        if value.trim().is_empty() {
            continue;
        }
        let count = counts.entry(value.as_str()).or_insert(0);
        if *count == 0 {
            order.push(value.as_str());
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for value in order {
        let count = counts[value];
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((value, count));
        }
    }

    best.map(|(value, count)| RepeatedValue {
        value: value.to_string(),
        count,
    })
}

/// Counters describing one classification run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationStats {
    /// Data rows examined
    pub total_rows: usize,
    /// Distinct fingerprints
    pub unique_fingerprints: usize,
    /// Groups with 2+ rows
    pub duplicate_groups: usize,
    /// Rows in set A
    pub duplicate_rows: usize,
    /// Rows in set B
    pub repeat_rows: usize,
    /// Rows that reached the repeat threshold but were already duplicates
    pub repeats_shadowed_by_duplicates: usize,
}

/// Result of classifying a table.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// Duplicate rows, group by group in first-seen order
    pub duplicates: Vec<usize>,
    /// Repeat candidates in ascending row order
    pub repeats: Vec<usize>,
    /// The repeated value behind each repeat candidate
    pub repeated_values: HashMap<usize, RepeatedValue>,
    /// Fingerprint groups of every data row
    pub groups: FingerprintIndex,
    /// Run counters
    pub stats: ClassificationStats,
}

impl Classification {
    /// A classification with no rows in either set.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// True if neither duplicates nor repeat candidates were found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.duplicates.is_empty() && self.repeats.is_empty()
    }
}

/// Classifies data rows into duplicates and repeat candidates.
#[derive(Debug, Clone, Default)]
pub struct RowClassifier {
    config: ClassifierConfig,
}

impl RowClassifier {
    /// Create a classifier with the given configuration.
    #[must_use]
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify every data row of `table`.
    ///
    /// A table without data rows yields [`Classification::empty`].
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError`] if the configuration is invalid for this
    /// table.
    pub fn classify(&self, table: &Table) -> Result<Classification, ClassifyError> {
        if table.data_row_count() == 0 {
            log::debug!("No data rows to classify");
            return Ok(Classification::empty());
        }
        self.config.validate(table.column_count())?;

        let skip = self.config.columns_to_skip;

        // Pass 1: fingerprint grouping
        let (groups, grouping) = group_by_fingerprint(table, skip);

        // Pass 2: repeat detection
        let mut repeats = Vec::new();
        let mut repeated_values = HashMap::new();
        let mut shadowed = 0;

        for (number, row) in table.data_rows() {
            let Some(tally) = repeat_tally(row, skip) else {
                continue;
            };
            if tally.count < self.config.min_repeats {
                continue;
            }
            if groups.count(&fingerprint(row, skip)) == 1 {
                log::trace!(
                    "Row {} repeats '{}' {} times",
                    number,
                    tally.value,
                    tally.count
                );
                repeats.push(number);
                repeated_values.insert(number, tally);
            } else {
                shadowed += 1;
            }
        }

        let duplicates: Vec<usize> = groups
            .duplicate_groups()
            .flat_map(|g| g.rows.iter().copied())
            .collect();

        let stats = ClassificationStats {
            total_rows: grouping.total_rows,
            unique_fingerprints: grouping.unique_fingerprints,
            duplicate_groups: grouping.duplicate_groups,
            duplicate_rows: grouping.duplicate_rows,
            repeat_rows: repeats.len(),
            repeats_shadowed_by_duplicates: shadowed,
        };

        log::debug!(
            "Classified {} rows: {} duplicate rows in {} groups, {} repeat candidates",
            stats.total_rows,
            stats.duplicate_rows,
            stats.duplicate_groups,
            stats.repeat_rows
        );

        Ok(Classification {
            duplicates,
            repeats,
            repeated_values,
            groups,
            stats,
        })
    }
}
