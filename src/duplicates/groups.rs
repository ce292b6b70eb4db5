//! Row fingerprints and fingerprint grouping.
//!
//! # Overview
//!
//! A row's fingerprint is the concatenation, with no separator, of the string
//! form of every cell in its compared range: column `columns_to_skip`
//! (1-based, inclusive) up to the last column. Empty cells contribute `""`.
//! Two rows are duplicates of each other exactly when their fingerprints are
//! equal.
//!
//! Grouping keeps groups in the order their fingerprint was first seen and
//! rows inside a group in ascending row order, so every downstream step is
//! deterministic.
//!
//! # Example
//!
//! ```
//! use sheetdupe::duplicates::group_by_fingerprint;
//! use sheetdupe::table::Table;
//!
//! let table = Table::from_strings(vec![
//!     vec!["k", "v1", "v2"],
//!     vec!["1", "a", "b"],
//!     vec!["2", "a", "b"],
//!     vec!["3", "a", "c"],
//! ]);
//!
//! let (index, stats) = group_by_fingerprint(&table, 2);
//!
//! assert_eq!(stats.total_rows, 3);
//! assert_eq!(stats.duplicate_groups, 1);
//! assert_eq!(index.group_of("ab").unwrap().rows, vec![1, 2]);
//! ```

use std::collections::HashMap;

use serde::Serialize;

use crate::table::{Row, Table};

/// Build the fingerprint of a row over columns `columns_to_skip..=C`.
///
/// `columns_to_skip` is 1-based; a value of `0` is treated as `1`.
#[must_use]
pub fn fingerprint(row: &Row, columns_to_skip: usize) -> String {
    compared_range(row, columns_to_skip)
        .iter()
        .map(|cell| cell.as_deref().unwrap_or(""))
        .collect()
}

/// The cells of a row that take part in comparison.
#[must_use]
pub fn compared_range(row: &Row, columns_to_skip: usize) -> &[Option<String>] {
    let start = columns_to_skip.saturating_sub(1).min(row.len());
    &row[start..]
}

/// Rows sharing one fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FingerprintGroup {
    /// The shared fingerprint
    pub fingerprint: String,
    /// Data row numbers in insertion order
    pub rows: Vec<usize>,
}

impl FingerprintGroup {
    /// Create a group holding a single row.
    #[must_use]
    pub fn new(fingerprint: String, row: usize) -> Self {
        Self {
            fingerprint,
            rows: vec![row],
        }
    }

    /// Number of rows in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True if more than one row shares the fingerprint.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.rows.len() > 1
    }

    /// First row of the group.
    #[must_use]
    pub fn first_row(&self) -> Option<usize> {
        self.rows.first().copied()
    }
}

/// Fingerprint groups in first-seen order with lookup by fingerprint and by
/// row number.
#[derive(Debug, Clone, Default)]
pub struct FingerprintIndex {
    groups: Vec<FingerprintGroup>,
    by_fingerprint: HashMap<String, usize>,
    by_row: HashMap<usize, usize>,
}

impl FingerprintIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row under its fingerprint.
    pub fn insert(&mut self, fingerprint: String, row: usize) {
        let idx = match self.by_fingerprint.get(&fingerprint) {
            Some(&idx) => {
                self.groups[idx].rows.push(row);
                idx
            }
            None => {
                let idx = self.groups.len();
                self.by_fingerprint.insert(fingerprint.clone(), idx);
                self.groups.push(FingerprintGroup::new(fingerprint, row));
                idx
            }
        };
        self.by_row.insert(row, idx);
    }

    /// Group holding the given fingerprint.
    #[must_use]
    pub fn group_of(&self, fingerprint: &str) -> Option<&FingerprintGroup> {
        self.by_fingerprint.get(fingerprint).map(|&i| &self.groups[i])
    }

    /// Position (in first-seen order) of the group containing `row`.
    #[must_use]
    pub fn group_index_of_row(&self, row: usize) -> Option<usize> {
        self.by_row.get(&row).copied()
    }

    /// Group containing `row`.
    #[must_use]
    pub fn group_of_row(&self, row: usize) -> Option<&FingerprintGroup> {
        self.group_index_of_row(row).map(|i| &self.groups[i])
    }

    /// Size of the group holding `fingerprint`, or 0 if unknown.
    #[must_use]
    pub fn count(&self, fingerprint: &str) -> usize {
        self.group_of(fingerprint).map_or(0, FingerprintGroup::len)
    }

    /// All groups in first-seen order.
    #[must_use]
    pub fn groups(&self) -> &[FingerprintGroup] {
        &self.groups
    }

    /// Groups with more than one row, in first-seen order.
    pub fn duplicate_groups(&self) -> impl Iterator<Item = &FingerprintGroup> {
        self.groups.iter().filter(|g| g.has_duplicates())
    }

    /// Number of distinct fingerprints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True if no row has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Statistics from fingerprint grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupingStats {
    /// Data rows fingerprinted
    pub total_rows: usize,
    /// Distinct fingerprints
    pub unique_fingerprints: usize,
    /// Groups with 2+ rows
    pub duplicate_groups: usize,
    /// Rows belonging to a group with 2+ rows
    pub duplicate_rows: usize,
}

/// Fingerprint every data row of `table` and group rows by fingerprint.
///
/// The header (row 0) is never fingerprinted.
#[must_use]
pub fn group_by_fingerprint(
    table: &Table,
    columns_to_skip: usize,
) -> (FingerprintIndex, GroupingStats) {
    let mut index = FingerprintIndex::new();
    let mut stats = GroupingStats::default();

    for (number, row) in table.data_rows() {
        stats.total_rows += 1;
        index.insert(fingerprint(row, columns_to_skip), number);
    }

    stats.unique_fingerprints = index.len();
    for group in index.duplicate_groups() {
        stats.duplicate_groups += 1;
        stats.duplicate_rows += group.len();
        log::trace!(
            "Duplicate group of {} rows starting at row {}",
            group.len(),
            group.rows[0]
        );
    }

    (index, stats)
}
