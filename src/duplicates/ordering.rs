//! Deterministic ordering of classification results.
//!
//! Duplicates are emitted group by group: larger groups first, equal sizes
//! ordered by the designated sort column of each group's first row, numbers
//! numerically and text ordinally (see [`SortKey`]). Repeat
//! candidates are ordered by the text of their first compared column. Both
//! sorts are stable, so ties keep their incoming order and ordering an already
//! ordered list is a no-op.

use std::cmp::{Ordering, Reverse};
use std::collections::HashMap;

use super::classifier::DEFAULT_COLUMNS_TO_SKIP;
use super::groups::FingerprintIndex;
use crate::table::Table;

/// Default column used to break ties between equally sized duplicate groups.
pub const DEFAULT_SORT_COLUMN: usize = 3;

/// Typed view of a tie-break cell.
///
/// Blank cells sort first, then numbers in numeric order, then any other
/// text in ordinal order. Keeping the three kinds apart makes this a total
/// order even when a column mixes numbers and text.
#[derive(Debug, Clone, Copy)]
pub enum SortKey<'a> {
    /// Missing or empty cell
    Blank,
    /// Cell text that parses as a finite number
    Number(f64),
    /// Any other text
    Text(&'a str),
}

impl<'a> SortKey<'a> {
    /// Classify cell text.
    #[must_use]
    pub fn of(text: &'a str) -> Self {
        if text.is_empty() {
            return SortKey::Blank;
        }
        match text.parse::<f64>() {
            Ok(n) if n.is_finite() => SortKey::Number(n),
            _ => SortKey::Text(text),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Blank => 0,
            SortKey::Number(_) => 1,
            SortKey::Text(_) => 2,
        }
    }
}

impl Ord for SortKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for SortKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey<'_> {}

/// Orders row lists and copies them into output tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultOrderer {
    columns_to_skip: usize,
    sort_column: usize,
}

impl Default for ResultOrderer {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMNS_TO_SKIP, DEFAULT_SORT_COLUMN)
    }
}

impl ResultOrderer {
    /// Create an orderer.
    ///
    /// * `columns_to_skip` - first compared column; repeat candidates sort by it
    /// * `sort_column` - tie-break column for duplicate groups
    #[must_use]
    pub fn new(columns_to_skip: usize, sort_column: usize) -> Self {
        Self {
            columns_to_skip,
            sort_column,
        }
    }

    /// Order duplicate rows group by group.
    ///
    /// Rows are bucketed by the fingerprint group they belong to in `groups`;
    /// a row unknown to `groups` forms a bucket of its own with size 1.
    /// Buckets are ordered by descending group size, then by the
    /// [`SortKey`] of the sort column in the group's first row.
    #[must_use]
    pub fn order_duplicates(
        &self,
        table: &Table,
        rows: &[usize],
        groups: &FingerprintIndex,
    ) -> Vec<usize> {
        struct Bucket {
            size: usize,
            anchor: usize,
            rows: Vec<usize>,
        }

        let mut buckets: Vec<Bucket> = Vec::new();
        let mut bucket_of_group: HashMap<usize, usize> = HashMap::new();

        for &row in rows {
            match groups.group_index_of_row(row) {
                Some(group_idx) => {
                    let group = &groups.groups()[group_idx];
                    let bucket = *bucket_of_group.entry(group_idx).or_insert_with(|| {
                        buckets.push(Bucket {
                            size: group.len(),
                            anchor: group.first_row().unwrap_or(row),
                            rows: Vec::new(),
                        });
                        buckets.len() - 1
                    });
                    buckets[bucket].rows.push(row);
                }
                None => buckets.push(Bucket {
                    size: 1,
                    anchor: row,
                    rows: vec![row],
                }),
            }
        }

        buckets.sort_by_key(|b| {
            (
                Reverse(b.size),
                SortKey::of(table.text(b.anchor, self.sort_column)),
            )
        });

        buckets.into_iter().flat_map(|b| b.rows).collect()
    }

    /// Order repeat candidates by the text of the first compared column.
    #[must_use]
    pub fn order_repeats(&self, table: &Table, rows: &[usize]) -> Vec<usize> {
        let mut ordered = rows.to_vec();
        ordered.sort_by_key(|&row| table.text(row, self.columns_to_skip));
        ordered
    }

    /// Copy the header and then each listed row, all columns, into a new table.
    #[must_use]
    pub fn copy_rows(&self, table: &Table, ordered: &[usize]) -> Table {
        let Some(header) = table.header() else {
            return Table::default();
        };

        let mut target = Table::with_header(header.clone());
        for &row in ordered {
            match table.row(row) {
                Some(source) => target.push_row(source.clone()),
                None => log::warn!("Row {} is outside the source table, skipped", row),
            }
        }
        target
    }

    /// Order `rows` and copy them into a new table.
    ///
    /// With grouping information the rows are ordered as duplicates, without
    /// it as repeat candidates.
    #[must_use]
    pub fn order_and_copy(
        &self,
        table: &Table,
        rows: &[usize],
        groups: Option<&FingerprintIndex>,
    ) -> Table {
        let ordered = match groups {
            Some(groups) => self.order_duplicates(table, rows, groups),
            None => self.order_repeats(table, rows),
        };
        self.copy_rows(table, &ordered)
    }
}
