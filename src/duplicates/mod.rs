//! Duplicate row detection.
//!
//! This module provides functionality for:
//! - Row fingerprinting and grouping (Pass 1)
//! - Intra-row repeated value detection (Pass 2)
//! - Ordering and copying of results into output tables

pub mod classifier;
pub mod groups;
pub mod ordering;

pub use classifier::{
    repeat_tally, Classification, ClassificationStats, ClassifierConfig, ClassifyError,
    RepeatedValue, RowClassifier,
};
pub use groups::{
    fingerprint, group_by_fingerprint, FingerprintGroup, FingerprintIndex, GroupingStats,
};
pub use ordering::{ResultOrderer, SortKey, DEFAULT_SORT_COLUMN};
