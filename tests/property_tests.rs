use proptest::prelude::*;
use sheetdupe::duplicates::{
    fingerprint, repeat_tally, ClassifierConfig, ResultOrderer, RowClassifier,
};
use sheetdupe::table::Table;
use std::collections::HashSet;

/// Small alphabet so that duplicates and repeats actually occur.
fn cell() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just(" ".to_string()),
        "[abc]",
        "[abc]{2}",
    ]
}

fn table_strategy() -> impl Strategy<Value = (Table, usize, usize)> {
    (1usize..6, 0usize..25).prop_flat_map(|(columns, rows)| {
        (
            prop::collection::vec(prop::collection::vec(cell(), columns), rows),
            1..=columns,
            1usize..4,
        )
            .prop_map(move |(data, skip, threshold)| {
                let header: Vec<String> = (1..=columns).map(|c| format!("h{}", c)).collect();
                let mut all = vec![header];
                all.extend(data);
                (Table::from_strings(all), skip, threshold)
            })
    })
}

proptest! {
    #[test]
    fn test_duplicates_and_repeats_disjoint((table, skip, threshold) in table_strategy()) {
        let result = RowClassifier::new(ClassifierConfig::new(skip, threshold))
            .classify(&table)
            .unwrap();

        let dupes: HashSet<usize> = result.duplicates.iter().copied().collect();
        for row in &result.repeats {
            prop_assert!(!dupes.contains(row));
        }
    }

    #[test]
    fn test_duplicate_iff_shared_fingerprint((table, skip, threshold) in table_strategy()) {
        let result = RowClassifier::new(ClassifierConfig::new(skip, threshold))
            .classify(&table)
            .unwrap();
        let dupes: HashSet<usize> = result.duplicates.iter().copied().collect();

        for (number, row) in table.data_rows() {
            let fp = fingerprint(row, skip);
            let shared = table
                .data_rows()
                .any(|(other, r)| other != number && fingerprint(r, skip) == fp);
            prop_assert_eq!(dupes.contains(&number), shared);
        }
    }

    #[test]
    fn test_repeat_iff_unique_and_over_threshold((table, skip, threshold) in table_strategy()) {
        let result = RowClassifier::new(ClassifierConfig::new(skip, threshold))
            .classify(&table)
            .unwrap();
        let dupes: HashSet<usize> = result.duplicates.iter().copied().collect();
        let repeats: HashSet<usize> = result.repeats.iter().copied().collect();

        for (number, row) in table.data_rows() {
            let over = repeat_tally(row, skip).is_some_and(|t| t.count >= threshold);
            let expected = over && !dupes.contains(&number);
            prop_assert_eq!(repeats.contains(&number), expected);
        }

        // Ascending row order
        prop_assert!(result.repeats.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_every_row_in_exactly_one_group((table, skip, threshold) in table_strategy()) {
        let result = RowClassifier::new(ClassifierConfig::new(skip, threshold))
            .classify(&table)
            .unwrap();

        let mut seen: Vec<usize> = result
            .groups
            .groups()
            .iter()
            .flat_map(|g| g.rows.iter().copied())
            .collect();
        seen.sort_unstable();
        let expected: Vec<usize> = (1..=table.data_row_count()).collect();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn test_ordering_is_idempotent_permutation((table, skip, threshold) in table_strategy()) {
        let result = RowClassifier::new(ClassifierConfig::new(skip, threshold))
            .classify(&table)
            .unwrap();
        let orderer = ResultOrderer::new(skip, 1);

        let once = orderer.order_duplicates(&table, &result.duplicates, &result.groups);
        let twice = orderer.order_duplicates(&table, &once, &result.groups);
        prop_assert_eq!(&once, &twice);

        let mut sorted_once = once.clone();
        sorted_once.sort_unstable();
        let mut sorted_input = result.duplicates.clone();
        sorted_input.sort_unstable();
        prop_assert_eq!(sorted_once, sorted_input);

        let repeats_once = orderer.order_repeats(&table, &result.repeats);
        let repeats_twice = orderer.order_repeats(&table, &repeats_once);
        prop_assert_eq!(repeats_once, repeats_twice);
    }

    #[test]
    fn test_group_sizes_non_increasing((table, skip, threshold) in table_strategy()) {
        let result = RowClassifier::new(ClassifierConfig::new(skip, threshold))
            .classify(&table)
            .unwrap();
        let ordered = ResultOrderer::new(skip, 1)
            .order_duplicates(&table, &result.duplicates, &result.groups);

        let sizes: Vec<usize> = ordered
            .iter()
            .map(|&row| result.groups.group_of_row(row).unwrap().len())
            .collect();
        prop_assert!(sizes.windows(2).all(|w| w[0] >= w[1]));
    }
}
