use sheetdupe::duplicates::{ClassifierConfig, ClassifyError, ResultOrderer, RowClassifier};
use sheetdupe::output::{build_sheets, SheetNames};
use sheetdupe::table::Table;

fn with_header(columns: usize, rows: Vec<Vec<&str>>) -> Table {
    let header: Vec<String> = (1..=columns).map(|c| format!("col{}", c)).collect();
    let mut all: Vec<Vec<&str>> = vec![header.iter().map(String::as_str).collect()];
    all.extend(rows);
    Table::from_strings(all)
}

#[test]
fn test_identical_rows_form_one_group() {
    let table = with_header(
        3,
        vec![vec!["a", "b", "x"], vec!["a", "b", "x"], vec!["a", "b", "y"]],
    );
    let result = RowClassifier::new(ClassifierConfig::new(1, 3))
        .classify(&table)
        .unwrap();

    assert_eq!(result.duplicates, vec![1, 2]);
    assert_eq!(result.stats.duplicate_groups, 1);
    assert_eq!(result.groups.group_of_row(3).unwrap().len(), 1);
    assert!(result.repeats.is_empty());
}

#[test]
fn test_value_repeated_three_times_is_flagged() {
    let table = with_header(4, vec![vec!["z", "p", "p", "p"]]);
    let result = RowClassifier::new(ClassifierConfig::new(2, 3))
        .classify(&table)
        .unwrap();

    assert!(result.duplicates.is_empty());
    assert_eq!(result.repeats, vec![1]);
    assert_eq!(result.repeated_values[&1].value, "p");
    assert_eq!(result.repeated_values[&1].count, 3);
}

#[test]
fn test_duplicate_with_repeats_is_only_a_duplicate() {
    let table = with_header(
        4,
        vec![
            vec!["1", "p", "p", "p"],
            vec!["2", "p", "p", "p"],
            vec!["3", "q", "q", "q"],
        ],
    );
    let result = RowClassifier::new(ClassifierConfig::new(2, 3))
        .classify(&table)
        .unwrap();

    assert_eq!(result.duplicates, vec![1, 2]);
    assert_eq!(result.repeats, vec![3]);
}

#[test]
fn test_header_only_table_is_clean() {
    let table = with_header(3, vec![]);
    let result = RowClassifier::default().classify(&table).unwrap();

    assert!(result.duplicates.is_empty());
    assert!(result.repeats.is_empty());
}

#[test]
fn test_larger_group_precedes_smaller_group() {
    let table = with_header(
        3,
        vec![
            vec!["1", "k", "b"],
            vec!["2", "k", "b"],
            vec!["3", "k", "a"],
            vec!["4", "k", "a"],
            vec!["5", "k", "a"],
        ],
    );
    let result = RowClassifier::new(ClassifierConfig::new(3, 3))
        .classify(&table)
        .unwrap();
    assert_eq!(result.duplicates, vec![1, 2, 3, 4, 5]);

    let ordered = ResultOrderer::new(3, 3).order_duplicates(
        &table,
        &result.duplicates,
        &result.groups,
    );
    assert_eq!(ordered, vec![3, 4, 5, 1, 2]);
}

#[test]
fn test_default_settings_compare_from_third_column() {
    // Columns 1 and 2 differ, the rest match
    let table = Table::from_strings(vec![
        vec!["id", "date", "a", "b"],
        vec!["1", "2024-01-01", "x", "y"],
        vec!["2", "2024-02-01", "x", "y"],
    ]);
    let result = RowClassifier::default().classify(&table).unwrap();
    assert_eq!(result.duplicates, vec![1, 2]);
}

#[test]
fn test_whitespace_values_never_count_as_repeats() {
    let table = Table::from_strings(vec![
        vec!["id", "a", "b", "c", "d"],
        vec!["1", " ", " ", " ", "x"],
        vec!["2", "", "", "", "y"],
    ]);
    let result = RowClassifier::new(ClassifierConfig::new(2, 3))
        .classify(&table)
        .unwrap();
    assert!(result.repeats.is_empty());
}

#[test]
fn test_config_error_names_columns() {
    let table = Table::from_strings(vec![vec!["a", "b"], vec!["1", "2"]]);
    let err = RowClassifier::new(ClassifierConfig::new(4, 3))
        .classify(&table)
        .unwrap_err();

    assert_eq!(
        err,
        ClassifyError::ColumnsToSkipOutOfRange {
            columns_to_skip: 4,
            columns: 2
        }
    );
    assert!(err.to_string().contains("only has 2 columns"));
}

#[test]
fn test_sheets_copy_header_and_full_rows() {
    let table = Table::from_strings(vec![
        vec!["id", "name", "v1", "v2", "v3"],
        vec!["1", "b", "n", "n", "n"],
        vec!["2", "x", "d", "e", "f"],
        vec!["3", "a", "m", "m", "m"],
        vec!["4", "x", "d", "e", "f"],
    ]);
    let config = ClassifierConfig::new(2, 3);
    let result = RowClassifier::new(config).classify(&table).unwrap();
    let sheets = build_sheets(
        &table,
        &result,
        &ResultOrderer::new(2, 3),
        &SheetNames::default(),
    );

    let dupes = &sheets.duplicates.table;
    assert_eq!(dupes.header(), table.header());
    assert_eq!(dupes.row(1), table.row(2));
    assert_eq!(dupes.row(2), table.row(4));

    // Repeats ordered by column 2: "a" before "b"
    let repeats = &sheets.repeats.table;
    assert_eq!(repeats.data_row_count(), 2);
    assert_eq!(repeats.row(1), table.row(3));
    assert_eq!(repeats.row(2), table.row(1));
}
