use notas_sheet::{CellValue, CleanOptions, NullStrategy, Sheet};

#[test]
fn test_remove_duplicates_by_column() {
    let mut sheet = Sheet::from_rows(
        ["id", "nome"],
        vec![vec!["1", "Ana"], vec!["1", "Ana Maria"], vec!["2", "Bea"]],
    )
    .unwrap();

    let removed = sheet.remove_duplicates_by_columns(&["id"]).unwrap();
    assert_eq!(removed, 1);
    assert_eq!(sheet.row_count(), 2);
    assert_eq!(sheet.get_by_name(0, "nome").unwrap().as_str(), "Ana");
    assert_eq!(sheet.get_by_name(1, "id").unwrap().as_str(), "2");
}

#[test]
fn test_remove_duplicates_unknown_column() {
    let mut sheet = Sheet::from_rows(["id"], vec![vec!["1"]]).unwrap();
    assert!(sheet.remove_duplicates_by_columns(&["missing"]).is_err());
}

#[test]
fn test_clean_data_trim_empty_to_null() {
    let mut sheet = Sheet::from_rows(["nome"], vec![vec!["  Ana  "], vec![""]]).unwrap();

    let options = CleanOptions {
        trim: true,
        null_strategy: NullStrategy::EmptyToNull,
        ..CleanOptions::default()
    };

    sheet.clean_data(&options);
    assert_eq!(sheet.get_by_name(0, "nome").unwrap().as_str(), "Ana");
    assert!(sheet.get_by_name(1, "nome").unwrap().is_null());
}

#[test]
fn test_drop_null_rows_preserves_order() {
    let mut sheet = Sheet::from_rows(
        ["a", "b"],
        vec![
            vec![CellValue::Int(1), CellValue::Int(2)],
            vec![CellValue::Int(3), CellValue::Null],
            vec![CellValue::Int(5), CellValue::Int(6)],
        ],
    )
    .unwrap();

    assert_eq!(sheet.drop_null_rows(), 1);
    assert_eq!(sheet.column_by_name("a").unwrap(), vec![CellValue::Int(1), CellValue::Int(5)]);
}

#[test]
fn test_null_and_empty_string_are_distinct_keys() {
    let mut sheet = Sheet::from_rows(
        ["a"],
        vec![vec![CellValue::Null], vec![CellValue::String(String::new())]],
    )
    .unwrap();

    assert_eq!(sheet.remove_duplicates_by_columns(&[]).unwrap(), 0);
}

#[test]
fn test_negative_zero_score_is_a_duplicate() {
    let mut sheet = Sheet::from_rows(
        ["nome", "total"],
        vec![
            vec![CellValue::from("Bea"), CellValue::Float(0.0)],
            vec![CellValue::from("Bea"), CellValue::Float(-0.0)],
        ],
    )
    .unwrap();

    assert_eq!(sheet.remove_duplicates_by_columns(&[]).unwrap(), 1);
    assert_eq!(sheet.row_count(), 1);
}
