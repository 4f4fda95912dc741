//! Concatenation of extracted tables into one sheet.

use crate::error::CombineError;
use notas_pdf::RawTable;
use notas_sheet::Sheet;

/// Concatenate every table's data rows under the first table's header.
///
/// Row 0 of each table is treated as that table's header and skipped; rows
/// keep their original order. Later headers are not compared with the first
/// one: columns are matched by position only, so every data row must be as
/// wide as the first header.
pub fn combine_tables(tables: &[RawTable]) -> Result<Sheet, CombineError> {
    let first = tables.first().ok_or(CombineError::NoTables)?;
    let header = first.header();

    let mut combined = Sheet::with_columns(header.iter().cloned());

    for (table_idx, table) in tables.iter().enumerate() {
        let mut part = Sheet::with_columns(header.iter().cloned());

        for (row_idx, row) in table.data_rows().iter().enumerate() {
            if row.len() != header.len() {
                return Err(CombineError::ShapeMismatch {
                    table: table_idx + 1,
                    page: table.page,
                    row: row_idx + 1,
                    expected: header.len(),
                    actual: row.len(),
                });
            }
            part.row_append(row.clone())?;
        }

        tracing::debug!(
            "Table {} (page {}): {} data row(s)",
            table_idx + 1,
            table.page,
            part.row_count()
        );
        combined.append(&part)?;
    }

    tracing::info!(
        "Combined {} table(s) into {} row(s)",
        tables.len(),
        combined.row_count()
    );
    Ok(combined)
}
