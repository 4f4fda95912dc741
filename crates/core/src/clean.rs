//! Cleaning of the combined table into typed records.

use crate::config::CleanConfig;
use crate::error::CleanError;
use crate::parse::{coerce_date, coerce_int, coerce_number};
use crate::record::{CleanStats, CleanedRecord, RecordSet};
use crate::schema::{
    DATA_NAC, DROPPED_COLUMNS, NRO_FILHO, NUMERIC_COLUMNS, SOURCE_COLUMNS, TOTAL,
};
use notas_sheet::{CellValue, CleanOptions, NullStrategy, Sheet};

/// Turns a combined 12-column table into cleaned records.
#[derive(Debug, Clone, Default)]
pub struct Cleaner {
    config: CleanConfig,
}

impl Cleaner {
    pub fn new(config: CleanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CleanConfig {
        &self.config
    }

    /// Clean a combined table.
    ///
    /// Columns are renamed by position, so the input must have exactly
    /// [`SOURCE_COLUMNS`] columns. Rows that are duplicates of an earlier row
    /// or that still hold a null after coercion are dropped; the rest keep
    /// their order.
    ///
    /// # Errors
    ///
    /// Returns `CleanError::ColumnCount` if the table is not 12 columns wide.
    pub fn clean(&self, combined: &Sheet) -> Result<RecordSet, CleanError> {
        if combined.col_count() != SOURCE_COLUMNS.len() {
            return Err(CleanError::ColumnCount {
                expected: SOURCE_COLUMNS.len(),
                actual: combined.col_count(),
            });
        }

        let mut stats = CleanStats {
            input_rows: combined.row_count(),
            ..CleanStats::default()
        };

        let mut sheet = combined.clone();
        sheet.rename_columns(&SOURCE_COLUMNS)?;
        sheet.clean_data(&CleanOptions {
            trim: true,
            normalize_whitespace: false,
            null_strategy: NullStrategy::EmptyToNull,
        });
        sheet.column_delete_multi_by_name(&DROPPED_COLUMNS)?;

        let token = self.config.eliminated_token.as_str();
        sheet.column_map_by_name(TOTAL, |cell| match cell {
            CellValue::String(s) if s == token => {
                stats.eliminated += 1;
                CellValue::Int(0)
            }
            other => other.clone(),
        })?;

        sheet.column_map_by_name(NRO_FILHO, |cell| {
            CellValue::Int(coerce_int(cell).unwrap_or_else(|| {
                stats.nro_filho_defaulted += 1;
                0
            }))
        })?;

        let order = self.config.date_order;
        sheet.column_map_by_name(DATA_NAC, |cell| coerce_date(cell, order))?;

        for column in NUMERIC_COLUMNS {
            sheet.column_map_by_name(column, coerce_number)?;
        }

        stats.duplicates_removed = sheet.remove_duplicates_by_columns(&[])?;
        stats.incomplete_removed = sheet.drop_null_rows();

        let records = sheet
            .rows()
            .map(|row| CleanedRecord::from_row(row))
            .collect::<Result<Vec<_>, _>>()?;
        stats.output_rows = records.len();

        tracing::info!(
            "Cleaned {} row(s) into {} record(s): {} eliminated, {} NroFilho defaulted, {} duplicate(s), {} incomplete",
            stats.input_rows,
            stats.output_rows,
            stats.eliminated,
            stats.nro_filho_defaulted,
            stats.duplicates_removed,
            stats.incomplete_removed
        );

        Ok(RecordSet { records, stats })
    }
}

/// Clean a combined table with the default configuration.
pub fn clean_table(combined: &Sheet) -> Result<RecordSet, CleanError> {
    Cleaner::default().clean(combined)
}
