//! Typed rows produced by the cleaner.

use crate::error::CleanError;
use crate::schema::{
    DATA_NAC, EDU, GEO, NOME, NRO_FILHO, NUM_INSC, OBJETIVAS, OUTPUT_COLUMNS, PORT, TOTAL,
};
use chrono::NaiveDate;
use notas_sheet::{CellValue, Sheet, SheetError};
use serde::Serialize;

/// One candidate after cleaning. Every field is present and typed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanedRecord {
    #[serde(rename = "Nome")]
    pub nome: String,
    #[serde(rename = "NumInsc")]
    pub num_insc: String,
    #[serde(rename = "NroFilho")]
    pub nro_filho: i64,
    #[serde(rename = "DataNac")]
    pub data_nac: NaiveDate,
    #[serde(rename = "GEO")]
    pub geo: f64,
    #[serde(rename = "PORT")]
    pub port: f64,
    #[serde(rename = "EDU")]
    pub edu: f64,
    #[serde(rename = "Objetivas")]
    pub objetivas: f64,
    #[serde(rename = "Total")]
    pub total: f64,
}

impl CleanedRecord {
    /// Build a record from a row laid out as [`OUTPUT_COLUMNS`].
    pub fn from_row(row: &[CellValue]) -> Result<Self, CleanError> {
        let [nome, num_insc, nro_filho, data_nac, geo, port, edu, objetivas, total] = row else {
            return Err(CleanError::ColumnCount {
                expected: OUTPUT_COLUMNS.len(),
                actual: row.len(),
            });
        };

        Ok(Self {
            nome: text(nome, NOME)?,
            num_insc: text(num_insc, NUM_INSC)?,
            nro_filho: match nro_filho {
                CellValue::Int(i) => *i,
                other => return Err(CleanError::type_error(NRO_FILHO, other)),
            },
            data_nac: data_nac
                .as_date()
                .ok_or_else(|| CleanError::type_error(DATA_NAC, data_nac))?,
            geo: number(geo, GEO)?,
            port: number(port, PORT)?,
            edu: number(edu, EDU)?,
            objetivas: number(objetivas, OBJETIVAS)?,
            total: number(total, TOTAL)?,
        })
    }

    /// Cells in [`OUTPUT_COLUMNS`] order.
    pub fn to_row(&self) -> Vec<CellValue> {
        vec![
            CellValue::from(self.nome.as_str()),
            CellValue::from(self.num_insc.as_str()),
            CellValue::Int(self.nro_filho),
            CellValue::Date(self.data_nac),
            CellValue::Float(self.geo),
            CellValue::Float(self.port),
            CellValue::Float(self.edu),
            CellValue::Float(self.objetivas),
            CellValue::Float(self.total),
        ]
    }
}

fn text(cell: &CellValue, column: &'static str) -> Result<String, CleanError> {
    match cell {
        CellValue::Null => Err(CleanError::type_error(column, "null")),
        other => Ok(other.to_string()),
    }
}

fn number(cell: &CellValue, column: &'static str) -> Result<f64, CleanError> {
    match cell {
        CellValue::Float(f) => Ok(*f),
        other => Err(CleanError::type_error(column, other)),
    }
}

/// Counters gathered while cleaning one combined table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanStats {
    pub input_rows: usize,
    /// Total values that were the elimination marker and became 0.
    pub eliminated: usize,
    /// NroFilho values that could not be read and became 0.
    pub nro_filho_defaulted: usize,
    pub duplicates_removed: usize,
    /// Rows dropped for holding a null after coercion.
    pub incomplete_removed: usize,
    pub output_rows: usize,
}

/// The cleaned records of one document, in output order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    pub records: Vec<CleanedRecord>,
    pub stats: CleanStats,
}

impl RecordSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Lay the records out as a sheet with the output columns.
    pub fn to_sheet(&self) -> Result<Sheet, SheetError> {
        Sheet::from_rows(
            OUTPUT_COLUMNS,
            self.records.iter().map(CleanedRecord::to_row).collect(),
        )
    }
}
