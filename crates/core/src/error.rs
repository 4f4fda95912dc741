//! Error types for notas.
//!
//! Each stage has its own error enum. [`PipelineError`] tags a stage error
//! with its failure domain and renders the message shown to the user.

use notas_pdf::PdfError;
use notas_sheet::SheetError;
use thiserror::Error;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors raised while concatenating extracted tables.
#[derive(Debug, Error)]
pub enum CombineError {
    /// The extractor returned no tables.
    #[error("no tables to combine")]
    NoTables,

    /// A data row does not have one cell per header column.
    #[error("table {table} (page {page}), row {row}: expected {expected} columns, found {actual}")]
    ShapeMismatch {
        table: usize,
        page: usize,
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Sheet operation failed.
    #[error(transparent)]
    Sheet(#[from] SheetError),
}

/// Errors raised by the cleaning pipeline.
#[derive(Debug, Error)]
pub enum CleanError {
    /// The combined table does not have the fixed source column count.
    #[error("expected {expected} columns, found {actual}")]
    ColumnCount { expected: usize, actual: usize },

    /// A surviving cell does not hold the type its column requires.
    #[error("column {column}: unexpected value '{value}'")]
    Type { column: &'static str, value: String },

    /// Sheet operation failed.
    #[error(transparent)]
    Sheet(#[from] SheetError),
}

impl CleanError {
    /// Create a type error.
    pub fn type_error(column: &'static str, value: impl ToString) -> Self {
        Self::Type {
            column,
            value: value.to_string(),
        }
    }
}

/// Errors raised while serializing the cleaned records.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Spreadsheet or CSV writer failed.
    #[error(transparent)]
    Sheet(#[from] SheetError),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures before cleaning starts: reading the PDF or combining its tables.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error(transparent)]
    Pdf(#[from] PdfError),

    #[error(transparent)]
    Combine(#[from] CombineError),
}

/// A stage failure, rendered with the user-facing message of its stage.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// PDF could not be read or its tables could not be combined.
    #[error("Erro ao processar o PDF: {0}")]
    Extraction(#[from] ExtractionError),

    /// Combined table could not be cleaned.
    #[error("Erro durante a limpeza dos dados: {0}")]
    Cleaning(#[from] CleanError),

    /// Cleaned records could not be serialized.
    #[error("Erro ao gerar a planilha: {0}")]
    Export(#[from] ExportError),
}

impl From<PdfError> for PipelineError {
    fn from(err: PdfError) -> Self {
        Self::Extraction(ExtractionError::Pdf(err))
    }
}

impl From<CombineError> for PipelineError {
    fn from(err: CombineError) -> Self {
        Self::Extraction(ExtractionError::Combine(err))
    }
}
