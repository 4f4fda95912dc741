use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Input is not a PDF document (missing %PDF- signature)")]
    NotAPdf,

    #[error("Failed to parse PDF: {0}")]
    ParseError(String),

    #[error("No tables found in PDF")]
    NoTablesFound,

    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PdfError>;
