pub mod detector;
pub mod error;
pub mod extractor;
pub mod layout;

use error::Result;
use std::path::Path;

/// A table as found on one page: row 0 is the header, the rest are data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// 1-based page the table was found on
    pub page: usize,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Build a table from string-like rows (first row is the header)
    pub fn new<S: Into<String>>(page: usize, rows: Vec<Vec<S>>) -> Self {
        Self {
            page,
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    pub fn header(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

/// Extract tables from a PDF file using default options
pub fn extract_tables_from_pdf<P: AsRef<Path>>(path: P) -> Result<Vec<RawTable>> {
    extract_tables_with_options(path, extractor::PdfOptions::default())
}

/// Extract tables from a PDF file with custom options
pub fn extract_tables_with_options<P: AsRef<Path>>(
    path: P,
    options: extractor::PdfOptions,
) -> Result<Vec<RawTable>> {
    PdfExtractor::new(options).extract_tables_from_path(path.as_ref())
}

// Re-export commonly used types
pub use error::PdfError;
pub use extractor::PdfOptions;
pub use extractor::PdfExtractor;
