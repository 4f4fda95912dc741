use crate::detector::{TableDetector, TableRegion};
use crate::layout;
use crate::error::{PdfError, Result};
use crate::RawTable;
use lopdf::Document;
use std::path::Path;

const PDF_SIGNATURE: &[u8] = b"%PDF-";

#[derive(Debug, Clone, PartialEq)]
pub struct PdfOptions {
    /// 1-based inclusive page range; `None` reads every page
    pub page_range: Option<(usize, usize)>,
    pub min_table_rows: usize,
    pub min_table_cols: usize,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            page_range: None,
            min_table_rows: 2,
            min_table_cols: 2,
        }
    }
}

impl PdfOptions {
    #[must_use]
    pub fn with_page_range(mut self, start: usize, end: usize) -> Self {
        self.page_range = Some((start, end));
        self
    }

    #[must_use]
    pub fn with_min_table_size(mut self, rows: usize, cols: usize) -> Self {
        self.min_table_rows = rows;
        self.min_table_cols = cols;
        self
    }
}

pub struct PdfExtractor {
    options: PdfOptions,
    detector: TableDetector,
}

impl PdfExtractor {
    pub fn new(options: PdfOptions) -> Self {
        let detector = TableDetector::new(options.min_table_rows, options.min_table_cols);
        Self { options, detector }
    }

    pub fn options(&self) -> &PdfOptions {
        &self.options
    }

    pub fn extract_tables_from_path(&self, path: &Path) -> Result<Vec<RawTable>> {
        let bytes = std::fs::read(path)?;
        self.extract_tables_from_bytes(&bytes)
    }

    /// Extract every detected table, in page order and top to bottom within
    /// a page. Row 0 of each table is its header as printed on that page.
    pub fn extract_tables_from_bytes(&self, bytes: &[u8]) -> Result<Vec<RawTable>> {
        let doc = Self::load_document(bytes)?;
        let page_regions = self.regions_per_page(&doc)?;

        let mut tables = Vec::new();
        for (page_num, regions) in page_regions {
            tracing::debug!("Page {}: {} table(s) detected", page_num, regions.len());
            tables.extend(regions.into_iter().map(|region| RawTable {
                page: page_num,
                rows: region.rows,
            }));
        }

        if tables.is_empty() {
            Err(PdfError::NoTablesFound)
        } else {
            tracing::info!("Extracted {} table(s)", tables.len());
            Ok(tables)
        }
    }

    fn load_document(bytes: &[u8]) -> Result<Document> {
        // Some producers emit a few junk bytes before the header
        let head = &bytes[..bytes.len().min(1024)];
        if !head.windows(PDF_SIGNATURE.len()).any(|w| w == PDF_SIGNATURE) {
            return Err(PdfError::NotAPdf);
        }

        Document::load_mem(bytes)
            .map_err(|e| PdfError::ParseError(format!("Failed to load PDF: {}", e)))
    }

    fn page_bounds(&self, page_count: usize) -> Result<(usize, usize)> {
        let Some((s, e)) = self.options.page_range else {
            return Ok((1, page_count));
        };

        if s > e {
            return Err(PdfError::InvalidPageRange(format!(
                "Start page {} is greater than end page {}",
                s, e
            )));
        }
        if s < 1 {
            return Err(PdfError::InvalidPageRange(
                "Page numbers must be >= 1".to_string(),
            ));
        }
        let clamped_end = e.min(page_count);
        if s > clamped_end {
            return Err(PdfError::InvalidPageRange(format!(
                "Start page {} exceeds document length of {} pages",
                s, page_count
            )));
        }
        Ok((s, clamped_end))
    }

    /// Detect tables page by page. Positioned text from the content stream
    /// is tried first; pages where it is unreadable or holds no table fall
    /// back to lopdf's text layer.
    fn regions_per_page(&self, doc: &Document) -> Result<Vec<(usize, Vec<TableRegion>)>> {
        let pages = doc.get_pages();
        if pages.is_empty() {
            return Err(PdfError::ParseError("Document has no pages".to_string()));
        }
        let (start, end) = self.page_bounds(pages.len())?;

        let mut results = Vec::new();
        let mut last_error: Option<String> = None;

        for page_num in start..=end {
            let Ok(lopdf_page) = u32::try_from(page_num) else {
                break;
            };
            let Some(&page_id) = pages.get(&lopdf_page) else {
                break;
            };

            let mut readable = false;
            let mut regions = match layout::page_lines(doc, page_id) {
                Ok(lines) if layout::is_legible(&lines) => {
                    readable = true;
                    self.detector.detect_in_lines(&lines)
                }
                Ok(_) => {
                    tracing::debug!("Page {}: positioned text is not legible", page_num);
                    Vec::new()
                }
                Err(e) => {
                    tracing::warn!("Reading content of page {} failed: {}", page_num, e);
                    last_error = Some(e.to_string());
                    Vec::new()
                }
            };

            if regions.is_empty() {
                match doc.extract_text(&[lopdf_page]) {
                    Ok(text) => {
                        readable = true;
                        regions = self.detector.detect_tables(&text);
                    }
                    Err(e) => {
                        last_error = Some(e.to_string());
                        tracing::warn!("lopdf extract_text failed on page {}: {}", page_num, e);
                    }
                }
            }

            if readable {
                results.push((page_num, regions));
            }
        }

        // If no pages were successfully read, return an error
        if results.is_empty() {
            let error_suffix = last_error
                .as_ref()
                .map(|e| format!(": {}", e))
                .unwrap_or_default();
            return Err(PdfError::ParseError(format!(
                "Failed to extract text from any page{}",
                error_suffix
            )));
        }

        Ok(results)
    }
}
