//! Extract, Combine, Clean, Export over one uploaded document.

use crate::clean::Cleaner;
use crate::combine::combine_tables;
use crate::config::PipelineConfig;
use crate::error::PipelineResult;
use crate::export::{export, ExportFormat};
use crate::record::RecordSet;
use notas_pdf::{PdfError, PdfExtractor, RawTable};
use notas_sheet::Sheet;

/// Source of raw tables for a PDF document.
pub trait TableExtractor {
    /// Return every table in the document, in page order.
    fn extract(&self, pdf: &[u8]) -> Result<Vec<RawTable>, PdfError>;
}

impl TableExtractor for PdfExtractor {
    fn extract(&self, pdf: &[u8]) -> Result<Vec<RawTable>, PdfError> {
        self.extract_tables_from_bytes(pdf)
    }
}

/// The exported file, ready to be written or offered for download.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub file_name: String,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

/// Everything a full run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub combined: Sheet,
    pub records: RecordSet,
    pub artifact: Artifact,
}

/// Runs the stages for one document at a time.
pub struct Pipeline<E = PdfExtractor> {
    extractor: E,
    cleaner: Cleaner,
    config: PipelineConfig,
}

impl Pipeline<PdfExtractor> {
    pub fn new(config: PipelineConfig) -> Self {
        let extractor = PdfExtractor::new(config.pdf.clone());
        Self::with_extractor(extractor, config)
    }
}

impl Default for Pipeline<PdfExtractor> {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl<E: TableExtractor> Pipeline<E> {
    pub fn with_extractor(extractor: E, config: PipelineConfig) -> Self {
        Self {
            extractor,
            cleaner: Cleaner::new(config.clean.clone()),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Read the document's tables and stack them into one sheet.
    pub fn extract(&self, pdf: &[u8]) -> PipelineResult<Sheet> {
        let tables = self.extractor.extract(pdf)?;
        tracing::info!("Extracted {} table(s)", tables.len());
        Ok(combine_tables(&tables)?)
    }

    pub fn clean(&self, combined: &Sheet) -> PipelineResult<RecordSet> {
        Ok(self.cleaner.clean(combined)?)
    }

    pub fn export(&self, records: &RecordSet) -> PipelineResult<Artifact> {
        let format = self.config.export_format;
        let bytes = export(records, format)?;
        Ok(Artifact {
            file_name: self.config.output_name().to_string(),
            format,
            bytes,
        })
    }

    /// Run every stage. The first failing stage ends the run.
    pub fn run(&self, pdf: &[u8]) -> PipelineResult<PipelineOutput> {
        let combined = self.extract(pdf)?;
        let records = self.clean(&combined)?;
        let artifact = self.export(&records)?;
        Ok(PipelineOutput {
            combined,
            records,
            artifact,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExtractionError, PipelineError};

    struct Fixed(Vec<RawTable>);

    impl TableExtractor for Fixed {
        fn extract(&self, _pdf: &[u8]) -> Result<Vec<RawTable>, PdfError> {
            if self.0.is_empty() {
                Err(PdfError::NoTablesFound)
            } else {
                Ok(self.0.clone())
            }
        }
    }

    #[test]
    fn test_run_with_stub_extractor() {
        let header = vec![
            "Clase", "Nome", "NumInsc", "NroFilho", "DataNac", "GEO", "PORT", "EDU", "Objetivas",
            "Discursiva", "Titulos", "Total",
        ];
        let row = vec!["A", "Ana", "1", "0", "01/01/1990", "1", "2", "3", "4", "x", "y", "10"];
        let pipeline = Pipeline::with_extractor(
            Fixed(vec![RawTable::new(1, vec![header, row])]),
            PipelineConfig::default(),
        );

        let output = pipeline.run(b"%PDF-").unwrap();
        assert_eq!(output.combined.row_count(), 1);
        assert_eq!(output.records.len(), 1);
        assert_eq!(output.artifact.file_name, "dados_limpos_pdf.xlsx");
    }

    #[test]
    fn test_extraction_failure_is_tagged() {
        let pipeline = Pipeline::with_extractor(Fixed(Vec::new()), PipelineConfig::default());
        let err = pipeline.run(b"").unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Extraction(ExtractionError::Pdf(PdfError::NoTablesFound))
        ));
    }

    #[test]
    fn test_cleaning_failure_is_tagged() {
        let table = RawTable::new(1, vec![vec!["a", "b"], vec!["1", "2"]]);
        let pipeline = Pipeline::with_extractor(Fixed(vec![table]), PipelineConfig::default());
        let err = pipeline.run(b"").unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Erro durante a limpeza dos dados:"));
    }
}
