//! Pipeline configuration.

use crate::export::ExportFormat;
use crate::schema::ELIMINATED_TOKEN;
use notas_pdf::PdfOptions;

/// Default name of the exported spreadsheet.
pub const DEFAULT_OUTPUT_NAME: &str = "dados_limpos_pdf.xlsx";

/// How ambiguous `nn/nn/yyyy` birth dates are read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateOrder {
    /// `dd/mm/yyyy`, as printed in Brazilian documents.
    #[default]
    DayFirst,
    /// `mm/dd/yyyy`.
    MonthFirst,
}

/// Options for the cleaning stage.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanConfig {
    pub date_order: DateOrder,
    /// Total-column value that marks a disqualified candidate; becomes 0.
    pub eliminated_token: String,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            date_order: DateOrder::DayFirst,
            eliminated_token: ELIMINATED_TOKEN.to_string(),
        }
    }
}

impl CleanConfig {
    #[must_use]
    pub fn with_date_order(mut self, order: DateOrder) -> Self {
        self.date_order = order;
        self
    }
}

/// Options for a whole Extract, Combine, Clean, Export run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineConfig {
    pub pdf: PdfOptions,
    pub clean: CleanConfig,
    pub export_format: ExportFormat,
    /// File name offered for the artifact; the format's default when `None`.
    pub output_name: Option<String>,
}

impl PipelineConfig {
    #[must_use]
    pub fn with_pdf_options(mut self, pdf: PdfOptions) -> Self {
        self.pdf = pdf;
        self
    }

    #[must_use]
    pub fn with_clean_config(mut self, clean: CleanConfig) -> Self {
        self.clean = clean;
        self
    }

    #[must_use]
    pub fn with_export_format(mut self, format: ExportFormat) -> Self {
        self.export_format = format;
        self
    }

    #[must_use]
    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    /// File name the exported artifact is offered under.
    pub fn output_name(&self) -> &str {
        self.output_name
            .as_deref()
            .unwrap_or_else(|| self.export_format.default_file_name())
    }
}
