//! Serialization of cleaned records.

use crate::error::ExportError;
use crate::record::RecordSet;
use notas_sheet::CsvOptions;

/// File format of the exported artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
    Json,
}

impl ExportFormat {
    /// Name the artifact is saved under when none is given.
    pub fn default_file_name(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "dados_limpos_pdf.xlsx",
            ExportFormat::Csv => "dados_limpos_pdf.csv",
            ExportFormat::Json => "dados_limpos_pdf.json",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Serialize records without altering values or order.
///
/// XLSX and CSV get one header row with the output columns. JSON is an array
/// of objects keyed by the same names.
pub fn export(records: &RecordSet, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    let bytes = match format {
        ExportFormat::Xlsx => records.to_sheet()?.to_xlsx_bytes()?,
        ExportFormat::Csv => {
            let mut buf = Vec::new();
            records
                .to_sheet()?
                .write_csv(&mut buf, &CsvOptions::default())?;
            buf
        }
        ExportFormat::Json => serde_json::to_vec_pretty(&records.records)?,
    };

    tracing::debug!(
        "Exported {} record(s) as {} ({} bytes)",
        records.len(),
        format.extension(),
        bytes.len()
    );
    Ok(bytes)
}
