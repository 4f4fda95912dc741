use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use chrono::Datelike;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Options for writing Excel files
#[derive(Debug, Clone)]
pub struct XlsxWriteOptions {
    /// Number format applied to date cells
    pub date_format: String,
    /// Whether the header row is written in bold
    pub bold_header: bool,
}

impl Default for XlsxWriteOptions {
    fn default() -> Self {
        XlsxWriteOptions {
            date_format: "yyyy-mm-dd".to_string(),
            bold_header: true,
        }
    }
}

impl XlsxWriteOptions {
    /// Set the number format used for date cells
    #[must_use]
    pub fn with_date_format(mut self, format: &str) -> Self {
        self.date_format = format.to_string();
        self
    }
}

impl Sheet {
    /// Save the sheet to an Excel file.
    ///
    /// The file handle is closed before this returns.
    ///
    /// # Errors
    ///
    /// Returns error if the workbook cannot be built or the file cannot be written.
    pub fn save_as_xlsx<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_xlsx_bytes()?;
        let mut file = File::create(path.as_ref())?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        Ok(())
    }

    /// Serialize the sheet to an in-memory XLSX workbook
    ///
    /// # Errors
    ///
    /// Returns error if a cell cannot be written.
    pub fn to_xlsx_bytes(&self) -> Result<Vec<u8>> {
        self.to_xlsx_bytes_with_options(&XlsxWriteOptions::default())
    }

    /// Serialize the sheet to an in-memory XLSX workbook with options
    ///
    /// # Errors
    ///
    /// Returns error if a cell cannot be written.
    pub fn to_xlsx_bytes_with_options(&self, options: &XlsxWriteOptions) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        self.write_to_worksheet(worksheet, options)?;

        Ok(workbook.save_to_buffer()?)
    }

    /// Write header and data rows to a worksheet
    fn write_to_worksheet(&self, worksheet: &mut Worksheet, options: &XlsxWriteOptions) -> Result<()> {
        worksheet.set_name(self.name())?;

        let header_format = if options.bold_header {
            Format::new().set_bold()
        } else {
            Format::new()
        };
        let date_format = Format::new().set_num_format(&options.date_format);

        for (col_idx, name) in self.column_names().iter().enumerate() {
            worksheet.write_string_with_format(0, column_number(col_idx)?, name, &header_format)?;
        }

        // Row 0 holds the header when columns are named
        let offset = usize::from(!self.column_names().is_empty());

        for (row_idx, row) in self.data().iter().enumerate() {
            let row_num = u32::try_from(row_idx + offset)
                .map_err(|_| SheetError::Serialize("Row index overflow".to_string()))?;

            for (col_idx, cell) in row.iter().enumerate() {
                let col_num = column_number(col_idx)?;

                match cell {
                    CellValue::Null => {} // Leave empty
                    CellValue::Bool(b) => {
                        worksheet.write_boolean(row_num, col_num, *b)?;
                    }
                    CellValue::Int(i) => {
                        // Note: Excel stores all numbers as f64, so integers > 2^53
                        // may lose precision
                        worksheet.write_number(row_num, col_num, *i as f64)?;
                    }
                    CellValue::Float(f) => {
                        worksheet.write_number(row_num, col_num, *f)?;
                    }
                    CellValue::Date(d) => {
                        let year = u16::try_from(d.year()).map_err(|_| {
                            SheetError::Serialize(format!("Year out of range for Excel: {d}"))
                        })?;
                        // Month and day always fit in u8
                        let datetime = ExcelDateTime::from_ymd(year, d.month() as u8, d.day() as u8)?;
                        worksheet.write_datetime_with_format(row_num, col_num, &datetime, &date_format)?;
                    }
                    CellValue::String(s) => {
                        worksheet.write_string(row_num, col_num, s)?;
                    }
                }
            }
        }

        Ok(())
    }
}

fn column_number(col_idx: usize) -> Result<u16> {
    u16::try_from(col_idx).map_err(|_| SheetError::Serialize("Column index overflow".to_string()))
}
