//! Sheet module for notas
//!
//! A small tabular container with named columns, the bulk operations the
//! cleaning pipeline is built from (positional rename, column drop, column
//! map, de-duplication, null-row removal, row-wise append) and writers for
//! XLSX, CSV and boxed text previews.
//!
//! # Examples
//!
//! ```
//! use notas_sheet::{CellValue, Sheet};
//!
//! let mut sheet = Sheet::from_rows(
//!     ["Nome", "Total"],
//!     vec![vec!["Ana", "15"], vec!["Ana", "15"], vec!["Bea", ""]],
//! )
//! .unwrap();
//!
//! sheet
//!     .column_map_by_name("Total", |c| CellValue::from(c.as_float()))
//!     .unwrap();
//! assert_eq!(sheet.remove_duplicates_by_columns(&[]).unwrap(), 1);
//! assert_eq!(sheet.drop_null_rows(), 1);
//! assert_eq!(sheet.row_count(), 1);
//! ```

mod cell;
mod csv;
mod error;
mod pretty;
mod sheet;
mod xlsx;

/// Re-export cell value type.
pub use cell::CellValue;
/// Re-export CSV options.
pub use csv::CsvOptions;
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export sheet type and cleaning options.
pub use sheet::{CleanOptions, NullStrategy, Sheet};
/// Re-export XLSX write options.
pub use xlsx::XlsxWriteOptions;
