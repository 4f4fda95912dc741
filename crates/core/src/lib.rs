//! # notas-core
//!
//! Turns the score tables of a public-exam results PDF into one cleaned,
//! typed record set and serializes it.
//!
//! This crate provides:
//! - Table combination ([`combine_tables`])
//! - The cleaning stage ([`Cleaner`]) and its typed output ([`RecordSet`])
//! - Export to XLSX, CSV or JSON ([`export()`])
//! - The [`Pipeline`] that runs all stages for one document
//!
//! # Examples
//!
//! ```
//! use notas_core::{combine_tables, Cleaner};
//! use notas_pdf::RawTable;
//!
//! let header = vec![
//!     "Clase", "Nome", "NumInsc", "NroFilho", "DataNac", "GEO", "PORT", "EDU",
//!     "Objetivas", "Discursiva", "Titulos", "Total",
//! ];
//! let bea = vec![
//!     "A", "Bea", "124", "1", "02/02/1990", "6", "7", "8", "9", "x", "y", "Elimin.",
//! ];
//! let combined = combine_tables(&[RawTable::new(1, vec![header, bea])]).unwrap();
//!
//! let records = Cleaner::default().clean(&combined).unwrap();
//! assert_eq!(records.records[0].total, 0.0);
//! ```

pub mod clean;
pub mod combine;
pub mod config;
/// Error types and result aliases.
pub mod error;
pub mod export;
pub mod parse;
pub mod pipeline;
pub mod record;
/// Column names of the source and output tables.
pub mod schema;

pub use clean::{clean_table, Cleaner};
pub use combine::combine_tables;
pub use config::{CleanConfig, DateOrder, PipelineConfig, DEFAULT_OUTPUT_NAME};
pub use error::{
    CleanError, CombineError, ExportError, ExtractionError, PipelineError, PipelineResult,
};
pub use export::{export, ExportFormat};
pub use pipeline::{Artifact, Pipeline, PipelineOutput, TableExtractor};
pub use record::{CleanStats, CleanedRecord, RecordSet};
