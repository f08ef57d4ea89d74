//! Spreadsheet ingestion.
//!
//! Most callers should use [`ingest_from_bytes`] (from [`unified`]) which:
//!
//! - picks a reader from the file name (or an explicit [`IngestionFormat`])
//! - detects the header row and turns the remaining rows into [`crate::types::OpeningRow`]s
//! - optionally reports success/failure/alerts to an observer
//!
//! Format-specific functions are also available under [`excel`] and [`csv`].

pub mod csv;
pub mod excel;
pub mod header;
pub mod unified;

pub use unified::{ingest_from_bytes, ingest_from_path, IngestionFormat, IngestionOptions};
