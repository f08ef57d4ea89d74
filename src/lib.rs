//! `plaza-ranker` reconciles a spreadsheet of job openings with per-city commute data and lets a
//! user rank the openings they want, then exports the ranked subset as a workbook.
//!
//! The primary entrypoint is [`session::RankingSession`], which ties the pieces together:
//! choose an origin city, upload a spreadsheet, rank rows, export.
//!
//! ## What you can ingest
//!
//! **File formats (detected by file name):**
//!
//! - **Workbooks**: `.xlsx`, `.xls`, `.xlsm`, `.xlsb`, `.ods` (first sheet only)
//! - **CSV**: `.csv`
//!
//! Unknown extensions are read as workbooks. The header row is the first row whose first cell is
//! non-blank; empty header cells become `__EMPTY` and repeated names get `_1`, `_2`, ... suffixes.
//! Empty cells are absent from the row.
//!
//! ## Quick example: a ranking session
//!
//! ```rust
//! use plaza_ranker::session::RankingSession;
//! use plaza_ranker::types::CommuteRecord;
//!
//! # fn main() -> Result<(), plaza_ranker::EngineError> {
//! let mut session = RankingSession::default();
//!
//! let ticket = session.select_city("bergara");
//! session.finish_city_load(&ticket, vec![CommuteRecord::new("20001", 12.0, 8400.0)]);
//! session.upload("plazas.csv", b"CENTRO,MUNICIPIO\n20001,Eibar\n20002,Elgoibar\n");
//!
//! session.edit_rank(0, Some("1"))?;
//! let file = session.export()?;
//! assert_eq!(file.rows, 1);
//! assert_eq!(file.file_name, "aukeratutako-plazak.xlsx");
//! # Ok(())
//! # }
//! ```
//!
//! Commute datasets can also be loaded asynchronously from a directory of `<city-slug>.json`
//! files through [`commute::CommuteLoader`] and [`commute::DirectorySource`].
//!
//! ## Modules
//!
//! - [`ingestion`]: unified ingestion entrypoints and format-specific readers
//! - [`commute`]: commute dataset sources, parsing and city slugs
//! - [`processing`]: distance matching, the column model and the table view
//! - [`ranking`]: ranks and the selection derived from them
//! - [`export`]: workbook export of the selected rows
//! - [`session`]: the stateful workflow with stale-load protection
//! - [`observability`]: observers for success/failure/alert reporting
//! - [`types`]: row and commute record types
//! - [`error`]: error type shared by all modules

pub mod commute;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod observability;
pub mod processing;
pub mod ranking;
pub mod session;
pub mod types;

pub use error::{EngineError, EngineResult};
