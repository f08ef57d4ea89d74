//! Row processing between ingestion and the ranking table.
//!
//! - [`match_distances()`]: join rows to commute records by facility code
//! - [`build_columns()`]: derive the column model (render/sort/filter/pin) from the rows
//! - [`TableView`]: active sort and filters, producing the display order
//! - [`locale_compare()`]: the string ordering used for text sorting and filter options
//!
//! ## Example: join → columns → display order
//!
//! ```rust
//! use plaza_ranker::processing::{build_columns, match_distances, ColumnConfig, SortOrder, TableView};
//! use plaza_ranker::types::{CellValue, CommuteRecord, OpeningRow};
//!
//! let config = ColumnConfig::default();
//! let rows = vec![
//!     OpeningRow::new(0, vec![("CENTRO".to_string(), CellValue::Number(15001.0))]),
//!     OpeningRow::new(1, vec![("CENTRO".to_string(), CellValue::Number(48002.0))]),
//! ];
//! let commute = vec![CommuteRecord::new("48002", 14.0, 9500.0)];
//!
//! let joined = match_distances(&rows, &commute, &config.facility_column);
//! let columns = build_columns(&joined, &config);
//!
//! let mut view = TableView::default();
//! view.sort_by(config.duration_column.clone(), SortOrder::Ascending);
//! let order: Vec<usize> = view.order(&joined, &columns).iter().map(|r| r.id()).collect();
//! // The unmatched row sorts last.
//! assert_eq!(order, vec![1, 0]);
//! ```

pub mod collate;
pub mod columns;
pub mod matcher;
pub mod view;

pub use collate::locale_compare;
pub use columns::{
    build_columns, format_distance, format_duration, rank_column, ColumnCache, ColumnConfig,
    ColumnKind, ColumnSpec, Pin, SORT_SENTINEL,
};
pub use matcher::{match_distances, unmatched_count, FACILITY_CODE_COLUMN};
pub use view::{SortOrder, SortState, TableView};
