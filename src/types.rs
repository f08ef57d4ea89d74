//! Core data model: opening rows, their cell values, and commute records.
//!
//! An [`OpeningRow`] keeps the cells of one spreadsheet row in source column order. Empty cells
//! are simply absent. The commute fields are attached once by
//! [`crate::processing::match_distances`] and the rank is only changed through
//! [`crate::ranking::RankingStore::edit_rank`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable, zero-based row identifier assigned at ingestion.
pub type RowId = usize;

/// A single non-empty cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Numeric cell (dates are kept as their serial number).
    Number(f64),
    /// Boolean cell.
    Bool(bool),
    /// Text cell.
    Text(String),
}

impl CellValue {
    /// Numeric view of the value, if it has one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
            Self::Bool(_) => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // f64's Display already drops a zero fraction ("3", not "3.0").
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

/// Precomputed commute from the chosen origin city to one facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommuteRecord {
    /// Facility code, matched against the spreadsheet's facility column.
    pub facility_code: String,
    /// Driving time in minutes.
    pub duration: f64,
    /// Driving distance in meters.
    pub distance: f64,
}

impl CommuteRecord {
    /// Create a new record.
    pub fn new(facility_code: impl Into<String>, duration: f64, distance: f64) -> Self {
        Self {
            facility_code: facility_code.into(),
            duration,
            distance,
        }
    }
}

/// One job opening: a spreadsheet row plus derived commute fields and the user's rank.
#[derive(Debug, Clone, PartialEq)]
pub struct OpeningRow {
    id: RowId,
    cells: Vec<(String, CellValue)>,
    duration: Option<f64>,
    distance: Option<f64>,
    rank: Option<String>,
}

impl OpeningRow {
    /// Create a row from its id and its non-empty cells (in source column order).
    pub fn new(id: RowId, cells: Vec<(String, CellValue)>) -> Self {
        Self {
            id,
            cells,
            duration: None,
            distance: None,
            rank: None,
        }
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    /// Non-empty cells in source column order.
    pub fn cells(&self) -> &[(String, CellValue)] {
        &self.cells
    }

    /// Look up a cell by column name.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Commute duration in minutes, if the row matched a commute record.
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// Commute distance in meters, if the row matched a commute record.
    pub fn distance(&self) -> Option<f64> {
        self.distance
    }

    /// User-assigned rank, if any.
    pub fn rank(&self) -> Option<&str> {
        self.rank.as_deref()
    }

    /// Replace both commute fields from `record` (or clear them when there is no match).
    pub(crate) fn joined(mut self, record: Option<&CommuteRecord>) -> Self {
        self.duration = record.map(|r| r.duration);
        self.distance = record.map(|r| r.distance);
        self
    }

    /// Move the cell named `rank_column`, if any, into the rank field.
    ///
    /// Rows ingested from an earlier export carry their rank as a plain cell.
    pub(crate) fn with_imported_rank(mut self, rank_column: &str) -> Self {
        if let Some(pos) = self.cells.iter().position(|(name, _)| name == rank_column) {
            let (_, value) = self.cells.remove(pos);
            self.rank = Some(value.to_string());
        }
        self
    }

    pub(crate) fn set_rank(&mut self, rank: String) {
        self.rank = Some(rank);
    }
}
