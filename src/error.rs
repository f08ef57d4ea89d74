use thiserror::Error;

use crate::observability::Severity;

/// Convenience result type used across the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Error type returned by ingestion, dataset loading, ranking and export.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The workbook reader could not decode the file.
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// CSV decoding error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The input could not be turned into rows at all.
    #[error("failed to parse spreadsheet: {message}")]
    Parse { message: String },

    /// The commute dataset for a city is missing or malformed.
    #[error("commute dataset unavailable for '{city}': {message}")]
    DatasetUnavailable { city: String, message: String },

    /// Export was attempted with no selected rows.
    #[error("no rows are selected for export")]
    EmptySelection,

    /// A non-empty selection did not resolve to any row.
    #[error("the selection did not match any row")]
    EmptyFilterResult,

    /// Writing the export workbook failed.
    #[error("xlsx writer error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// A rank edit referenced a row id that is not in the current collection.
    #[error("unknown row id {id}")]
    UnknownRow { id: usize },

    /// The table is gated while a load is pending.
    #[error("a load is still in progress")]
    Busy,
}

impl EngineError {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Severity used for observer callbacks and alert thresholds.
    pub fn severity(&self) -> Severity {
        match self {
            Self::Io(_) => Severity::Critical,
            Self::Csv(err) => match err.kind() {
                ::csv::ErrorKind::Io(_) => Severity::Critical,
                _ => Severity::Error,
            },
            Self::Spreadsheet(_) | Self::Parse { .. } | Self::Xlsx(_) => Severity::Error,
            Self::EmptyFilterResult | Self::UnknownRow { .. } => Severity::Error,
            Self::DatasetUnavailable { .. } | Self::EmptySelection | Self::Busy => Severity::Warning,
        }
    }
}
