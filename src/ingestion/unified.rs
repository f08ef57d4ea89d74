//! Unified ingestion entrypoint.
//!
//! Most callers should use [`ingest_from_bytes`] (an uploaded file) or [`ingest_from_path`].
//!
//! - If [`IngestionOptions::format`] is `None`, the format is inferred from the file name's
//!   extension; unknown or missing extensions are read as a workbook.
//! - If an [`EngineObserver`] is provided, success/failure/alerts are reported to it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::EngineResult;
use crate::observability::{report, EngineObserver, Operation, OperationContext, Severity};
use crate::types::OpeningRow;

use super::{csv, excel};

/// Supported ingestion formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Spreadsheet/workbook formats (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`).
    Excel,
    /// Comma-separated values.
    Csv,
}

impl IngestionFormat {
    /// Parse an ingestion format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(Self::Excel),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    /// Infer the format from a file name, defaulting to [`Self::Excel`].
    pub fn from_file_name(name: &str) -> Self {
        Path::new(name)
            .extension()
            .and_then(|s| s.to_str())
            .and_then(Self::from_extension)
            .unwrap_or(Self::Excel)
    }
}

/// Options controlling unified ingestion behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// If `None`, infer the format from the file name.
    pub format: Option<IngestionFormat>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn EngineObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            observer: None,
            alert_at_or_above: Severity::Critical,
        }
    }
}

/// Ingest an uploaded file from memory.
///
/// `file_name` is only used for format inference and reporting.
///
/// # Examples
///
/// ```no_run
/// use plaza_ranker::ingestion::{ingest_from_bytes, IngestionOptions};
///
/// # fn main() -> Result<(), plaza_ranker::EngineError> {
/// let bytes = std::fs::read("plazas.xlsx")?;
/// let rows = ingest_from_bytes("plazas.xlsx", &bytes, &IngestionOptions::default())?;
/// println!("rows={}", rows.len());
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_bytes(
    file_name: &str,
    bytes: &[u8],
    options: &IngestionOptions,
) -> EngineResult<Vec<OpeningRow>> {
    let fmt = options
        .format
        .unwrap_or_else(|| IngestionFormat::from_file_name(file_name));

    let result = match fmt {
        IngestionFormat::Excel => excel::ingest_excel_from_bytes(bytes),
        IngestionFormat::Csv => csv::ingest_csv_from_bytes(bytes),
    };

    let ctx = OperationContext::new(Operation::Ingest, file_name);
    report(
        options.observer.as_ref(),
        options.alert_at_or_above,
        &ctx,
        &result,
        Vec::len,
    );
    result
}

/// Ingest a file from disk.
///
/// Read failures are reported to the observer like any other ingestion failure.
pub fn ingest_from_path(
    path: impl AsRef<Path>,
    options: &IngestionOptions,
) -> EngineResult<Vec<OpeningRow>> {
    let path = path.as_ref();
    let name = path.display().to_string();
    match std::fs::read(path) {
        Ok(bytes) => ingest_from_bytes(&name, &bytes, options),
        Err(e) => {
            let result: EngineResult<Vec<OpeningRow>> = Err(e.into());
            let ctx = OperationContext::new(Operation::Ingest, name);
            report(
                options.observer.as_ref(),
                options.alert_at_or_above,
                &ctx,
                &result,
                Vec::len,
            );
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::IngestionFormat;

    #[test]
    fn format_inference() {
        assert_eq!(IngestionFormat::from_file_name("plazas.XLSX"), IngestionFormat::Excel);
        assert_eq!(IngestionFormat::from_file_name("plazas.csv"), IngestionFormat::Csv);
        assert_eq!(IngestionFormat::from_file_name("plazas"), IngestionFormat::Excel);
        assert_eq!(IngestionFormat::from_extension("ods"), Some(IngestionFormat::Excel));
        assert_eq!(IngestionFormat::from_extension("json"), None);
    }
}
