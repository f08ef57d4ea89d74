//! Export of the selected rows to a single-sheet workbook.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

use crate::error::{EngineError, EngineResult};
use crate::observability::{report, EngineObserver, Operation, OperationContext, Severity};
use crate::processing::ColumnConfig;
use crate::types::{CellValue, OpeningRow, RowId};

/// File name offered for the exported workbook.
pub const EXPORT_FILE_NAME: &str = "aukeratutako-plazak.xlsx";

/// Name of the single worksheet in the exported workbook.
pub const EXPORT_SHEET_NAME: &str = "SelectedData";

/// Options controlling export.
#[derive(Clone)]
pub struct ExportOptions {
    pub file_name: String,
    pub sheet_name: String,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn EngineObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
}

impl fmt::Debug for ExportOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportOptions")
            .field("file_name", &self.file_name)
            .field("sheet_name", &self.sheet_name)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            file_name: EXPORT_FILE_NAME.to_string(),
            sheet_name: EXPORT_SHEET_NAME.to_string(),
            observer: None,
            alert_at_or_above: Severity::Critical,
        }
    }
}

/// An exported workbook, ready to be offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Number of data rows written (header excluded).
    pub rows: usize,
}

impl ExportFile {
    /// Write the workbook into `dir` under its file name and return the full path.
    pub fn save_in(&self, dir: impl AsRef<Path>) -> EngineResult<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Serialize the selected rows to a workbook.
///
/// `ordered_rows` must be in the table's current display order; the export keeps that order and
/// drops every row whose id is not in `selection`.
///
/// Columns: every spreadsheet column in first-encountered order, then duration, distance and
/// rank.
///
/// Fails with [`EngineError::EmptySelection`] when `selection` is empty and with
/// [`EngineError::EmptyFilterResult`] when no row matches it. No file is produced in either case.
pub fn export_selected<'a, I>(
    ordered_rows: I,
    selection: &BTreeSet<RowId>,
    columns: &ColumnConfig,
    options: &ExportOptions,
) -> EngineResult<ExportFile>
where
    I: IntoIterator<Item = &'a OpeningRow>,
{
    let result = build_export(ordered_rows, selection, columns, options);
    let ctx = OperationContext::new(Operation::Export, options.file_name.clone());
    report(
        options.observer.as_ref(),
        options.alert_at_or_above,
        &ctx,
        &result,
        |file| file.rows,
    );
    result
}

fn build_export<'a, I>(
    ordered_rows: I,
    selection: &BTreeSet<RowId>,
    columns: &ColumnConfig,
    options: &ExportOptions,
) -> EngineResult<ExportFile>
where
    I: IntoIterator<Item = &'a OpeningRow>,
{
    if selection.is_empty() {
        return Err(EngineError::EmptySelection);
    }
    let rows: Vec<&OpeningRow> = ordered_rows
        .into_iter()
        .filter(|row| selection.contains(&row.id()))
        .collect();
    if rows.is_empty() {
        return Err(EngineError::EmptyFilterResult);
    }

    let header = export_header(&rows, columns);
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(&options.sheet_name)?;

    for (col, name) in header.iter().enumerate() {
        sheet.write_string(0, column_index(col)?, name)?;
    }
    for (i, row) in rows.iter().enumerate() {
        let r = u32::try_from(i + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        write_row(sheet, r, row, &header, columns)?;
    }

    Ok(ExportFile {
        file_name: options.file_name.clone(),
        bytes: workbook.save_to_buffer()?,
        rows: rows.len(),
    })
}

fn export_header(rows: &[&OpeningRow], columns: &ColumnConfig) -> Vec<String> {
    let derived = [
        columns.duration_column.as_str(),
        columns.distance_column.as_str(),
        columns.rank_column.as_str(),
    ];
    let mut seen: HashSet<&str> = HashSet::new();
    let mut header: Vec<String> = Vec::new();
    for row in rows {
        for (name, _) in row.cells() {
            if !derived.contains(&name.as_str()) && seen.insert(name.as_str()) {
                header.push(name.clone());
            }
        }
    }
    header.extend(derived.iter().map(|s| s.to_string()));
    header
}

fn write_row(
    sheet: &mut Worksheet,
    r: u32,
    row: &OpeningRow,
    header: &[String],
    columns: &ColumnConfig,
) -> EngineResult<()> {
    for (col, name) in header.iter().enumerate() {
        let c = column_index(col)?;
        if *name == columns.duration_column {
            if let Some(v) = row.duration() {
                sheet.write_number(r, c, v)?;
            }
        } else if *name == columns.distance_column {
            if let Some(v) = row.distance() {
                sheet.write_number(r, c, v)?;
            }
        } else if *name == columns.rank_column {
            if let Some(rank) = row.rank().filter(|s| !s.is_empty()) {
                sheet.write_string(r, c, rank)?;
            }
        } else {
            match row.get(name) {
                Some(CellValue::Number(n)) => {
                    sheet.write_number(r, c, *n)?;
                }
                Some(CellValue::Bool(b)) => {
                    sheet.write_boolean(r, c, *b)?;
                }
                Some(CellValue::Text(s)) => {
                    sheet.write_string(r, c, s)?;
                }
                None => {}
            }
        }
    }
    Ok(())
}

fn column_index(col: usize) -> Result<u16, XlsxError> {
    u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)
}
