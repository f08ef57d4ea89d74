use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};

use crate::error::{EngineError, EngineResult};
use crate::types::{CellValue, OpeningRow};

use super::header::header_names;

/// Ingest the first sheet of an Excel document (`.xlsx`, `.xls`, `.ods`, etc.) from a path.
pub fn ingest_excel_from_path(path: impl AsRef<Path>) -> EngineResult<Vec<OpeningRow>> {
    let bytes = std::fs::read(path)?;
    ingest_excel_from_bytes(&bytes)
}

/// Ingest the first sheet of an in-memory workbook.
///
/// Behavior:
/// - Detects the header row with [`detect_header_row`]; rows above it are dropped
/// - Names columns from the header row (see [`super::header::header_names`])
/// - Emits one [`OpeningRow`] per non-blank row below the header, ids counting from zero
pub fn ingest_excel_from_bytes(bytes: &[u8]) -> EngineResult<Vec<OpeningRow>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| EngineError::parse("workbook has no sheets"))?;
    let range = workbook.worksheet_range(&sheet)?;

    Ok(rows_from_range(&range))
}

/// Find the header row of a sheet: the first row (absolute index) whose cell in column A is
/// non-empty after trimming. Falls back to row 0 when no such row exists.
pub fn detect_header_row(range: &Range<Data>) -> u32 {
    let (Some((start_row, _)), Some((end_row, _))) = (range.start(), range.end()) else {
        return 0;
    };

    (start_row..=end_row)
        .find(|&r| {
            range
                .get_value((r, 0))
                .is_some_and(|c| !cell_to_string(c).trim().is_empty())
        })
        .unwrap_or(0)
}

fn rows_from_range(range: &Range<Data>) -> Vec<OpeningRow> {
    let (Some((_, start_col)), Some((end_row, end_col))) = (range.start(), range.end()) else {
        return Vec::new();
    };
    let header_row = detect_header_row(range);

    let names = header_names((start_col..=end_col).map(|c| {
        range
            .get_value((header_row, c))
            .map(cell_to_string)
            .unwrap_or_default()
    }));

    let mut rows: Vec<OpeningRow> = Vec::new();
    for r in header_row.saturating_add(1)..=end_row {
        let cells: Vec<(String, CellValue)> = (start_col..=end_col)
            .zip(&names)
            .filter_map(|(c, name)| {
                let value = convert_cell(range.get_value((r, c))?)?;
                Some((name.clone(), value))
            })
            .collect();

        if cells.is_empty() {
            continue;
        }
        rows.push(OpeningRow::new(rows.len(), cells));
    }

    rows
}

fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
        Data::Empty => String::new(),
    }
}

fn convert_cell(c: &Data) -> Option<CellValue> {
    match c {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Float(f) => Some(CellValue::Number(*f)),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        Data::DateTime(dt) => Some(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
        Data::Error(e) => Some(CellValue::Text(e.to_string())),
    }
}
