//! CSV ingestion implementation.
//!
//! Uses the same header detection as the workbook reader: the header is the first record whose
//! first field is non-blank. Numeric-looking fields become numbers and `true`/`false` become
//! booleans, so joins on numeric facility codes behave the same as with a workbook.

use std::path::Path;

use crate::error::EngineResult;
use crate::types::{CellValue, OpeningRow};

use super::header::header_names;

/// Ingest a CSV file into opening rows.
pub fn ingest_csv_from_path(path: impl AsRef<Path>) -> EngineResult<Vec<OpeningRow>> {
    let bytes = std::fs::read(path)?;
    ingest_csv_from_bytes(&bytes)
}

/// Ingest in-memory CSV bytes into opening rows.
///
/// Fields that are not valid UTF-8 are decoded lossily.
pub fn ingest_csv_from_bytes(bytes: &[u8]) -> EngineResult<Vec<OpeningRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut records: Vec<Vec<String>> = Vec::new();
    for result in rdr.byte_records() {
        let record = result?;
        records.push(
            record
                .iter()
                .map(|field| String::from_utf8_lossy(field).into_owned())
                .collect(),
        );
    }

    let header_idx = records
        .iter()
        .position(|r| r.first().is_some_and(|f| !f.trim().is_empty()))
        .unwrap_or(0);

    let Some(header) = records.get(header_idx) else {
        return Ok(Vec::new());
    };
    let names = header_names(header.iter().cloned());

    let mut rows: Vec<OpeningRow> = Vec::new();
    for record in records.iter().skip(header_idx + 1) {
        let cells: Vec<(String, CellValue)> = record
            .iter()
            .zip(&names)
            .filter_map(|(raw, name)| convert_field(raw).map(|v| (name.clone(), v)))
            .collect();
        if cells.is_empty() {
            continue;
        }
        rows.push(OpeningRow::new(rows.len(), cells));
    }

    Ok(rows)
}

fn convert_field(raw: &str) -> Option<CellValue> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return Some(CellValue::Bool(true));
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Some(CellValue::Bool(false));
    }
    if keeps_text_form(trimmed) {
        return Some(CellValue::Text(raw.to_string()));
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(CellValue::Number(n)),
        _ => Some(CellValue::Text(raw.to_string())),
    }
}

/// Fields whose text a number would lose: zero-padded codes (`010012`) and explicit signs (`+34`).
fn keeps_text_form(s: &str) -> bool {
    let b = s.as_bytes();
    b.first() == Some(&b'+') || (b.len() > 1 && b[0] == b'0' && b[1].is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::ingest_csv_from_bytes;
    use crate::types::CellValue;

    #[test]
    fn skips_leading_rows_without_first_field() {
        let input = ",Listado\n,\nCENTRO,MUNICIPIO,CENTRO\n15001,Donostia,x\n,,\n15002,Abadiño,\n";
        let rows = ingest_csv_from_bytes(input.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("CENTRO"), Some(&CellValue::Number(15001.0)));
        assert_eq!(rows[0].get("CENTRO_1"), Some(&CellValue::from("x")));
        assert_eq!(rows[1].id(), 1);
        assert_eq!(rows[1].get("MUNICIPIO"), Some(&CellValue::from("Abadiño")));
        assert_eq!(rows[1].get("CENTRO_1"), None);
    }

    #[test]
    fn zero_padded_and_signed_fields_stay_text() {
        let input = "CENTRO,TEL,N\n010012,+34943000000,0.5\n0,00,7\n";
        let rows = ingest_csv_from_bytes(input.as_bytes()).unwrap();
        assert_eq!(rows[0].get("CENTRO"), Some(&CellValue::from("010012")));
        assert_eq!(rows[0].get("TEL"), Some(&CellValue::from("+34943000000")));
        assert_eq!(rows[0].get("N"), Some(&CellValue::Number(0.5)));
        assert_eq!(rows[1].get("CENTRO"), Some(&CellValue::Number(0.0)));
        assert_eq!(rows[1].get("TEL"), Some(&CellValue::from("00")));
    }

    #[test]
    fn empty_input_yields_no_rows() {
        assert!(ingest_csv_from_bytes(b"").unwrap().is_empty());
    }
}
