//! Join opening rows to commute records by facility code.

use std::collections::HashMap;

use crate::types::{CommuteRecord, OpeningRow};

/// Default name of the facility-code column in the openings spreadsheet.
pub const FACILITY_CODE_COLUMN: &str = "CENTRO";

/// Returns new rows with `duration`/`distance` attached from the matching commute record.
///
/// The facility cell is stringified and compared against [`CommuteRecord::facility_code`].
/// Rows without a match (or without a facility cell) come back with both fields absent. When a
/// dataset repeats a code, the first record wins. Inputs are not modified.
pub fn match_distances(
    rows: &[OpeningRow],
    records: &[CommuteRecord],
    facility_column: &str,
) -> Vec<OpeningRow> {
    let mut by_code: HashMap<&str, &CommuteRecord> = HashMap::with_capacity(records.len());
    for record in records {
        by_code.entry(record.facility_code.as_str()).or_insert(record);
    }

    rows.iter()
        .map(|row| {
            let hit = row
                .get(facility_column)
                .and_then(|code| by_code.get(code.to_string().as_str()).copied());
            row.clone().joined(hit)
        })
        .collect()
}

/// Number of rows that carry no commute data.
pub fn unmatched_count(rows: &[OpeningRow]) -> usize {
    rows.iter().filter(|r| r.duration().is_none()).count()
}
