//! Commute dataset file format.
//!
//! One JSON document per origin city: an array of
//! `{"code": "...", "distances": {"duration": <minutes>, "distance": <meters>}}` entries.
//! Codes may be strings or numbers. The generator writes an empty `distances` object when no
//! route was found; such entries are skipped.

use serde::Deserialize;

use crate::types::{CellValue, CommuteRecord};

#[derive(Debug, Deserialize)]
struct RawEntry {
    code: RawCode,
    #[serde(default)]
    distances: RawDistances,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCode {
    Text(String),
    Number(f64),
}

#[derive(Debug, Default, Deserialize)]
struct RawDistances {
    duration: Option<f64>,
    distance: Option<f64>,
}

/// Parse a commute dataset document.
pub fn parse_dataset(bytes: &[u8]) -> Result<Vec<CommuteRecord>, serde_json::Error> {
    let entries: Vec<RawEntry> = serde_json::from_slice(bytes)?;

    Ok(entries
        .into_iter()
        .filter_map(|entry| {
            let (Some(duration), Some(distance)) = (entry.distances.duration, entry.distances.distance)
            else {
                return None;
            };
            // Stringify numeric codes the same way spreadsheet cells are stringified.
            let code = match entry.code {
                RawCode::Text(s) => s,
                RawCode::Number(n) => CellValue::Number(n).to_string(),
            };
            Some(CommuteRecord::new(code, duration, distance))
        })
        .collect())
}
