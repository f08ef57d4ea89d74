//! Header row naming shared by the workbook and CSV readers.

use std::collections::HashMap;

/// Name used for a header cell that is empty.
pub const EMPTY_HEADER: &str = "__EMPTY";

/// Turn raw header cells into unique column names.
///
/// Empty cells become [`EMPTY_HEADER`]. A repeated name gets the first free `_1`, `_2`, ...
/// suffix, so a second `CENTRO` column is named `CENTRO_1`.
pub fn header_names<I>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::new();

    for cell in raw {
        let base = if cell.is_empty() {
            EMPTY_HEADER.to_string()
        } else {
            cell
        };

        let name = match seen.get(&base).copied() {
            None => {
                seen.insert(base.clone(), 1);
                base
            }
            Some(mut counter) => {
                let mut candidate = format!("{base}_{counter}");
                counter += 1;
                while seen.contains_key(&candidate) {
                    candidate = format!("{base}_{counter}");
                    counter += 1;
                }
                seen.insert(base, counter);
                seen.insert(candidate.clone(), 1);
                candidate
            }
        };
        out.push(name);
    }

    out
}
