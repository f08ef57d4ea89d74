//! Dynamic column model.
//!
//! [`build_columns`] inspects whatever columns the ingested rows carry and derives one
//! [`ColumnSpec`] per column: how to render it, how to sort it, whether it can be filtered and
//! with which options, and which table edge it is pinned to. The commute columns are appended at
//! the trailing edge; the rank column ([`rank_column`]) is prepended at the leading edge.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::OpeningRow;

use super::collate::locale_compare;
use super::matcher::FACILITY_CODE_COLUMN;

/// Sort key used for rows without a numeric duration, distance or rank, so they sort last when
/// ascending.
pub const SORT_SENTINEL: f64 = 9999.0;

/// Column names and per-column table behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Column holding the facility code used for the commute join.
    pub facility_column: String,
    /// Name of the derived duration column (minutes).
    pub duration_column: String,
    /// Name of the derived distance column (meters).
    pub distance_column: String,
    /// Name of the user rank column.
    pub rank_column: String,
    /// Columns pinned to the leading edge of the table.
    pub pinned_left: Vec<String>,
    /// Columns offering a filter.
    pub filterable: Vec<String>,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        let names = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            facility_column: FACILITY_CODE_COLUMN.to_string(),
            duration_column: "Denbora".to_string(),
            distance_column: "Distantzia".to_string(),
            rank_column: "aukeratutakoOrdena".to_string(),
            pinned_left: names(&[
                "Nº PLAZA",
                "MUNICIPIO",
                "CENTRO_1",
                "NOMBRE_CENTRO",
                "DESCRIPCION_ASIGNATURA",
                "ASIGNATURA",
            ]),
            filterable: names(&[
                "MUNICIPIO",
                "ASIGNATURA",
                "CENTRO_1",
                "NOMBRE_CENTRO",
                "DESCRIPCION_ASIGNATURA",
            ]),
        }
    }
}

/// What a column displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// A column taken from the spreadsheet.
    Data,
    /// Commute duration in minutes.
    Duration,
    /// Commute distance in meters.
    Distance,
    /// User-assigned rank.
    Rank,
}

/// Table edge a column is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pin {
    Left,
    Right,
    Floating,
}

/// Display/filter/sort description of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
    pub pin: Pin,
    /// Distinct values offered as filters, sorted; `None` when the column is not filterable.
    pub filter_options: Option<Vec<String>>,
}

impl ColumnSpec {
    fn new(name: impl Into<String>, kind: ColumnKind, pin: Pin) -> Self {
        Self {
            name: name.into(),
            kind,
            pin,
            filter_options: None,
        }
    }

    pub fn is_filterable(&self) -> bool {
        self.filter_options.is_some()
    }

    pub fn is_fixed_left(&self) -> bool {
        self.pin == Pin::Left
    }

    pub fn is_fixed_right(&self) -> bool {
        self.pin == Pin::Right
    }

    /// Stringified raw value of this column for `row`, `None` when absent.
    pub fn text_value(&self, row: &OpeningRow) -> Option<String> {
        match self.kind {
            ColumnKind::Data => row.get(&self.name).map(|v| v.to_string()),
            ColumnKind::Duration => row.duration().map(|v| v.to_string()),
            ColumnKind::Distance => row.distance().map(|v| v.to_string()),
            ColumnKind::Rank => row.rank().map(str::to_string),
        }
    }

    /// Text shown in the table cell.
    pub fn render(&self, row: &OpeningRow) -> String {
        match self.kind {
            ColumnKind::Duration => format_duration(row.duration()),
            ColumnKind::Distance => format_distance(row.distance()),
            ColumnKind::Data | ColumnKind::Rank => self.text_value(row).unwrap_or_default(),
        }
    }

    /// Ascending comparison of two rows on this column.
    pub fn compare(&self, a: &OpeningRow, b: &OpeningRow) -> Ordering {
        match self.kind {
            ColumnKind::Duration => numeric_key(a.duration()).total_cmp(&numeric_key(b.duration())),
            ColumnKind::Distance => numeric_key(a.distance()).total_cmp(&numeric_key(b.distance())),
            ColumnKind::Rank => rank_key(a.rank()).total_cmp(&rank_key(b.rank())),
            ColumnKind::Data => locale_compare(
                &self.text_value(a).unwrap_or_default(),
                &self.text_value(b).unwrap_or_default(),
            ),
        }
    }

    /// Prefix filter: the row passes when its lower-cased value starts with the lower-cased
    /// `filter`. Rows without a value never pass.
    pub fn matches_filter(&self, row: &OpeningRow, filter: &str) -> bool {
        self.text_value(row)
            .is_some_and(|v| v.to_lowercase().starts_with(&filter.to_lowercase()))
    }
}

fn numeric_key(value: Option<f64>) -> f64 {
    value.unwrap_or(SORT_SENTINEL)
}

fn rank_key(rank: Option<&str>) -> f64 {
    rank.and_then(|r| r.trim().parse::<f64>().ok())
        .filter(|n| !n.is_nan())
        .unwrap_or(SORT_SENTINEL)
}

/// `"-"` when absent, otherwise whole minutes: `"23 min"`.
pub fn format_duration(minutes: Option<f64>) -> String {
    match minutes {
        Some(m) => format!("{} min", m.round()),
        None => "-".to_string(),
    }
}

/// `"-"` when absent, whole meters under 1000 (`"999 m"`), whole kilometers otherwise (`"2 km"`).
pub fn format_distance(meters: Option<f64>) -> String {
    match meters {
        Some(m) if m < 1000.0 => format!("{} m", m.round()),
        Some(m) => format!("{} km", (m / 1000.0).round()),
        None => "-".to_string(),
    }
}

/// Spec of the rank column, pinned to the leading edge.
pub fn rank_column(config: &ColumnConfig) -> ColumnSpec {
    ColumnSpec::new(config.rank_column.clone(), ColumnKind::Rank, Pin::Left)
}

/// Derive the column model of a row collection.
///
/// One spec per distinct spreadsheet column in first-encountered order, followed by the duration
/// and distance columns. Returns nothing for an empty collection. The rank column is not
/// included; see [`rank_column`].
pub fn build_columns(rows: &[OpeningRow], config: &ColumnConfig) -> Vec<ColumnSpec> {
    if rows.is_empty() {
        return Vec::new();
    }

    let derived = [
        config.duration_column.as_str(),
        config.distance_column.as_str(),
        config.rank_column.as_str(),
    ];
    let mut seen: HashSet<&str> = HashSet::new();
    let mut specs: Vec<ColumnSpec> = Vec::new();

    for row in rows {
        for (name, _) in row.cells() {
            if derived.contains(&name.as_str()) || !seen.insert(name.as_str()) {
                continue;
            }
            let pin = if config.pinned_left.contains(name) {
                Pin::Left
            } else {
                Pin::Floating
            };
            specs.push(ColumnSpec::new(name.clone(), ColumnKind::Data, pin));
        }
    }
    specs.push(ColumnSpec::new(
        config.duration_column.clone(),
        ColumnKind::Duration,
        Pin::Right,
    ));
    specs.push(ColumnSpec::new(
        config.distance_column.clone(),
        ColumnKind::Distance,
        Pin::Right,
    ));

    for spec in &mut specs {
        if config.filterable.contains(&spec.name) {
            spec.filter_options = Some(filter_options(spec, rows));
        }
    }

    specs
}

fn filter_options(spec: &ColumnSpec, rows: &[OpeningRow]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out: Vec<String> = rows
        .iter()
        .filter_map(|row| spec.text_value(row))
        .filter(|v| seen.insert(v.clone()))
        .collect();
    out.sort_by(|a, b| locale_compare(a, b));
    out
}

/// Column model memoized on the identity of the row collection.
///
/// Rank edits do not change a collection's version, so they never trigger a rebuild.
#[derive(Debug, Default)]
pub struct ColumnCache {
    version: Option<u64>,
    columns: Vec<ColumnSpec>,
    builds: u64,
}

impl ColumnCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Columns for the collection `version`, rebuilding only when the version changed.
    ///
    /// The rank column leads whenever there are rows.
    pub fn get_or_build(
        &mut self,
        version: u64,
        rows: &[OpeningRow],
        config: &ColumnConfig,
    ) -> &[ColumnSpec] {
        if self.version != Some(version) {
            let data = build_columns(rows, config);
            self.columns = if data.is_empty() {
                data
            } else {
                std::iter::once(rank_column(config)).chain(data).collect()
            };
            self.version = Some(version);
            self.builds += 1;
        }
        &self.columns
    }

    /// Columns from the last build.
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// How many times the model has been rebuilt.
    pub fn builds(&self) -> u64 {
        self.builds
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::{
        build_columns, format_distance, format_duration, rank_column, ColumnCache, ColumnConfig,
        ColumnKind, Pin, SORT_SENTINEL,
    };
    use crate::types::{CellValue, CommuteRecord, OpeningRow};

    fn row(id: usize, cells: &[(&str, CellValue)]) -> OpeningRow {
        OpeningRow::new(
            id,
            cells
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    fn sample() -> Vec<OpeningRow> {
        vec![
            row(0, &[
                ("Nº PLAZA", CellValue::from(1_i64)),
                ("CENTRO", CellValue::from(15001_i64)),
                ("MUNICIPIO", CellValue::from("Donostia")),
            ])
            .joined(Some(&CommuteRecord::new("15001", 22.4, 18500.0))),
            row(1, &[
                ("Nº PLAZA", CellValue::from(2_i64)),
                ("CENTRO", CellValue::from(48002_i64)),
                ("MUNICIPIO", CellValue::from("Abadiño")),
                ("JORNADA", CellValue::from("Completa")),
            ]),
            row(2, &[
                ("CENTRO", CellValue::from(15001_i64)),
                ("MUNICIPIO", CellValue::from("Donostia")),
            ])
            .joined(Some(&CommuteRecord::new("15001", 22.4, 999.0))),
        ]
    }

    #[test]
    fn columns_follow_first_encountered_order_with_commute_columns_last() {
        let config = ColumnConfig::default();
        let cols = build_columns(&sample(), &config);
        let names: Vec<&str> = cols.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Nº PLAZA", "CENTRO", "MUNICIPIO", "JORNADA", "Denbora", "Distantzia"]
        );
        assert_eq!(cols[0].pin, Pin::Left);
        assert_eq!(cols[1].pin, Pin::Floating);
        assert!(cols[4].is_fixed_right() && cols[5].is_fixed_right());
        assert_eq!(cols[4].kind, ColumnKind::Duration);
    }

    #[test]
    fn filter_options_are_distinct_and_sorted() {
        let cols = build_columns(&sample(), &ColumnConfig::default());
        let municipio = cols.iter().find(|c| c.name == "MUNICIPIO").unwrap();
        assert_eq!(
            municipio.filter_options,
            Some(vec!["Abadiño".to_string(), "Donostia".to_string()])
        );
        let jornada = cols.iter().find(|c| c.name == "JORNADA").unwrap();
        assert!(!jornada.is_filterable());
    }

    #[test]
    fn empty_rows_have_no_columns() {
        assert!(build_columns(&[], &ColumnConfig::default()).is_empty());
    }

    #[test]
    fn distance_and_duration_formatting() {
        assert_eq!(format_distance(Some(999.0)), "999 m");
        assert_eq!(format_distance(Some(1500.0)), "2 km");
        assert_eq!(format_distance(Some(41_200.0)), "41 km");
        assert_eq!(format_distance(None), "-");
        assert_eq!(format_duration(Some(22.4)), "22 min");
        assert_eq!(format_duration(Some(0.0)), "0 min");
        assert_eq!(format_duration(None), "-");
    }

    #[test]
    fn render_uses_column_kind() {
        let rows = sample();
        let cols = build_columns(&rows, &ColumnConfig::default());
        let distance = cols.iter().find(|c| c.name == "Distantzia").unwrap();
        assert_eq!(distance.render(&rows[0]), "19 km");
        assert_eq!(distance.render(&rows[1]), "-");
        assert_eq!(cols[3].render(&rows[0]), "");
    }

    #[test]
    fn absent_duration_sorts_after_numbers() {
        let rows = sample();
        let cols = build_columns(&rows, &ColumnConfig::default());
        let duration = cols.iter().find(|c| c.name == "Denbora").unwrap();
        assert_eq!(duration.compare(&rows[1], &rows[0]), Ordering::Greater);

        let mut ordered: Vec<&OpeningRow> = rows.iter().collect();
        ordered.sort_by(|a, b| duration.compare(a, b));
        assert_eq!(ordered.last().unwrap().id(), 1);
        assert_eq!(SORT_SENTINEL, 9999.0);
    }

    #[test]
    fn text_columns_sort_with_absent_as_empty() {
        let rows = sample();
        let cols = build_columns(&rows, &ColumnConfig::default());
        let jornada = cols.iter().find(|c| c.name == "JORNADA").unwrap();
        assert_eq!(jornada.compare(&rows[0], &rows[1]), Ordering::Less);
    }

    #[test]
    fn prefix_filter_is_case_insensitive() {
        let rows = sample();
        let cols = build_columns(&rows, &ColumnConfig::default());
        let municipio = cols.iter().find(|c| c.name == "MUNICIPIO").unwrap();
        assert!(municipio.matches_filter(&rows[0], "don"));
        assert!(!municipio.matches_filter(&rows[1], "don"));
        let jornada = cols.iter().find(|c| c.name == "JORNADA").unwrap();
        assert!(!jornada.matches_filter(&rows[0], ""));
    }

    #[test]
    fn cache_rebuilds_only_on_new_version() {
        let rows = sample();
        let config = ColumnConfig::default();
        let mut cache = ColumnCache::new();

        let first = cache.get_or_build(1, &rows, &config).to_vec();
        assert_eq!(first[0], rank_column(&config));
        cache.get_or_build(1, &rows, &config);
        assert_eq!(cache.builds(), 1);

        cache.get_or_build(2, &rows[..1], &config);
        assert_eq!(cache.builds(), 2);
        assert!(cache.columns().iter().all(|c| c.name != "JORNADA"));
    }
}
