//! Table view state: the active sort and filters, and the display order they produce.

use std::collections::BTreeMap;

use crate::types::OpeningRow;

use super::columns::ColumnSpec;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Active sort: a column name and a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub column: String,
    pub order: SortOrder,
}

/// Sort and filter selection applied to the ranking table.
///
/// A row is visible when, for every filtered column, it prefix-matches at least one of the
/// selected values. Filters on columns missing from the model are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableView {
    sort: Option<SortState>,
    filters: BTreeMap<String, Vec<String>>,
}

impl TableView {
    /// A view sorted ascending by `rank_column`, so ranked rows come first in rank order.
    pub fn ranked(rank_column: impl Into<String>) -> Self {
        Self {
            sort: Some(SortState {
                column: rank_column.into(),
                order: SortOrder::Ascending,
            }),
            filters: BTreeMap::new(),
        }
    }

    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    pub fn sort_by(&mut self, column: impl Into<String>, order: SortOrder) {
        self.sort = Some(SortState {
            column: column.into(),
            order,
        });
    }

    /// Keep source order.
    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    /// Select filter values for `column`; an empty list removes the filter.
    pub fn set_filter(&mut self, column: impl Into<String>, values: Vec<String>) {
        let column = column.into();
        if values.is_empty() {
            self.filters.remove(&column);
        } else {
            self.filters.insert(column, values);
        }
    }

    pub fn filters(&self) -> &BTreeMap<String, Vec<String>> {
        &self.filters
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    /// All rows in display order (sort applied, filters not applied).
    ///
    /// The sort is stable, so ties keep source order.
    pub fn order<'a>(&self, rows: &'a [OpeningRow], columns: &[ColumnSpec]) -> Vec<&'a OpeningRow> {
        let mut out: Vec<&OpeningRow> = rows.iter().collect();
        let Some(sort) = &self.sort else {
            return out;
        };
        let Some(spec) = columns.iter().find(|c| c.name == sort.column) else {
            return out;
        };
        match sort.order {
            SortOrder::Ascending => out.sort_by(|a, b| spec.compare(a, b)),
            SortOrder::Descending => out.sort_by(|a, b| spec.compare(b, a)),
        }
        out
    }

    /// Rows that pass every active filter, in display order.
    pub fn visible<'a>(&self, rows: &'a [OpeningRow], columns: &[ColumnSpec]) -> Vec<&'a OpeningRow> {
        let active: Vec<(&ColumnSpec, &Vec<String>)> = self
            .filters
            .iter()
            .filter_map(|(name, values)| {
                columns
                    .iter()
                    .find(|c| &c.name == name)
                    .map(|spec| (spec, values))
            })
            .collect();

        self.order(rows, columns)
            .into_iter()
            .filter(|row| {
                active
                    .iter()
                    .all(|(spec, values)| values.iter().any(|v| spec.matches_filter(row, v)))
            })
            .collect()
    }
}
