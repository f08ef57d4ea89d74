//! Ranking store: the live row collection plus the set of selected rows.
//!
//! A row is selected exactly when its rank is non-empty. [`RankingStore::edit_rank`] is the only
//! way to change a rank and updates the selection in the same step, so the two cannot drift
//! apart.

use std::collections::{BTreeSet, HashMap};

use crate::error::{EngineError, EngineResult};
use crate::types::{OpeningRow, RowId};

/// Rows, their ranks, and the derived selection.
#[derive(Debug, Clone, Default)]
pub struct RankingStore {
    rows: Vec<OpeningRow>,
    positions: HashMap<RowId, usize>,
    selection: BTreeSet<RowId>,
    version: u64,
}

impl RankingStore {
    /// Create a store over a freshly ingested (or joined) row collection.
    pub fn new(rows: Vec<OpeningRow>) -> Self {
        let mut store = Self::default();
        store.replace_rows(rows);
        store
    }

    /// Swap in a new row collection.
    ///
    /// Bumps [`Self::version`]. The selection is rebuilt from the ranks the new rows carry.
    pub fn replace_rows(&mut self, rows: Vec<OpeningRow>) {
        self.positions = rows.iter().enumerate().map(|(i, r)| (r.id(), i)).collect();
        self.selection = rows
            .iter()
            .filter(|r| r.rank().is_some_and(|rank| !rank.is_empty()))
            .map(OpeningRow::id)
            .collect();
        self.rows = rows;
        self.version += 1;
    }

    /// Swap in freshly ingested rows, taking each row's rank from its `rank_column` cell.
    ///
    /// A re-uploaded export keeps its ranks and selection this way.
    pub fn import_rows(&mut self, rows: Vec<OpeningRow>, rank_column: &str) {
        self.replace_rows(
            rows.into_iter()
                .map(|row| row.with_imported_rank(rank_column))
                .collect(),
        );
    }

    /// Drop all rows and the selection.
    pub fn clear(&mut self) {
        self.replace_rows(Vec::new());
    }

    pub fn rows(&self) -> &[OpeningRow] {
        &self.rows
    }

    pub fn row(&self, id: RowId) -> Option<&OpeningRow> {
        self.positions.get(&id).map(|&i| &self.rows[i])
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Identity of the current row collection. Rank edits leave it unchanged.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn selection(&self) -> &BTreeSet<RowId> {
        &self.selection
    }

    pub fn is_selected(&self, id: RowId) -> bool {
        self.selection.contains(&id)
    }

    /// Set the rank of row `id`.
    ///
    /// - `Some("")` stores an empty rank and deselects the row.
    /// - `Some(value)` stores `value` as-is (no numeric validation) and selects the row.
    /// - `None` changes nothing: neither the rank nor the selection.
    pub fn edit_rank(&mut self, id: RowId, value: Option<&str>) -> EngineResult<()> {
        let &pos = self
            .positions
            .get(&id)
            .ok_or(EngineError::UnknownRow { id })?;
        let Some(value) = value else {
            return Ok(());
        };

        self.rows[pos].set_rank(value.to_string());
        if value.is_empty() {
            self.selection.remove(&id);
        } else {
            self.selection.insert(id);
        }
        Ok(())
    }

    /// Restrict `ordered` rows to the selected ones, keeping their order.
    pub fn selected_in_order<'a, I>(&self, ordered: I) -> Vec<&'a OpeningRow>
    where
        I: IntoIterator<Item = &'a OpeningRow>,
    {
        ordered
            .into_iter()
            .filter(|row| self.selection.contains(&row.id()))
            .collect()
    }

    /// Whether every row satisfies `non-empty rank <=> selected`.
    pub fn is_consistent(&self) -> bool {
        self.rows.iter().all(|r| {
            let ranked = r.rank().is_some_and(|rank| !rank.is_empty());
            ranked == self.selection.contains(&r.id())
        })
    }
}
