//! Interactive ranking session.
//!
//! [`RankingSession`] holds everything a user works with between choosing an origin city and
//! downloading the ranked subset:
//!
//! - the commute records of the chosen city
//! - the ingested rows, joined to those records, in a [`RankingStore`]
//! - the memoized column model and the [`TableView`]
//! - user-facing notices
//!
//! Loads are asynchronous and may overlap. Each city selection and each upload hands out a
//! ticket carrying a generation number; a result presented with a superseded ticket is discarded
//! ([`LoadOutcome::Stale`]). While a load is pending the session reports [`RankingSession::is_loading`]
//! and refuses rank edits.

use std::fmt;

use crate::commute::{CommuteLoader, CommuteSource};
use crate::error::{EngineError, EngineResult};
use crate::export::{export_selected, ExportFile, ExportOptions};
use crate::ingestion::{ingest_from_bytes, IngestionOptions};
use crate::processing::{
    match_distances, unmatched_count, ColumnCache, ColumnConfig, ColumnSpec, TableView,
};
use crate::ranking::RankingStore;
use crate::types::{CommuteRecord, OpeningRow, RowId};

/// Configuration of a [`RankingSession`].
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub columns: ColumnConfig,
    pub ingestion: IngestionOptions,
    pub export: ExportOptions,
}

/// Ticket for an in-flight commute dataset load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityTicket {
    city: String,
    generation: u64,
}

impl CityTicket {
    /// City slug the load was requested for.
    pub fn city(&self) -> &str {
        &self.city
    }
}

/// Ticket for an in-flight spreadsheet upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket {
    generation: u64,
}

/// Whether a finished load was applied to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer request superseded this one; its result was dropped.
    Stale,
}

/// Notice severity, from the user's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// A dismissible message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserNotice {
    pub level: NoticeLevel,
    pub text: String,
}

impl UserNotice {
    fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

impl fmt::Display for UserNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.level, self.text)
    }
}

/// In-memory state of one ranking session.
#[derive(Debug)]
pub struct RankingSession {
    options: SessionOptions,
    city: Option<String>,
    city_generation: u64,
    city_pending: bool,
    commute: Vec<CommuteRecord>,
    upload_generation: u64,
    upload_pending: bool,
    ingested: Vec<OpeningRow>,
    store: RankingStore,
    columns: ColumnCache,
    view: TableView,
    notices: Vec<UserNotice>,
}

impl Default for RankingSession {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

impl RankingSession {
    pub fn new(options: SessionOptions) -> Self {
        let view = TableView::ranked(options.columns.rank_column.clone());
        Self {
            options,
            city: None,
            city_generation: 0,
            city_pending: false,
            commute: Vec::new(),
            upload_generation: 0,
            upload_pending: false,
            ingested: Vec::new(),
            store: RankingStore::default(),
            columns: ColumnCache::new(),
            view,
            notices: Vec::new(),
        }
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Most recently requested origin city.
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    /// Commute records of the current city (empty until its load is applied).
    pub fn commute(&self) -> &[CommuteRecord] {
        &self.commute
    }

    /// True while a city load or an upload is pending.
    pub fn is_loading(&self) -> bool {
        self.city_pending || self.upload_pending
    }

    /// Select a new origin city and start loading its dataset.
    ///
    /// Supersedes any pending city load and discards the current rows, ranks and commute data.
    pub fn select_city(&mut self, city: impl Into<String>) -> CityTicket {
        let city = city.into();
        self.city_generation += 1;
        self.city_pending = true;
        self.city = Some(city.clone());
        self.commute.clear();
        self.ingested.clear();
        self.store.clear();
        CityTicket {
            city,
            generation: self.city_generation,
        }
    }

    /// Apply the result of a city load, unless a newer city was selected meanwhile.
    ///
    /// Rows uploaded while the load was pending are re-joined against the new records.
    pub fn finish_city_load(&mut self, ticket: &CityTicket, records: Vec<CommuteRecord>) -> LoadOutcome {
        if ticket.generation != self.city_generation {
            return LoadOutcome::Stale;
        }
        self.city_pending = false;
        self.commute = records;
        if !self.ingested.is_empty() {
            self.join_ingested();
        }
        LoadOutcome::Applied
    }

    /// Select `city` and load it through `loader` in one step.
    pub async fn load_city<S: CommuteSource>(
        &mut self,
        loader: &CommuteLoader<S>,
        city: impl Into<String>,
    ) -> LoadOutcome {
        let ticket = self.select_city(city);
        let records = loader.load(ticket.city()).await;
        self.finish_city_load(&ticket, records)
    }

    /// Start an upload; supersedes any pending upload.
    pub fn begin_upload(&mut self) -> UploadTicket {
        self.upload_generation += 1;
        self.upload_pending = true;
        UploadTicket {
            generation: self.upload_generation,
        }
    }

    /// Ingest the uploaded file and join it to the current commute records.
    ///
    /// On a parse failure an error notice is queued and the previous table is kept.
    pub fn finish_upload(&mut self, ticket: UploadTicket, file_name: &str, bytes: &[u8]) -> LoadOutcome {
        if ticket.generation != self.upload_generation {
            return LoadOutcome::Stale;
        }
        self.upload_pending = false;

        match ingest_from_bytes(file_name, bytes, &self.options.ingestion) {
            Ok(rows) => {
                self.ingested = rows;
                self.join_ingested();
            }
            Err(e) => self.notices.push(UserNotice::new(
                NoticeLevel::Error,
                format!("could not process the spreadsheet: {e}"),
            )),
        }
        LoadOutcome::Applied
    }

    /// Begin and finish an upload in one step.
    pub fn upload(&mut self, file_name: &str, bytes: &[u8]) -> LoadOutcome {
        let ticket = self.begin_upload();
        self.finish_upload(ticket, file_name, bytes)
    }

    fn join_ingested(&mut self) {
        let joined = match_distances(&self.ingested, &self.commute, &self.options.columns.facility_column);
        let unmatched = unmatched_count(&joined);
        if unmatched > 0 && !self.city_pending {
            self.notices.push(UserNotice::new(
                NoticeLevel::Warning,
                format!("{unmatched} of {} openings have no commute data", joined.len()),
            ));
        }
        self.store.import_rows(joined, &self.options.columns.rank_column);
    }

    pub fn store(&self) -> &RankingStore {
        &self.store
    }

    pub fn rows(&self) -> &[OpeningRow] {
        self.store.rows()
    }

    /// Column model of the current rows, rank column first.
    ///
    /// Rebuilt only when the row collection changes, not on rank edits.
    pub fn columns(&mut self) -> &[ColumnSpec] {
        self.columns
            .get_or_build(self.store.version(), self.store.rows(), &self.options.columns)
    }

    /// How many times the column model has been built.
    pub fn column_builds(&self) -> u64 {
        self.columns.builds()
    }

    pub fn view(&self) -> &TableView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut TableView {
        &mut self.view
    }

    /// Rows passing the active filters, in display order.
    pub fn visible_rows(&mut self) -> Vec<&OpeningRow> {
        self.columns();
        self.view.visible(self.store.rows(), self.columns.columns())
    }

    /// Set a row's rank; refused with [`EngineError::Busy`] while a load is pending.
    pub fn edit_rank(&mut self, id: RowId, value: Option<&str>) -> EngineResult<()> {
        if self.is_loading() {
            return Err(EngineError::Busy);
        }
        self.store.edit_rank(id, value)
    }

    /// Export the selected rows in display order.
    ///
    /// The outcome is also queued as a notice: success, a warning for an empty selection, or an
    /// error otherwise.
    pub fn export(&mut self) -> EngineResult<ExportFile> {
        self.columns();
        let ordered = self.view.order(self.store.rows(), self.columns.columns());
        let result = export_selected(
            ordered,
            self.store.selection(),
            &self.options.columns,
            &self.options.export,
        );

        let notice = match &result {
            Ok(file) => UserNotice::new(
                NoticeLevel::Success,
                format!("{} selected rows exported to {}", file.rows, file.file_name),
            ),
            Err(EngineError::EmptySelection) => {
                UserNotice::new(NoticeLevel::Warning, "no rows are selected for download")
            }
            Err(e) => UserNotice::new(NoticeLevel::Error, format!("export failed: {e}")),
        };
        self.notices.push(notice);
        result
    }

    pub fn notices(&self) -> &[UserNotice] {
        &self.notices
    }

    /// Remove and return all queued notices.
    pub fn take_notices(&mut self) -> Vec<UserNotice> {
        std::mem::take(&mut self.notices)
    }
}
