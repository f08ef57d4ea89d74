//! Observer hooks for engine operations.
//!
//! Ingestion, commute dataset loading and export all report their outcome to an optional
//! [`EngineObserver`]. Failures carry a [`Severity`]; observers are additionally alerted when the
//! severity meets the configured threshold.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::EngineError;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal, degraded result).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

/// Which engine operation an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Spreadsheet ingestion.
    Ingest,
    /// Commute dataset loading for an origin city.
    LoadCommute,
    /// Export of the selected rows.
    Export,
}

/// Context about an operation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationContext {
    pub operation: Operation,
    /// What the operation acted on: a file name, a city slug, or the export file name.
    pub subject: String,
}

impl OperationContext {
    pub fn new(operation: Operation, subject: impl Into<String>) -> Self {
        Self {
            operation,
            subject: subject.into(),
        }
    }
}

/// Minimal stats reported on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationStats {
    /// Rows ingested, records loaded, or rows exported.
    pub rows: usize,
}

/// Observer interface for operation outcomes.
pub trait EngineObserver: Send + Sync {
    /// Called when an operation succeeds.
    fn on_success(&self, _ctx: &OperationContext, _stats: OperationStats) {}

    /// Called when an operation fails (including degraded, non-fatal outcomes).
    fn on_failure(&self, _ctx: &OperationContext, _severity: Severity, _error: &EngineError) {}

    /// Called when a failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &OperationContext, severity: Severity, error: &EngineError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Report `result` to `observer`, alerting when the failure severity reaches `alert_at_or_above`.
pub(crate) fn report<T>(
    observer: Option<&Arc<dyn EngineObserver>>,
    alert_at_or_above: Severity,
    ctx: &OperationContext,
    result: &Result<T, EngineError>,
    rows: impl FnOnce(&T) -> usize,
) {
    let Some(obs) = observer else {
        return;
    };
    match result {
        Ok(value) => obs.on_success(ctx, OperationStats { rows: rows(value) }),
        Err(e) => {
            let sev = e.severity();
            obs.on_failure(ctx, sev, e);
            if sev >= alert_at_or_above {
                obs.on_alert(ctx, sev, e);
            }
        }
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn EngineObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn EngineObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl EngineObserver for CompositeObserver {
    fn on_success(&self, ctx: &OperationContext, stats: OperationStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &OperationContext, severity: Severity, error: &EngineError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &OperationContext, severity: Severity, error: &EngineError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl EngineObserver for StdErrObserver {
    fn on_success(&self, ctx: &OperationContext, stats: OperationStats) {
        eprintln!(
            "[{:?}][ok] subject={} rows={}",
            ctx.operation, ctx.subject, stats.rows
        );
    }

    fn on_failure(&self, ctx: &OperationContext, severity: Severity, error: &EngineError) {
        eprintln!(
            "[{:?}][{:?}] subject={} err={}",
            ctx.operation, severity, ctx.subject, error
        );
    }

    fn on_alert(&self, ctx: &OperationContext, severity: Severity, error: &EngineError) {
        eprintln!(
            "[ALERT][{:?}][{:?}] subject={} err={}",
            ctx.operation, severity, ctx.subject, error
        );
    }
}

/// Appends events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl EngineObserver for FileObserver {
    fn on_success(&self, ctx: &OperationContext, stats: OperationStats) {
        self.append_line(&format!(
            "{} ok op={:?} subject={} rows={}",
            unix_ts(),
            ctx.operation,
            ctx.subject,
            stats.rows
        ));
    }

    fn on_failure(&self, ctx: &OperationContext, severity: Severity, error: &EngineError) {
        self.append_line(&format!(
            "{} fail severity={:?} op={:?} subject={} err={}",
            unix_ts(),
            severity,
            ctx.operation,
            ctx.subject,
            error
        ));
    }

    fn on_alert(&self, ctx: &OperationContext, severity: Severity, error: &EngineError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} op={:?} subject={} err={}",
            unix_ts(),
            severity,
            ctx.operation,
            ctx.subject,
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
