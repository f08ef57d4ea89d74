//! Commute dataset loading.
//!
//! A [`CommuteLoader`] wraps a [`CommuteSource`] and never fails: a missing or malformed dataset
//! is reported to the observer and degrades to an empty record set, so every row simply shows as
//! unmatched.
//!
//! The loader does not order concurrent requests. Discarding the result of a superseded city
//! selection is the job of [`crate::session::RankingSession`].

pub mod dataset;
pub mod slug;
pub mod source;

use std::fmt;
use std::sync::Arc;

use crate::observability::{report, EngineObserver, Operation, OperationContext, Severity};
use crate::types::CommuteRecord;

pub use dataset::parse_dataset;
pub use slug::city_slug;
pub use source::{CommuteSource, DirectorySource, StaticSource};

/// Loads per-city commute records from a [`CommuteSource`].
pub struct CommuteLoader<S> {
    source: S,
    observer: Option<Arc<dyn EngineObserver>>,
    alert_at_or_above: Severity,
}

impl<S: fmt::Debug> fmt::Debug for CommuteLoader<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommuteLoader")
            .field("source", &self.source)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl<S: CommuteSource> CommuteLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            observer: None,
            alert_at_or_above: Severity::Critical,
        }
    }

    /// Attach an observer that receives load outcomes.
    pub fn with_observer(mut self, observer: Arc<dyn EngineObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Severity at which failures are also raised as alerts.
    pub fn with_alert_threshold(mut self, severity: Severity) -> Self {
        self.alert_at_or_above = severity;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Load the records for `city`; any failure yields an empty collection.
    pub async fn load(&self, city: &str) -> Vec<CommuteRecord> {
        let result = self.source.fetch(city).await;
        let ctx = OperationContext::new(Operation::LoadCommute, city);
        report(
            self.observer.as_ref(),
            self.alert_at_or_above,
            &ctx,
            &result,
            Vec::len,
        );
        result.unwrap_or_default()
    }
}
