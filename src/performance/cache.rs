//! Per-row performance cache and the per-window batch guard.
//!
//! A row's [`PerformanceCache`] is written only by a batch fill, once per
//! window. [`WindowFills`] makes that "once" hold for the whole sequence,
//! including under concurrent readers: the first request for a window runs
//! the fill, concurrent requests for the same window block on it, and later
//! requests see the filled cells.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::{Mutex, RwLock};

use super::record::{MetricValue, PerformanceMetric, PerformanceRecord};
use super::window::ReportingWindow;
use crate::statement_error::StatementError;

/// A stored batch result for one row and window.
#[derive(Clone, Debug, PartialEq)]
pub enum CachedPerformance {
    /// The security had no activity in the window.
    NoData,
    Record(Arc<PerformanceRecord>),
}

/// Answer to a metric request.
#[derive(Clone, Debug, PartialEq)]
pub enum MetricLookup {
    /// The row cannot have performance (category, grand total, account), or
    /// no valuation context is set.
    NotApplicable,
    /// The security had no activity in the window.
    NoData,
    Record(Arc<PerformanceRecord>),
}

impl MetricLookup {
    pub fn record(&self) -> Option<&PerformanceRecord> {
        match self {
            MetricLookup::Record(r) => Some(r),
            MetricLookup::NotApplicable | MetricLookup::NoData => None,
        }
    }

    pub fn is_not_applicable(&self) -> bool {
        matches!(self, MetricLookup::NotApplicable)
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, MetricLookup::NoData)
    }

    /// One figure of the record, if there is a record.
    pub fn metric(&self, metric: PerformanceMetric) -> Option<MetricValue> {
        self.record().map(|r| r.get(metric))
    }
}

impl From<CachedPerformance> for MetricLookup {
    fn from(cached: CachedPerformance) -> Self {
        match cached {
            CachedPerformance::NoData => MetricLookup::NoData,
            CachedPerformance::Record(r) => MetricLookup::Record(r),
        }
    }
}

/// Performance results of one row, keyed by window.
#[derive(Default)]
pub struct PerformanceCache {
    entries: RwLock<HashMap<ReportingWindow, CachedPerformance>>,
}

impl PerformanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, window: &ReportingWindow) -> Option<CachedPerformance> {
        self.entries.read().get(window).cloned()
    }

    pub fn contains(&self, window: &ReportingWindow) -> bool {
        self.entries.read().contains_key(window)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Store `value` unless the window is already filled. Returns whether it was stored.
    pub(crate) fn fill(&self, window: &ReportingWindow, value: CachedPerformance) -> bool {
        let mut entries = self.entries.write();
        if entries.contains_key(window) {
            return false;
        }
        entries.insert(window.clone(), value);
        true
    }
}

impl fmt::Debug for PerformanceCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.read();
        f.debug_set().entries(entries.keys()).finish()
    }
}

/// Guard ensuring each window is batch-filled at most once per sequence.
#[derive(Default)]
pub(crate) struct WindowFills {
    cells: Mutex<HashMap<ReportingWindow, Arc<OnceCell<()>>>>,
}

impl WindowFills {
    /// Run `fill` unless `window` was already filled. Concurrent callers for
    /// the same window wait for the running fill. A failed fill leaves the
    /// window open for a later attempt.
    ///
    /// Returns whether this call ran the fill.
    pub(crate) fn fill_once<F>(&self, window: &ReportingWindow, fill: F) -> Result<bool, StatementError>
    where
        F: FnOnce() -> Result<(), StatementError>,
    {
        let cell = {
            let mut cells = self.cells.lock();
            Arc::clone(cells.entry(window.clone()).or_default())
        };
        let mut ran = false;
        cell.get_or_try_init(|| {
            ran = true;
            fill()
        })?;
        Ok(ran)
    }

    pub(crate) fn filled(&self) -> Vec<ReportingWindow> {
        let cells = self.cells.lock();
        let mut windows: Vec<_> = cells
            .iter()
            .filter(|(_, cell)| cell.get().is_some())
            .map(|(window, _)| window.clone())
            .collect();
        windows.sort();
        windows
    }
}
