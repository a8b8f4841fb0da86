//! The statement view: what a table of assets talks to.
//!
//! A [`StatementView`] owns the flattened rows of the current input, the
//! optional valuation context and the performance collaborator. Supplying a
//! new input discards the previous rows together with every cached result;
//! nothing is patched across inputs, because a new grouping dimension changes
//! row identity even for unchanged positions.

use std::collections::HashMap;
use std::sync::Arc;

use itertools::Itertools;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::performance::cache::{CachedPerformance, MetricLookup, WindowFills};
use crate::performance::record::{MetricValue, PerformanceMetric, PerformanceRecord};
use crate::performance::snapshot::{PerformanceSnapshot, SnapshotContext, SnapshotRequest};
use crate::performance::window::ReportingWindow;
use crate::rows::compare::{SortDirection, sort_rows};
use crate::rows::flatten::{FlatRows, flatten};
use crate::rows::row::Row;
use crate::source::{SecurityId, StatementSource};
use crate::statement_error::StatementError;

/// Presentation options that affect computed values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Direction applied to a fresh input until the first sort.
    pub direction: SortDirection,
    /// Quote exchange rates as foreign-per-term instead of term-per-foreign.
    pub use_indirect_quotation: bool,
}

/// Flattened statement plus on-demand performance.
pub struct StatementView<S: StatementSource, P> {
    rows: FlatRows<S>,
    context: Option<SnapshotContext>,
    snapshot: P,
    config: ViewConfig,
    direction: SortDirection,
    fills: WindowFills,
}

impl<S, P> StatementView<S, P>
where
    S: StatementSource,
    P: PerformanceSnapshot,
{
    /// An empty view with no input and no valuation context.
    pub fn new(snapshot: P, config: ViewConfig) -> Self {
        Self {
            rows: FlatRows::empty(),
            context: None,
            direction: config.direction,
            snapshot,
            config,
            fills: WindowFills::default(),
        }
    }

    /// Replace the input. The previous rows and all their cached results are
    /// dropped; `None` for `source` leaves an empty sequence.
    pub fn set_input(&mut self, source: Option<&S>, context: Option<SnapshotContext>) {
        self.rows = flatten(source);
        self.context = context;
        self.fills = WindowFills::default();
        self.direction = self.config.direction;
        log::debug!(
            "statement input replaced: {} rows, valuation context {}",
            self.rows.len(),
            if self.context.is_some() { "set" } else { "absent" }
        );
    }

    #[inline]
    pub fn rows(&self) -> &FlatRows<S> {
        &self.rows
    }

    #[inline]
    pub fn context(&self) -> Option<&SnapshotContext> {
        self.context.as_ref()
    }

    /// The performance collaborator.
    #[inline]
    pub fn snapshot(&self) -> &P {
        &self.snapshot
    }

    #[inline]
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Direction of the last sort (or the configured one for a fresh input).
    #[inline]
    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Re-sort the rows by `content` without breaking groups apart.
    ///
    /// Row indices used with [`get_or_compute`](Self::get_or_compute) refer
    /// to the order after the sort.
    pub fn sort_by<F>(&mut self, content: F, direction: SortDirection)
    where
        F: Fn(&Row<S>, &Row<S>) -> std::cmp::Ordering,
    {
        sort_rows(self.rows.as_mut_slice(), content, direction);
        self.direction = direction;
    }

    /// Sort by `content` in the opposite of the current direction; returns
    /// the direction applied.
    pub fn toggle_sort<F>(&mut self, content: F) -> SortDirection
    where
        F: Fn(&Row<S>, &Row<S>) -> std::cmp::Ordering,
    {
        let direction = self.direction.toggled();
        self.sort_by(content, direction);
        direction
    }

    /// Performance of row `index` over `window`, computing it on first use.
    ///
    /// Failures of the collaborator are logged and reported as
    /// [`MetricLookup::NotApplicable`]; the window stays unfilled, so a later
    /// call retries.
    pub fn get_or_compute(&self, index: usize, window: &ReportingWindow) -> MetricLookup {
        match self.try_get_or_compute(index, window) {
            Ok(lookup) => lookup,
            Err(err) => {
                log::warn!("performance for row {index} over {window} unavailable: {err}");
                MetricLookup::NotApplicable
            }
        }
    }

    /// Fallible form of [`get_or_compute`](Self::get_or_compute).
    ///
    /// A miss computes `window` for every security row of the sequence in one
    /// collaborator call; securities the collaborator has no record for are
    /// stored as [`MetricLookup::NoData`].
    ///
    /// # Errors
    /// * [`StatementError::RowOutOfRange`] for a stale index.
    /// * Any error returned by the [`PerformanceSnapshot`].
    pub fn try_get_or_compute(
        &self,
        index: usize,
        window: &ReportingWindow,
    ) -> Result<MetricLookup, StatementError> {
        let row = self.row(index)?;
        if !row.is_security() {
            return Ok(MetricLookup::NotApplicable);
        }
        let Some(context) = &self.context else {
            return Ok(MetricLookup::NotApplicable);
        };
        if let Some(cached) = row.performance().get(window) {
            return Ok(cached.into());
        }

        self.fills
            .fill_once(window, || self.fill_window(context, window))?;
        Ok(row
            .performance()
            .get(window)
            .map_or(MetricLookup::NoData, MetricLookup::from))
    }

    /// One figure of row `index` over `window`; `None` unless a record exists.
    pub fn metric(
        &self,
        index: usize,
        window: &ReportingWindow,
        metric: PerformanceMetric,
    ) -> Option<MetricValue> {
        self.get_or_compute(index, window).metric(metric)
    }

    /// Exchange rate from the position's currency to the term currency on
    /// the reference date, inverted for indirect quotation.
    ///
    /// `Ok(None)` for non-position rows or without a valuation context.
    pub fn exchange_rate(&self, index: usize) -> Result<Option<Decimal>, StatementError> {
        let row = self.row(index)?;
        let (Some(currency), Some(context)) = (row.currency(), &self.context) else {
            return Ok(None);
        };
        let rate = context.converter().rate(context.date(), currency)?;
        let rate = if self.config.use_indirect_quotation {
            rate.inverse()?
        } else {
            rate
        };
        Ok(Some(rate.value()))
    }

    /// Windows already computed for the current input, sorted.
    pub fn cached_windows(&self) -> Vec<ReportingWindow> {
        self.fills.filled()
    }

    fn row(&self, index: usize) -> Result<&Row<S>, StatementError> {
        self.rows.get(index).ok_or(StatementError::RowOutOfRange {
            index,
            len: self.rows.len(),
        })
    }

    fn fill_window(&self, context: &SnapshotContext, window: &ReportingWindow) -> Result<(), StatementError> {
        // a security split across categories appears in several rows
        let securities: Vec<SecurityId> = self
            .rows
            .securities()
            .filter_map(|row| row.security().cloned())
            .unique()
            .collect();
        let request = SnapshotRequest::new(context, window);
        let records: HashMap<SecurityId, Arc<PerformanceRecord>> = self
            .snapshot
            .compute(&request, &securities)?
            .into_iter()
            .map(|(id, record)| (id, Arc::new(record)))
            .collect();

        let mut without_data = 0usize;
        for row in self.rows.securities() {
            let Some(id) = row.security() else { continue };
            let value = match records.get(id) {
                Some(record) => CachedPerformance::Record(Arc::clone(record)),
                None => {
                    without_data += 1;
                    CachedPerformance::NoData
                }
            };
            row.performance().fill(window, value);
        }
        log::debug!(
            "computed performance over {window} {}: {} securities, {} rows without data",
            request.interval,
            securities.len(),
            without_data
        );
        Ok(())
    }
}

impl<S: StatementSource, P> std::fmt::Debug for StatementView<S, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatementView")
            .field("rows", &self.rows)
            .field("context", &self.context)
            .field("config", &self.config)
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::performance::snapshot::FixedSnapshot;
    use crate::source::InMemoryStatement;
    use static_assertions::assert_impl_all;

    assert_impl_all!(StatementView<InMemoryStatement, FixedSnapshot>: Send, Sync);
    assert_impl_all!(ViewConfig: Send, Sync, Default);

    #[test]
    fn config_defaults_from_partial_json() {
        let config: ViewConfig = serde_json::from_str(r#"{ "use_indirect_quotation": true }"#).unwrap();
        assert_eq!(config.direction, SortDirection::Forward);
        assert!(config.use_indirect_quotation);
    }

    #[test]
    fn empty_view_reports_nothing() {
        let view: StatementView<InMemoryStatement, FixedSnapshot> =
            StatementView::new(FixedSnapshot::new(), ViewConfig::default());
        assert!(view.rows().is_empty());
        assert!(view.context().is_none());
        assert_eq!(
            view.exchange_rate(0),
            Err(StatementError::RowOutOfRange { index: 0, len: 0 })
        );
        assert!(view.cached_windows().is_empty());
    }
}
