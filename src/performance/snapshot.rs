//! The performance collaborator and the context it is computed against.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;

use super::record::PerformanceRecord;
use super::window::{DateInterval, ReportingWindow};
use crate::money::CurrencyConverter;
use crate::source::{PortfolioId, SecurityId};
use crate::statement_error::StatementError;

/// Which transactions a snapshot covers.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SnapshotScope {
    /// Every portfolio and account of the client.
    Client,
    /// A single portfolio.
    Portfolio(PortfolioId),
}

/// Valuation context a statement was produced for.
///
/// Without a context no performance can be computed; the view then reports
/// every metric as not applicable.
#[derive(Clone, Debug)]
pub struct SnapshotContext {
    scope: SnapshotScope,
    date: NaiveDate,
    converter: CurrencyConverter,
}

impl SnapshotContext {
    pub fn new(scope: SnapshotScope, date: NaiveDate, converter: CurrencyConverter) -> Self {
        Self {
            scope,
            date,
            converter,
        }
    }

    /// Client-wide context.
    pub fn client(date: NaiveDate, converter: CurrencyConverter) -> Self {
        Self::new(SnapshotScope::Client, date, converter)
    }

    /// Context restricted to one portfolio.
    pub fn portfolio(portfolio: PortfolioId, date: NaiveDate, converter: CurrencyConverter) -> Self {
        Self::new(SnapshotScope::Portfolio(portfolio), date, converter)
    }

    #[inline]
    pub fn scope(&self) -> &SnapshotScope {
        &self.scope
    }

    /// Reference date of the statement.
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    #[inline]
    pub fn converter(&self) -> &CurrencyConverter {
        &self.converter
    }
}

/// Everything the collaborator needs for one batch.
#[derive(Clone, Copy, Debug)]
pub struct SnapshotRequest<'a> {
    pub scope: &'a SnapshotScope,
    pub converter: &'a CurrencyConverter,
    pub date: NaiveDate,
    pub window: &'a ReportingWindow,
    /// `window` resolved against `date`.
    pub interval: DateInterval,
}

impl<'a> SnapshotRequest<'a> {
    pub fn new(context: &'a SnapshotContext, window: &'a ReportingWindow) -> Self {
        Self {
            scope: &context.scope,
            converter: &context.converter,
            date: context.date,
            window,
            interval: window.interval(context.date),
        }
    }
}

/// Computes performance for a set of securities over one window.
///
/// Expensive by assumption; callers batch all securities of a statement into
/// one call. Securities without activity in the window are simply absent from
/// the returned map.
pub trait PerformanceSnapshot {
    fn compute(
        &self,
        request: &SnapshotRequest<'_>,
        securities: &[SecurityId],
    ) -> Result<HashMap<SecurityId, PerformanceRecord>, StatementError>;
}

impl<T: PerformanceSnapshot + ?Sized> PerformanceSnapshot for Arc<T> {
    #[inline]
    fn compute(
        &self,
        request: &SnapshotRequest<'_>,
        securities: &[SecurityId],
    ) -> Result<HashMap<SecurityId, PerformanceRecord>, StatementError> {
        (**self).compute(request, securities)
    }
}

impl<T: PerformanceSnapshot + ?Sized> PerformanceSnapshot for Box<T> {
    #[inline]
    fn compute(
        &self,
        request: &SnapshotRequest<'_>,
        securities: &[SecurityId],
    ) -> Result<HashMap<SecurityId, PerformanceRecord>, StatementError> {
        (**self).compute(request, securities)
    }
}

/// Precomputed records per window, for hosts that compute performance
/// elsewhere and for tests.
#[derive(Clone, Debug, Default)]
pub struct FixedSnapshot {
    records: HashMap<ReportingWindow, HashMap<SecurityId, PerformanceRecord>>,
}

impl FixedSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `record` for `security` in `window`. Returns the previous record, if any.
    pub fn insert(
        &mut self,
        window: ReportingWindow,
        security: SecurityId,
        record: PerformanceRecord,
    ) -> Option<PerformanceRecord> {
        self.records.entry(window).or_default().insert(security, record)
    }
}

impl PerformanceSnapshot for FixedSnapshot {
    fn compute(
        &self,
        request: &SnapshotRequest<'_>,
        securities: &[SecurityId],
    ) -> Result<HashMap<SecurityId, PerformanceRecord>, StatementError> {
        let Some(known) = self.records.get(request.window) else {
            return Ok(HashMap::new());
        };
        Ok(securities
            .iter()
            .filter_map(|id| known.get(id).map(|r| (id.clone(), r.clone())))
            .collect())
    }
}
