#![allow(dead_code)]
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use asset_statement::prelude::*;
use chrono::NaiveDate;
use parking_lot::Mutex;
use rust_decimal::Decimal;

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn eur(amount: i64) -> Money {
    Money::new("EUR".into(), Decimal::from(amount))
}

/// Category A (P1 = 5, P2 = 10), category B (P3 = 1).
pub fn two_categories() -> InMemoryStatement {
    let one = Decimal::ONE;
    InMemoryStatement::builder("EUR")
        .category("A")
        .security("P1", "P1", "EUR", one, Decimal::from(5), Decimal::from(4))
        .security("P2", "P2", "EUR", one, Decimal::from(10), Decimal::from(12))
        .category("B")
        .security("P3", "P3", "EUR", one, Decimal::from(1), Decimal::from(1))
        .build()
        .unwrap()
}

/// Equity (ACME in USD, BETA), Cash (giro account), Empty, Mixed (ACME again).
pub fn mixed() -> InMemoryStatement {
    InMemoryStatement::builder("EUR")
        .category("Equity")
        .security("ACME", "Acme Corp", "USD", Decimal::from(10), Decimal::from(900), Decimal::from(800))
        .security("BETA", "Beta AG", "EUR", Decimal::from(4), Decimal::from(400), Decimal::from(500))
        .category("Cash")
        .account("giro", "Giro", "EUR", Decimal::from(250))
        .category("Empty")
        .category("Mixed")
        .security("ACME", "Acme Corp", "USD", Decimal::from(2), Decimal::from(180), Decimal::from(160))
        .build()
        .unwrap()
}

pub fn record(delta: i64) -> PerformanceRecord {
    PerformanceRecord {
        ttwror: delta as f64 / 100.0,
        irr: delta as f64 / 200.0,
        capital_gains: eur(delta),
        capital_gains_percent: delta as f64 / 100.0,
        delta: eur(delta),
        delta_percent: delta as f64 / 100.0,
    }
}

pub fn client_context(date: NaiveDate) -> SnapshotContext {
    let rates = FixedRates::new().with("USD", "EUR", Decimal::new(9, 1));
    SnapshotContext::client(date, CurrencyConverter::new("EUR".into(), std::sync::Arc::new(rates)))
}

/// Snapshot collaborator that counts invocations and records what it was asked.
#[derive(Default)]
pub struct CountingSnapshot {
    pub inner: FixedSnapshot,
    pub calls: AtomicUsize,
    pub requests: Mutex<Vec<(ReportingWindow, Vec<SecurityId>)>>,
    pub fail_next: AtomicUsize,
}

impl CountingSnapshot {
    pub fn new(inner: FixedSnapshot) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PerformanceSnapshot for CountingSnapshot {
    fn compute(
        &self,
        request: &SnapshotRequest<'_>,
        securities: &[SecurityId],
    ) -> Result<HashMap<SecurityId, PerformanceRecord>, StatementError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .push((request.window.clone(), securities.to_vec()));
        if self
            .fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(StatementError::Snapshot("quote feed offline".into()));
        }
        self.inner.compute(request, securities)
    }
}

pub fn names<S: StatementSource>(rows: &FlatRows<S>) -> Vec<String> {
    rows.iter()
        .map(|r| r.name().unwrap_or("<total>").to_string())
        .collect()
}

pub fn index_of<S: StatementSource>(rows: &FlatRows<S>, name: &str) -> usize {
    rows.iter()
        .position(|r| r.name() == Some(name))
        .unwrap_or_else(|| panic!("no row named {name}"))
}
