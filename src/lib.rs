//! # asset-statement
//!
//! Presentation engine for a statement of assets: a two-level tree of asset
//! categories holding positions, under one grand total.
//!
//! ## Features
//! - Flattening of the tree into one ordered row sequence in which every row
//!   carries the group it belongs to ([`rows::flatten`]).
//! - Group-preserving comparators: re-sort by any attribute without moving a
//!   position out of its category ([`rows::compare`]).
//! - Performance metrics per row and reporting window, computed for all rows
//!   of a window in one batch and cached per row ([`view::StatementView`]).
//!
//! ## Example
//! ```rust
//! use asset_statement::prelude::*;
//! use rust_decimal::Decimal;
//!
//! let statement = InMemoryStatement::builder("EUR")
//!     .category("Equity")
//!     .security("A", "Alpha", "EUR", Decimal::from(1), Decimal::from(10), Decimal::from(8))
//!     .security("B", "Beta", "EUR", Decimal::from(1), Decimal::from(5), Decimal::from(6))
//!     .build()?;
//!
//! let mut view = StatementView::new(FixedSnapshot::new(), ViewConfig::default());
//! view.set_input(Some(&statement), None);
//! view.sort_by(compare::by_valuation, SortDirection::Forward);
//!
//! let names: Vec<_> = view.rows().iter().map(|r| r.name()).collect();
//! assert_eq!(names, [Some("Equity"), Some("Beta"), Some("Alpha"), None]);
//! # Ok::<(), StatementError>(())
//! ```
//!
//! ## Logging
//! Uses the [`log`] facade; install any logger in the host application.

pub mod debug_invariants;
pub mod money;
pub mod performance;
pub mod rows;
pub mod source;
pub mod statement_error;
pub mod view;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::money::{CurrencyCode, CurrencyConverter, ExchangeRates, FixedRates, Money};
    pub use crate::performance::{
        FixedSnapshot, MetricLookup, MetricValue, PerformanceMetric, PerformanceRecord,
        PerformanceSnapshot, ReportingWindow, SnapshotContext, SnapshotRequest, SnapshotScope,
        Trend,
    };
    pub use crate::rows::compare;
    pub use crate::rows::{FlatRows, GroupOrder, Row, RowKind, SortDirection, flatten, grouped_comparator, sort_rows};
    pub use crate::source::{
        Aggregate, CategoryNode, InMemoryStatement, InvestmentVehicle, PositionNode, Quote,
        SecurityId, StatementSource,
    };
    pub use crate::statement_error::StatementError;
    pub use crate::view::{StatementView, ViewConfig};
}
