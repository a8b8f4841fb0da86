//! StatementError: Unified error type for asset-statement public APIs
//!
//! Absent input, rows without metrics and missing performance records are
//! modelled as data, not errors. This type covers the remaining failures:
//! broken grouping invariants, unknown exchange rates, stale row indices and
//! failures reported by the performance collaborator.

use chrono::NaiveDate;
use thiserror::Error;

/// Unified error type for asset-statement operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatementError {
    /// A flattened sequence does not end with exactly one grand-total row.
    #[error("Grouping error: expected exactly one grand total as the last row, found {count} (last at index {index:?})")]
    GrandTotalMisplaced { count: usize, index: Option<usize> },
    /// Group order decreased between two consecutive rows of a flattened sequence.
    #[error("Grouping error: group order regressed at row {index} ({previous} -> {current})")]
    GroupOrderRegression {
        index: usize,
        previous: u32,
        current: u32,
    },
    /// A category or grand-total row shares its group with the row before it.
    #[error("Grouping error: row {index} must open a new group but has group order {order}")]
    GroupNotOpened { index: usize, order: u32 },
    /// A position row does not follow a category (or a sibling position).
    #[error("Grouping error: position row {index} is not inside a category")]
    OrphanPosition { index: usize },
    /// Row index outside the current sequence.
    #[error("Row index {index} out of range (sequence has {len} rows)")]
    RowOutOfRange { index: usize, len: usize },
    /// The rate source has no rate for the requested currency pair.
    #[error("No exchange rate from {from} to {to} on {date}")]
    MissingExchangeRate {
        from: String,
        to: String,
        date: NaiveDate,
    },
    /// A zero rate cannot be inverted for indirect quotation.
    #[error("Exchange rate from {from} to {to} is zero and cannot be inverted")]
    DegenerateExchangeRate { from: String, to: String },
    /// An aggregate of a statement does not fit the decimal range.
    #[error("Amount overflow while deriving {node}")]
    AmountOverflow { node: String },
    /// The performance collaborator failed to produce a snapshot.
    #[error("Performance snapshot failed: {0}")]
    Snapshot(String),
}
