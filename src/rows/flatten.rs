//! Flattening of a statement tree into a grouped row sequence.
//!
//! The walk is depth-first. A category row opens a group, its positions share
//! the next group, and the grand total closes the sequence with an order
//! strictly greater than every other row:
//!
//! ```text
//! A  P1 P2  B  P3  T
//! 0  1  1   2  3   5
//! ```
//!
//! Each category consumes exactly two group values whether it holds zero or
//! many positions.

use std::ops::Index;

use itertools::Itertools;

use super::row::{GroupOrder, Row, RowKind};
use crate::debug_invariants::DebugInvariants;
use crate::statement_error::StatementError;
use crate::source::StatementSource;

/// A flattened statement.
///
/// Owns its rows and, through them, every cached performance result. A new
/// source always produces a new `FlatRows`; nothing is carried over.
pub struct FlatRows<S: StatementSource> {
    rows: Vec<Row<S>>,
}

impl<S: StatementSource> FlatRows<S> {
    /// An empty sequence (no grand total either).
    pub fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Row<S>> {
        self.rows.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row<S>> {
        self.rows.iter()
    }

    pub fn as_slice(&self) -> &[Row<S>] {
        &self.rows
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Row<S>] {
        &mut self.rows
    }

    /// The grand-total row, if the sequence is not empty.
    pub fn grand_total(&self) -> Option<&Row<S>> {
        self.rows.iter().find(|r| r.is_grand_total())
    }

    /// Iterate over rows that hold a security.
    pub fn securities(&self) -> impl Iterator<Item = &Row<S>> + '_ {
        self.rows.iter().filter(|r| r.is_security())
    }

    /// Contiguous runs of rows sharing a group order, in current row order.
    pub fn groups(&self) -> impl Iterator<Item = &[Row<S>]> + '_ {
        self.rows
            .chunk_by(|a, b| a.group_order() == b.group_order())
    }
}

impl<S: StatementSource> Index<usize> for FlatRows<S> {
    type Output = Row<S>;

    fn index(&self, index: usize) -> &Row<S> {
        &self.rows[index]
    }
}

impl<'a, S: StatementSource> IntoIterator for &'a FlatRows<S> {
    type Item = &'a Row<S>;
    type IntoIter = std::slice::Iter<'a, Row<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl<S: StatementSource> std::fmt::Debug for FlatRows<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.rows.iter()).finish()
    }
}

/// Flatten `source` into a grouped row sequence.
///
/// `None` yields an empty sequence. The source is only read.
pub fn flatten<S: StatementSource>(source: Option<&S>) -> FlatRows<S> {
    let Some(source) = source else {
        return FlatRows::empty();
    };

    let mut rows = Vec::new();
    let mut order = 0u32;
    for category in source.categories() {
        rows.push(Row::new(RowKind::Category(category.clone()), GroupOrder::new(order)));
        order += 1;
        rows.extend(
            source
                .positions(&category)
                .map(|p| Row::new(RowKind::Position(p), GroupOrder::new(order))),
        );
        order += 1;
    }
    rows.push(Row::new(
        RowKind::GrandTotal(source.grand_total()),
        GroupOrder::new(order + 1),
    ));

    let flat = FlatRows { rows };
    log::debug!(
        "flattened statement into {} rows across {} groups",
        flat.len(),
        flat.groups().count()
    );
    flat.debug_assert_invariants();
    flat
}

impl<S: StatementSource> DebugInvariants for FlatRows<S> {
    /// Checks the flattened-order invariants. Only meaningful before the
    /// sequence is re-sorted: a reverse sort legitimately decreases group
    /// order.
    fn validate_invariants(&self) -> Result<(), StatementError> {
        if self.rows.is_empty() {
            return Ok(());
        }

        let totals = self.rows.iter().positions(|r| r.is_grand_total()).collect::<Vec<_>>();
        let last = self.rows.len() - 1;
        if totals != [last] {
            return Err(StatementError::GrandTotalMisplaced {
                count: totals.len(),
                index: totals.last().copied(),
            });
        }

        if self.rows[0].is_position() {
            return Err(StatementError::OrphanPosition { index: 0 });
        }

        for (index, (prev, cur)) in self.rows.iter().tuple_windows().enumerate() {
            let index = index + 1;
            let (p, c) = (prev.group_order(), cur.group_order());
            if c < p {
                return Err(StatementError::GroupOrderRegression {
                    index,
                    previous: p.get(),
                    current: c.get(),
                });
            }
            match cur.kind() {
                RowKind::Category(_) | RowKind::GrandTotal(_) if c == p => {
                    return Err(StatementError::GroupNotOpened {
                        index,
                        order: c.get(),
                    });
                }
                RowKind::Position(_) if prev.is_category() && c == p => {
                    return Err(StatementError::GroupNotOpened {
                        index,
                        order: c.get(),
                    });
                }
                RowKind::Position(_) if !prev.is_category() && c != p => {
                    return Err(StatementError::OrphanPosition { index });
                }
                _ => {}
            }
        }
        Ok(())
    }
}
