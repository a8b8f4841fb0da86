//! Group-preserving ordering of flattened rows.
//!
//! Any comparator over row *content* can be wrapped with
//! [`grouped_comparator`]. The wrapper orders by group first, so sorting a
//! flattened sequence never moves a position out of its category, and only
//! falls back to the content comparator inside a group.
//!
//! The sort direction applies to both levels. Reversing a column therefore
//! also reverses the order of the groups, which moves the grand total from
//! the bottom to the top.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::row::Row;
use crate::source::StatementSource;

/// Direction requested by the presentation layer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    /// Lower group order first; content comparator as given.
    #[default]
    Forward,
    /// Higher group order first; content comparator reversed.
    Reverse,
}

impl SortDirection {
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Forward => SortDirection::Reverse,
            SortDirection::Reverse => SortDirection::Forward,
        }
    }

    /// Orient an ascending `ordering` in this direction.
    #[inline]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Forward => ordering,
            SortDirection::Reverse => ordering.reverse(),
        }
    }
}

/// Wrap `content` so rows of different groups never interleave.
///
/// Rows of different groups compare by group order, oriented by `direction`.
/// Rows of the same group compare by `content` alone.
pub fn grouped_comparator<S, F>(content: F, direction: SortDirection) -> impl Fn(&Row<S>, &Row<S>) -> Ordering
where
    S: StatementSource,
    F: Fn(&Row<S>, &Row<S>) -> Ordering,
{
    move |a, b| match a.group_order().cmp(&b.group_order()) {
        Ordering::Equal => content(a, b),
        groups => direction.apply(groups),
    }
}

/// Orient a content comparator by `direction`.
pub fn directed<S, F>(content: F, direction: SortDirection) -> impl Fn(&Row<S>, &Row<S>) -> Ordering
where
    S: StatementSource,
    F: Fn(&Row<S>, &Row<S>) -> Ordering,
{
    move |a, b| direction.apply(content(a, b))
}

/// Stable, group-preserving sort of `rows` by `content` in `direction`.
///
/// Rows that compare equal keep their relative order.
pub fn sort_rows<S, F>(rows: &mut [Row<S>], content: F, direction: SortDirection)
where
    S: StatementSource,
    F: Fn(&Row<S>, &Row<S>) -> Ordering,
{
    rows.sort_by(grouped_comparator(directed(content, direction), direction));
}

/// Content comparator over an optional, totally ordered attribute.
///
/// Rows without the attribute (`None`) sort before rows with one.
pub fn by_attribute<S, K, F>(extract: F) -> impl Fn(&Row<S>, &Row<S>) -> Ordering
where
    S: StatementSource,
    K: Ord,
    F: Fn(&Row<S>) -> Option<K>,
{
    move |a, b| extract(a).cmp(&extract(b))
}

/// Content comparator over an optional, partially ordered attribute such as
/// an `f64` ratio. Incomparable values (NaN) compare equal.
pub fn by_partial_attribute<S, K, F>(extract: F) -> impl Fn(&Row<S>, &Row<S>) -> Ordering
where
    S: StatementSource,
    K: PartialOrd,
    F: Fn(&Row<S>) -> Option<K>,
{
    move |a, b| {
        extract(a)
            .partial_cmp(&extract(b))
            .unwrap_or(Ordering::Equal)
    }
}

/// By display name; the grand total (no name) first.
pub fn by_name<S: StatementSource>(a: &Row<S>, b: &Row<S>) -> Ordering {
    a.name().cmp(&b.name())
}

pub fn by_valuation<S: StatementSource>(a: &Row<S>, b: &Row<S>) -> Ordering {
    a.valuation().cmp(b.valuation())
}

pub fn by_purchase_value<S: StatementSource>(a: &Row<S>, b: &Row<S>) -> Ordering {
    a.purchase_value().cmp(b.purchase_value())
}

pub fn by_profit_loss<S: StatementSource>(a: &Row<S>, b: &Row<S>) -> Ordering {
    a.profit_loss().cmp(b.profit_loss())
}

pub fn by_share<S: StatementSource>(a: &Row<S>, b: &Row<S>) -> Ordering {
    a.share().cmp(&b.share())
}

/// By shares held; rows without shares first.
pub fn by_shares<S: StatementSource>(a: &Row<S>, b: &Row<S>) -> Ordering {
    a.shares().cmp(&b.shares())
}

/// By vehicle currency; non-position rows first.
pub fn by_currency<S: StatementSource>(a: &Row<S>, b: &Row<S>) -> Ordering {
    a.currency().cmp(&b.currency())
}

/// By latest quote (currency, then price); rows without a quote first.
pub fn by_quote<S: StatementSource>(a: &Row<S>, b: &Row<S>) -> Ordering {
    a.quote().map(|q| &q.price).cmp(&b.quote().map(|q| &q.price))
}

/// By date of the latest quote; rows without a quote first.
pub fn by_quote_date<S: StatementSource>(a: &Row<S>, b: &Row<S>) -> Ordering {
    a.quote().map(|q| q.date).cmp(&b.quote().map(|q| q.date))
}

/// By cost basis per share; rows without one first.
pub fn by_purchase_price<S: StatementSource>(a: &Row<S>, b: &Row<S>) -> Ordering {
    a.purchase_price().cmp(&b.purchase_price())
}

pub fn by_vehicle_valuation<S: StatementSource>(a: &Row<S>, b: &Row<S>) -> Ordering {
    a.vehicle_valuation().cmp(&b.vehicle_valuation())
}

pub fn by_vehicle_purchase_value<S: StatementSource>(a: &Row<S>, b: &Row<S>) -> Ordering {
    a.vehicle_purchase_value().cmp(&b.vehicle_purchase_value())
}

pub fn by_vehicle_profit_loss<S: StatementSource>(a: &Row<S>, b: &Row<S>) -> Ordering {
    a.vehicle_profit_loss().cmp(&b.vehicle_profit_loss())
}
