//! The unit of the flat sequence: one grand total, category or position,
//! tagged with the group it belongs to.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::{CurrencyCode, Money};
use crate::performance::cache::PerformanceCache;
use crate::source::{AccountId, Aggregate, CategoryNode, InvestmentVehicle, PositionNode, Quote, SecurityId, StatementSource};

/// Group tag assigned at flatten time.
///
/// Rows with equal order form one visual group. Only the relative order of
/// values is meaningful, never the integers themselves.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GroupOrder(u32);

impl GroupOrder {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        GroupOrder(raw)
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for GroupOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a row wraps.
pub enum RowKind<S: StatementSource> {
    GrandTotal(S::Total),
    Category(S::Category),
    Position(S::Position),
}

impl<S: StatementSource> fmt::Debug for RowKind<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKind::GrandTotal(t) => f.debug_tuple("GrandTotal").field(t).finish(),
            RowKind::Category(c) => f.debug_tuple("Category").field(c).finish(),
            RowKind::Position(p) => f.debug_tuple("Position").field(p).finish(),
        }
    }
}

/// One entry of a flattened statement.
pub struct Row<S: StatementSource> {
    kind: RowKind<S>,
    group_order: GroupOrder,
    performance: PerformanceCache,
}

impl<S: StatementSource> Row<S> {
    pub(crate) fn new(kind: RowKind<S>, group_order: GroupOrder) -> Self {
        Self {
            kind,
            group_order,
            performance: PerformanceCache::new(),
        }
    }

    #[inline]
    pub fn kind(&self) -> &RowKind<S> {
        &self.kind
    }

    #[inline]
    pub fn group_order(&self) -> GroupOrder {
        self.group_order
    }

    /// Performance results computed for this row so far.
    #[inline]
    pub fn performance(&self) -> &PerformanceCache {
        &self.performance
    }

    pub fn is_grand_total(&self) -> bool {
        matches!(self.kind, RowKind::GrandTotal(_))
    }

    pub fn is_category(&self) -> bool {
        matches!(self.kind, RowKind::Category(_))
    }

    pub fn is_position(&self) -> bool {
        matches!(self.kind, RowKind::Position(_))
    }

    pub fn is_security(&self) -> bool {
        self.security().is_some()
    }

    pub fn is_account(&self) -> bool {
        self.account().is_some()
    }

    pub fn category(&self) -> Option<&S::Category> {
        match &self.kind {
            RowKind::Category(c) => Some(c),
            RowKind::GrandTotal(_) | RowKind::Position(_) => None,
        }
    }

    pub fn position(&self) -> Option<&S::Position> {
        match &self.kind {
            RowKind::Position(p) => Some(p),
            RowKind::GrandTotal(_) | RowKind::Category(_) => None,
        }
    }

    pub fn vehicle(&self) -> Option<&InvestmentVehicle> {
        self.position().map(|p| p.vehicle())
    }

    pub fn security(&self) -> Option<&SecurityId> {
        self.vehicle().and_then(InvestmentVehicle::security)
    }

    pub fn account(&self) -> Option<&AccountId> {
        self.vehicle().and_then(InvestmentVehicle::account)
    }

    /// Display name; the grand total has none.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            RowKind::GrandTotal(_) => None,
            RowKind::Category(c) => Some(c.name()),
            RowKind::Position(p) => Some(p.name()),
        }
    }

    /// Currency of the held vehicle; only positions have one.
    pub fn currency(&self) -> Option<&CurrencyCode> {
        self.position().map(|p| p.currency())
    }

    /// Shares held; only security positions have them.
    pub fn shares(&self) -> Option<Decimal> {
        self.position().and_then(|p| p.shares())
    }

    /// Latest quote of a security position.
    pub fn quote(&self) -> Option<&Quote> {
        self.position().and_then(|p| p.quote())
    }

    /// Cost basis per share of a security position.
    pub fn purchase_price(&self) -> Option<&Money> {
        self.position().and_then(|p| p.purchase_price())
    }

    pub fn vehicle_valuation(&self) -> Option<&Money> {
        self.position().and_then(|p| p.vehicle_valuation())
    }

    pub fn vehicle_purchase_value(&self) -> Option<&Money> {
        self.position().and_then(|p| p.vehicle_purchase_value())
    }

    /// Profit or loss in the vehicle currency; `None` unless both vehicle
    /// amounts are known.
    pub fn vehicle_profit_loss(&self) -> Option<Money> {
        let valuation = self.vehicle_valuation()?;
        let purchase = self.vehicle_purchase_value()?;
        let amount = valuation.amount().checked_sub(purchase.amount())?;
        Some(Money::new(valuation.currency().clone(), amount))
    }

    pub fn valuation(&self) -> &Money {
        match &self.kind {
            RowKind::GrandTotal(t) => t.valuation(),
            RowKind::Category(c) => c.valuation(),
            RowKind::Position(p) => p.valuation(),
        }
    }

    pub fn purchase_value(&self) -> &Money {
        match &self.kind {
            RowKind::GrandTotal(t) => t.purchase_value(),
            RowKind::Category(c) => c.purchase_value(),
            RowKind::Position(p) => p.purchase_value(),
        }
    }

    pub fn profit_loss(&self) -> &Money {
        match &self.kind {
            RowKind::GrandTotal(t) => t.profit_loss(),
            RowKind::Category(c) => c.profit_loss(),
            RowKind::Position(p) => p.profit_loss(),
        }
    }

    /// Fraction of the grand total valuation; the grand total itself is 1.
    pub fn share(&self) -> Decimal {
        match &self.kind {
            RowKind::GrandTotal(_) => Decimal::ONE,
            RowKind::Category(c) => c.share(),
            RowKind::Position(p) => p.share(),
        }
    }
}

impl<S: StatementSource> fmt::Debug for Row<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row")
            .field("kind", &self.kind)
            .field("group_order", &self.group_order)
            .field("performance", &self.performance)
            .finish()
    }
}
