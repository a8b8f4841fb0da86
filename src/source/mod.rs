//! Read-only view of a grouped statement of assets.
//!
//! A statement is a two-level tree: categories (one per classification of
//! the chosen grouping dimension) holding positions, under one grand total.
//! The flattening engine consumes it exclusively through [`StatementSource`];
//! [`InMemoryStatement`] is the owned implementation used by callers that
//! build statements themselves.
//!
//! Node handles are cloned into rows, so implementations should make them
//! cheap to clone (`Arc`, indices, or small values).

pub mod in_memory;

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::{CurrencyCode, Money};

pub use in_memory::{AssetCategory, AssetPosition, InMemoryStatement, StatementBuilder, StatementTotal};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                $name(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.0).finish()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                $name::new(id)
            }
        }
    };
}

string_id!(
    /// Identifier of a security (equity, bond, fund, ...).
    SecurityId
);
string_id!(
    /// Identifier of a deposit or cash account.
    AccountId
);
string_id!(
    /// Identifier of a securities portfolio.
    PortfolioId
);

/// What a position holds.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvestmentVehicle {
    Security(SecurityId),
    Account(AccountId),
}

impl InvestmentVehicle {
    pub fn security(&self) -> Option<&SecurityId> {
        match self {
            InvestmentVehicle::Security(id) => Some(id),
            InvestmentVehicle::Account(_) => None,
        }
    }

    pub fn account(&self) -> Option<&AccountId> {
        match self {
            InvestmentVehicle::Security(_) => None,
            InvestmentVehicle::Account(id) => Some(id),
        }
    }
}

/// Latest known price of a security, in the security's own currency.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub date: NaiveDate,
    pub price: Money,
}

impl Quote {
    pub fn new(date: NaiveDate, price: Money) -> Self {
        Self { date, price }
    }
}

/// Values every node of the tree reports, in the statement currency.
pub trait Aggregate {
    /// Market value.
    fn valuation(&self) -> &Money;
    /// Cost basis.
    fn purchase_value(&self) -> &Money;
    /// Valuation minus cost basis.
    fn profit_loss(&self) -> &Money;
}

/// A leaf of the tree.
pub trait PositionNode: Aggregate {
    fn name(&self) -> &str;
    fn vehicle(&self) -> &InvestmentVehicle;
    /// Currency the vehicle is quoted in (may differ from the statement currency).
    fn currency(&self) -> &CurrencyCode;
    /// Number of shares held; `None` for accounts.
    fn shares(&self) -> Option<Decimal>;
    /// Fraction of the grand total valuation.
    fn share(&self) -> Decimal;
    /// Latest quote; `None` for accounts and unquoted securities.
    fn quote(&self) -> Option<&Quote>;
    /// Cost basis per share; `None` without shares.
    fn purchase_price(&self) -> Option<&Money>;
    /// Market value in the vehicle currency, when known.
    fn vehicle_valuation(&self) -> Option<&Money>;
    /// Cost basis in the vehicle currency, when known.
    fn vehicle_purchase_value(&self) -> Option<&Money>;
}

/// A group of positions.
pub trait CategoryNode: Aggregate {
    fn name(&self) -> &str;
    /// Fraction of the grand total valuation.
    fn share(&self) -> Decimal;
}

/// The hierarchical input of the flattening engine.
pub trait StatementSource {
    type Total: Aggregate + Clone + fmt::Debug;
    type Category: CategoryNode + Clone + fmt::Debug;
    type Position: PositionNode + Clone + fmt::Debug;

    /// The grand-total aggregate of the whole tree.
    fn grand_total(&self) -> Self::Total;

    /// Categories in their stable display order.
    fn categories(&self) -> impl Iterator<Item = Self::Category> + '_;

    /// Positions of `category` in their stable display order.
    fn positions<'a>(&'a self, category: &'a Self::Category) -> impl Iterator<Item = Self::Position> + 'a;
}

impl<T: Aggregate + ?Sized> Aggregate for std::sync::Arc<T> {
    #[inline]
    fn valuation(&self) -> &Money {
        (**self).valuation()
    }
    #[inline]
    fn purchase_value(&self) -> &Money {
        (**self).purchase_value()
    }
    #[inline]
    fn profit_loss(&self) -> &Money {
        (**self).profit_loss()
    }
}

impl<T: PositionNode + ?Sized> PositionNode for std::sync::Arc<T> {
    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }
    #[inline]
    fn vehicle(&self) -> &InvestmentVehicle {
        (**self).vehicle()
    }
    #[inline]
    fn currency(&self) -> &CurrencyCode {
        (**self).currency()
    }
    #[inline]
    fn shares(&self) -> Option<Decimal> {
        (**self).shares()
    }
    #[inline]
    fn share(&self) -> Decimal {
        (**self).share()
    }
    #[inline]
    fn quote(&self) -> Option<&Quote> {
        (**self).quote()
    }
    #[inline]
    fn purchase_price(&self) -> Option<&Money> {
        (**self).purchase_price()
    }
    #[inline]
    fn vehicle_valuation(&self) -> Option<&Money> {
        (**self).vehicle_valuation()
    }
    #[inline]
    fn vehicle_purchase_value(&self) -> Option<&Money> {
        (**self).vehicle_purchase_value()
    }
}

impl<T: CategoryNode + ?Sized> CategoryNode for std::sync::Arc<T> {
    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }
    #[inline]
    fn share(&self) -> Decimal {
        (**self).share()
    }
}
