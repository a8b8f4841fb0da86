//! Owned, in-memory statement of assets.
//!
//! [`StatementBuilder`] collects positions per category and derives every
//! aggregate from them: category sums, the grand total and each node's share
//! of the total valuation.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{Aggregate, AccountId, CategoryNode, InvestmentVehicle, PositionNode, Quote, SecurityId, StatementSource};
use crate::money::{CurrencyCode, Money};
use crate::statement_error::StatementError;

/// Name of the category that collects positions added before any category.
pub const UNASSIGNED_CATEGORY: &str = "Without Classification";

/// Grand total of an [`InMemoryStatement`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatementTotal {
    valuation: Money,
    purchase_value: Money,
    profit_loss: Money,
}

impl Aggregate for StatementTotal {
    fn valuation(&self) -> &Money {
        &self.valuation
    }
    fn purchase_value(&self) -> &Money {
        &self.purchase_value
    }
    fn profit_loss(&self) -> &Money {
        &self.profit_loss
    }
}

/// A category of an [`InMemoryStatement`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetCategory {
    name: String,
    valuation: Money,
    purchase_value: Money,
    profit_loss: Money,
    share: Decimal,
    positions: Vec<Arc<AssetPosition>>,
}

impl AssetCategory {
    pub fn positions(&self) -> &[Arc<AssetPosition>] {
        &self.positions
    }
}

impl Aggregate for AssetCategory {
    fn valuation(&self) -> &Money {
        &self.valuation
    }
    fn purchase_value(&self) -> &Money {
        &self.purchase_value
    }
    fn profit_loss(&self) -> &Money {
        &self.profit_loss
    }
}

impl CategoryNode for AssetCategory {
    fn name(&self) -> &str {
        &self.name
    }
    fn share(&self) -> Decimal {
        self.share
    }
}

/// A position of an [`InMemoryStatement`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetPosition {
    name: String,
    vehicle: InvestmentVehicle,
    currency: CurrencyCode,
    shares: Option<Decimal>,
    valuation: Money,
    purchase_value: Money,
    profit_loss: Money,
    share: Decimal,
    quote: Option<Quote>,
    purchase_price: Option<Money>,
    vehicle_valuation: Option<Money>,
    vehicle_purchase_value: Option<Money>,
}

impl Aggregate for AssetPosition {
    fn valuation(&self) -> &Money {
        &self.valuation
    }
    fn purchase_value(&self) -> &Money {
        &self.purchase_value
    }
    fn profit_loss(&self) -> &Money {
        &self.profit_loss
    }
}

impl PositionNode for AssetPosition {
    fn name(&self) -> &str {
        &self.name
    }
    fn vehicle(&self) -> &InvestmentVehicle {
        &self.vehicle
    }
    fn currency(&self) -> &CurrencyCode {
        &self.currency
    }
    fn shares(&self) -> Option<Decimal> {
        self.shares
    }
    fn share(&self) -> Decimal {
        self.share
    }
    fn quote(&self) -> Option<&Quote> {
        self.quote.as_ref()
    }
    fn purchase_price(&self) -> Option<&Money> {
        self.purchase_price.as_ref()
    }
    fn vehicle_valuation(&self) -> Option<&Money> {
        self.vehicle_valuation.as_ref()
    }
    fn vehicle_purchase_value(&self) -> Option<&Money> {
        self.vehicle_purchase_value.as_ref()
    }
}

/// A statement of assets held entirely in memory.
#[derive(Clone, Debug)]
pub struct InMemoryStatement {
    total: Arc<StatementTotal>,
    categories: Vec<Arc<AssetCategory>>,
}

impl InMemoryStatement {
    pub fn builder(currency: impl Into<CurrencyCode>) -> StatementBuilder {
        StatementBuilder::new(currency)
    }

    pub fn currency(&self) -> &CurrencyCode {
        self.total.valuation.currency()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn position_count(&self) -> usize {
        self.categories.iter().map(|c| c.positions.len()).sum()
    }
}

impl StatementSource for InMemoryStatement {
    type Total = Arc<StatementTotal>;
    type Category = Arc<AssetCategory>;
    type Position = Arc<AssetPosition>;

    fn grand_total(&self) -> Arc<StatementTotal> {
        Arc::clone(&self.total)
    }

    fn categories(&self) -> impl Iterator<Item = Arc<AssetCategory>> + '_ {
        self.categories.iter().cloned()
    }

    fn positions<'a>(&'a self, category: &'a Arc<AssetCategory>) -> impl Iterator<Item = Arc<AssetPosition>> + 'a {
        category.positions.iter().cloned()
    }
}

#[derive(Debug)]
struct PositionDraft {
    name: String,
    vehicle: InvestmentVehicle,
    currency: CurrencyCode,
    shares: Option<Decimal>,
    valuation: Decimal,
    purchase_value: Decimal,
    quote: Option<Quote>,
    vehicle_amounts: Option<(Decimal, Decimal)>,
}

#[derive(Debug)]
struct CategoryDraft {
    name: String,
    positions: Vec<PositionDraft>,
}

/// Builder for [`InMemoryStatement`].
///
/// Amounts are in the statement currency. Positions attach to the most
/// recently opened category; positions added before any category land in
/// [`UNASSIGNED_CATEGORY`]. [`quoted`](Self::quoted) and
/// [`in_vehicle_currency`](Self::in_vehicle_currency) refine the position
/// added last.
///
/// # Example
/// ```rust
/// use asset_statement::source::{InMemoryStatement, StatementSource};
/// use rust_decimal::Decimal;
///
/// let statement = InMemoryStatement::builder("EUR")
///     .category("Equity")
///     .security("DE0007164600", "SAP", "EUR", Decimal::from(10), Decimal::from(1800), Decimal::from(1500))
///     .category("Cash")
///     .account("giro", "Giro account", "EUR", Decimal::from(200))
///     .build()?;
/// assert_eq!(statement.categories().count(), 2);
/// # Ok::<(), asset_statement::statement_error::StatementError>(())
/// ```
#[derive(Debug)]
pub struct StatementBuilder {
    currency: CurrencyCode,
    categories: Vec<CategoryDraft>,
}

impl StatementBuilder {
    pub fn new(currency: impl Into<CurrencyCode>) -> Self {
        Self {
            currency: currency.into(),
            categories: Vec::new(),
        }
    }

    /// Open a new category; subsequent positions belong to it.
    pub fn category(mut self, name: impl Into<String>) -> Self {
        self.categories.push(CategoryDraft {
            name: name.into(),
            positions: Vec::new(),
        });
        self
    }

    /// Add a security holding.
    pub fn security(
        self,
        id: impl Into<SecurityId>,
        name: impl Into<String>,
        currency: impl Into<CurrencyCode>,
        shares: Decimal,
        valuation: Decimal,
        purchase_value: Decimal,
    ) -> Self {
        self.push(PositionDraft {
            name: name.into(),
            vehicle: InvestmentVehicle::Security(id.into()),
            currency: currency.into(),
            shares: Some(shares),
            valuation,
            purchase_value,
            quote: None,
            vehicle_amounts: None,
        })
    }

    /// Add a cash balance. Its cost basis equals its valuation.
    pub fn account(
        self,
        id: impl Into<AccountId>,
        name: impl Into<String>,
        currency: impl Into<CurrencyCode>,
        balance: Decimal,
    ) -> Self {
        self.push(PositionDraft {
            name: name.into(),
            vehicle: InvestmentVehicle::Account(id.into()),
            currency: currency.into(),
            shares: None,
            valuation: balance,
            purchase_value: balance,
            quote: None,
            vehicle_amounts: None,
        })
    }

    /// Attach the latest quote, in the vehicle currency, to the last
    /// security added. Ignored for accounts.
    pub fn quoted(mut self, date: NaiveDate, price: Decimal) -> Self {
        if let Some(position) = self.last_position() {
            if position.vehicle.security().is_some() {
                let price = Money::new(position.currency.clone(), price);
                position.quote = Some(Quote::new(date, price));
            }
        }
        self
    }

    /// Record valuation and cost basis of the last position in its vehicle
    /// currency. Positions quoted in the statement currency get these from
    /// their statement amounts.
    pub fn in_vehicle_currency(mut self, valuation: Decimal, purchase_value: Decimal) -> Self {
        if let Some(position) = self.last_position() {
            position.vehicle_amounts = Some((valuation, purchase_value));
        }
        self
    }

    fn last_position(&mut self) -> Option<&mut PositionDraft> {
        self.categories.last_mut().and_then(|c| c.positions.last_mut())
    }

    fn push(mut self, position: PositionDraft) -> Self {
        if self.categories.is_empty() {
            self = self.category(UNASSIGNED_CATEGORY);
        }
        if let Some(category) = self.categories.last_mut() {
            category.positions.push(position);
        }
        self
    }

    /// Derive every aggregate and freeze the statement.
    ///
    /// # Errors
    /// [`StatementError::AmountOverflow`] if a sum or difference leaves the
    /// decimal range.
    pub fn build(self) -> Result<InMemoryStatement, StatementError> {
        let StatementBuilder { currency, categories } = self;
        let money = |amount: Decimal| Money::new(currency.clone(), amount);

        let all = || categories.iter().flat_map(|c| c.positions.iter());
        let total_valuation = checked_sum(all().map(|p| p.valuation), "grand total valuation")?;
        let total_purchase = checked_sum(all().map(|p| p.purchase_value), "grand total purchase value")?;
        let total_profit = checked_diff(total_valuation, total_purchase, "grand total profit")?;
        let share_of = |valuation: Decimal| {
            valuation
                .checked_div(total_valuation)
                .unwrap_or(Decimal::ZERO)
        };

        let mut built = Vec::with_capacity(categories.len());
        for draft in categories {
            let valuation = checked_sum(draft.positions.iter().map(|p| p.valuation), &draft.name)?;
            let purchase_value = checked_sum(draft.positions.iter().map(|p| p.purchase_value), &draft.name)?;
            let profit_loss = checked_diff(valuation, purchase_value, &draft.name)?;

            let mut positions = Vec::with_capacity(draft.positions.len());
            for p in draft.positions {
                let profit = checked_diff(p.valuation, p.purchase_value, &p.name)?;
                let purchase_price = p
                    .shares
                    .and_then(|shares| p.purchase_value.checked_div(shares))
                    .map(money);
                let vehicle_amounts = match p.vehicle_amounts {
                    Some(amounts) => Some(amounts),
                    None if p.currency == currency => Some((p.valuation, p.purchase_value)),
                    None => None,
                };
                let (vehicle_valuation, vehicle_purchase_value) = match vehicle_amounts {
                    Some((v, c)) => (
                        Some(Money::new(p.currency.clone(), v)),
                        Some(Money::new(p.currency.clone(), c)),
                    ),
                    None => (None, None),
                };
                positions.push(Arc::new(AssetPosition {
                    share: share_of(p.valuation),
                    valuation: money(p.valuation),
                    purchase_value: money(p.purchase_value),
                    profit_loss: money(profit),
                    purchase_price,
                    vehicle_valuation,
                    vehicle_purchase_value,
                    quote: p.quote,
                    name: p.name,
                    vehicle: p.vehicle,
                    currency: p.currency,
                    shares: p.shares,
                }));
            }
            built.push(Arc::new(AssetCategory {
                name: draft.name,
                valuation: money(valuation),
                purchase_value: money(purchase_value),
                profit_loss: money(profit_loss),
                share: share_of(valuation),
                positions,
            }));
        }

        Ok(InMemoryStatement {
            total: Arc::new(StatementTotal {
                valuation: money(total_valuation),
                purchase_value: money(total_purchase),
                profit_loss: money(total_profit),
            }),
            categories: built,
        })
    }
}

fn checked_sum(amounts: impl Iterator<Item = Decimal>, node: &str) -> Result<Decimal, StatementError> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
        .ok_or_else(|| StatementError::AmountOverflow { node: node.to_string() })
}

fn checked_diff(a: Decimal, b: Decimal, node: &str) -> Result<Decimal, StatementError> {
    a.checked_sub(b)
        .ok_or_else(|| StatementError::AmountOverflow { node: node.to_string() })
}
