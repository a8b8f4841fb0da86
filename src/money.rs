//! Currency-tagged amounts and exchange-rate lookup.
//!
//! Amounts are [`Decimal`] to keep valuations exact. Conversion is not
//! performed here; the statement source delivers valuations already in the
//! statement currency. The converter only answers "what rate applies to this
//! position's currency on the reference date".

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::statement_error::StatementError;

/// ISO-4217 style currency code, e.g. `EUR`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        CurrencyCode(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(code: &str) -> Self {
        CurrencyCode::new(code)
    }
}

/// An amount tagged with its currency.
///
/// Ordering compares currency first and amount second, so sorting a column
/// of mixed-currency values groups by currency instead of comparing raw
/// numbers across currencies.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money {
    currency: CurrencyCode,
    amount: Decimal,
}

impl Money {
    pub fn new(currency: CurrencyCode, amount: Decimal) -> Self {
        Self { currency, amount }
    }

    pub fn zero(currency: CurrencyCode) -> Self {
        Self::new(currency, Decimal::ZERO)
    }

    #[inline]
    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    #[inline]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.currency, self.amount)
    }
}

/// Source of exchange rates, quoted as units of `term` per unit of `base`.
pub trait ExchangeRates {
    fn rate(&self, date: NaiveDate, base: &CurrencyCode, term: &CurrencyCode) -> Option<Decimal>;
}

impl<T: ExchangeRates + ?Sized> ExchangeRates for Arc<T> {
    #[inline]
    fn rate(&self, date: NaiveDate, base: &CurrencyCode, term: &CurrencyCode) -> Option<Decimal> {
        (**self).rate(date, base, term)
    }
}

/// Date-independent rate table.
///
/// A pair stored as `base/term` also answers `term/base` with the inverted
/// rate, unless that direction was stored explicitly.
#[derive(Clone, Debug, Default)]
pub struct FixedRates {
    rates: HashMap<(CurrencyCode, CurrencyCode), Decimal>,
}

impl FixedRates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `rate` units of `term` per unit of `base`. Returns the previous rate, if any.
    pub fn insert(&mut self, base: CurrencyCode, term: CurrencyCode, rate: Decimal) -> Option<Decimal> {
        self.rates.insert((base, term), rate)
    }

    pub fn with(mut self, base: &str, term: &str, rate: Decimal) -> Self {
        self.insert(base.into(), term.into(), rate);
        self
    }
}

impl ExchangeRates for FixedRates {
    fn rate(&self, _date: NaiveDate, base: &CurrencyCode, term: &CurrencyCode) -> Option<Decimal> {
        if let Some(rate) = self.rates.get(&(base.clone(), term.clone())) {
            return Some(*rate);
        }
        self.rates
            .get(&(term.clone(), base.clone()))
            .and_then(|rate| Decimal::ONE.checked_div(*rate))
    }
}

/// Term currency of a snapshot plus the rate source used to reach it.
#[derive(Clone)]
pub struct CurrencyConverter {
    term_currency: CurrencyCode,
    rates: Arc<dyn ExchangeRates + Send + Sync>,
}

impl CurrencyConverter {
    pub fn new(term_currency: CurrencyCode, rates: Arc<dyn ExchangeRates + Send + Sync>) -> Self {
        Self {
            term_currency,
            rates,
        }
    }

    /// Converter that only knows its own currency.
    pub fn identity(term_currency: CurrencyCode) -> Self {
        Self::new(term_currency, Arc::new(FixedRates::new()))
    }

    #[inline]
    pub fn term_currency(&self) -> &CurrencyCode {
        &self.term_currency
    }

    /// Rate from `base` into the term currency on `date`.
    ///
    /// # Errors
    /// [`StatementError::MissingExchangeRate`] when the rate source has no quote.
    pub fn rate(&self, date: NaiveDate, base: &CurrencyCode) -> Result<ExchangeRate, StatementError> {
        if *base == self.term_currency {
            return Ok(ExchangeRate::new(base.clone(), base.clone(), Decimal::ONE));
        }
        self.rates
            .rate(date, base, &self.term_currency)
            .map(|value| ExchangeRate::new(base.clone(), self.term_currency.clone(), value))
            .ok_or_else(|| StatementError::MissingExchangeRate {
                from: base.to_string(),
                to: self.term_currency.to_string(),
                date,
            })
    }
}

impl fmt::Debug for CurrencyConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurrencyConverter")
            .field("term_currency", &self.term_currency)
            .finish_non_exhaustive()
    }
}

/// A quote of `value` units of `term` per unit of `base`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExchangeRate {
    base: CurrencyCode,
    term: CurrencyCode,
    value: Decimal,
}

impl ExchangeRate {
    pub fn new(base: CurrencyCode, term: CurrencyCode, value: Decimal) -> Self {
        Self { base, term, value }
    }

    #[inline]
    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }

    pub fn term(&self) -> &CurrencyCode {
        &self.term
    }

    /// The same quote seen from the other side (indirect quotation).
    ///
    /// # Errors
    /// [`StatementError::DegenerateExchangeRate`] for a zero rate.
    pub fn inverse(&self) -> Result<ExchangeRate, StatementError> {
        Decimal::ONE
            .checked_div(self.value)
            .map(|value| ExchangeRate::new(self.term.clone(), self.base.clone(), value))
            .ok_or_else(|| StatementError::DegenerateExchangeRate {
                from: self.base.to_string(),
                to: self.term.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
    }

    #[test]
    fn same_currency_is_identity() {
        let conv = CurrencyConverter::identity("EUR".into());
        let rate = conv.rate(day(), &"EUR".into()).unwrap();
        assert_eq!(rate.value(), Decimal::ONE);
    }

    #[test]
    fn reverse_pair_is_inverted() {
        let rates = FixedRates::new().with("EUR", "USD", dec!(2));
        assert_eq!(rates.rate(day(), &"USD".into(), &"EUR".into()), Some(dec!(0.5)));
    }

    #[test]
    fn missing_rate_is_reported() {
        let conv = CurrencyConverter::identity("EUR".into());
        let err = conv.rate(day(), &"CHF".into()).unwrap_err();
        assert!(matches!(err, StatementError::MissingExchangeRate { .. }));
    }

    #[test]
    fn zero_rate_cannot_be_inverted() {
        let rate = ExchangeRate::new("USD".into(), "EUR".into(), Decimal::ZERO);
        assert!(matches!(
            rate.inverse(),
            Err(StatementError::DegenerateExchangeRate { .. })
        ));
    }

    #[test]
    fn negative_zero_is_not_negative() {
        let m = Money::new("EUR".into(), dec!(-0.00));
        assert!(!m.is_negative());
        assert!(Money::new("EUR".into(), dec!(-1)).is_negative());
    }
}
