mod util;
use util::*;

use asset_statement::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn view(config: ViewConfig) -> StatementView<InMemoryStatement, FixedSnapshot> {
    let mut view = StatementView::new(FixedSnapshot::new(), config);
    view.set_input(Some(&mixed()), Some(client_context(day(2024, 6, 30))));
    view
}

#[test]
fn foreign_position_uses_direct_quote() {
    let view = view(ViewConfig::default());
    let acme = index_of(view.rows(), "Acme Corp");
    assert_eq!(view.exchange_rate(acme), Ok(Some(dec!(0.9))));
}

#[test]
fn term_currency_position_has_unit_rate() {
    let view = view(ViewConfig::default());
    let beta = index_of(view.rows(), "Beta AG");
    let giro = index_of(view.rows(), "Giro");
    assert_eq!(view.exchange_rate(beta), Ok(Some(Decimal::ONE)));
    assert_eq!(view.exchange_rate(giro), Ok(Some(Decimal::ONE)));
}

#[test]
fn indirect_quotation_inverts_the_rate() {
    let view = view(ViewConfig {
        use_indirect_quotation: true,
        ..ViewConfig::default()
    });
    let acme = index_of(view.rows(), "Acme Corp");
    let expected = Decimal::ONE / dec!(0.9);
    assert_eq!(view.exchange_rate(acme), Ok(Some(expected)));

    let beta = index_of(view.rows(), "Beta AG");
    assert_eq!(view.exchange_rate(beta), Ok(Some(Decimal::ONE)));
}

#[test]
fn aggregates_have_no_rate() {
    let view = view(ViewConfig::default());
    let equity = index_of(view.rows(), "Equity");
    let total = view.rows().len() - 1;
    assert_eq!(view.exchange_rate(equity), Ok(None));
    assert_eq!(view.exchange_rate(total), Ok(None));
}

#[test]
fn without_context_no_rate_is_shown() {
    let mut view = StatementView::new(FixedSnapshot::new(), ViewConfig::default());
    view.set_input(Some(&mixed()), None);
    let acme = index_of(view.rows(), "Acme Corp");
    assert_eq!(view.exchange_rate(acme), Ok(None));
}

#[test]
fn unknown_pair_is_an_error() {
    let statement = InMemoryStatement::builder("EUR")
        .category("Equity")
        .security("NESN", "Nestle", "CHF", Decimal::ONE, dec!(100), dec!(90))
        .build()
        .unwrap();
    let mut view = StatementView::new(FixedSnapshot::new(), ViewConfig::default());
    view.set_input(Some(&statement), Some(client_context(day(2024, 6, 30))));

    assert_eq!(
        view.exchange_rate(1),
        Err(StatementError::MissingExchangeRate {
            from: "CHF".into(),
            to: "EUR".into(),
            date: day(2024, 6, 30),
        })
    );
}

#[test]
fn zero_rate_cannot_be_inverted() {
    let rates = FixedRates::new().with("USD", "EUR", Decimal::ZERO);
    let converter = CurrencyConverter::new("EUR".into(), std::sync::Arc::new(rates));
    let mut view = StatementView::new(
        FixedSnapshot::new(),
        ViewConfig {
            use_indirect_quotation: true,
            ..ViewConfig::default()
        },
    );
    view.set_input(Some(&mixed()), Some(SnapshotContext::client(day(2024, 6, 30), converter)));
    let acme = index_of(view.rows(), "Acme Corp");
    assert!(matches!(
        view.exchange_rate(acme),
        Err(StatementError::DegenerateExchangeRate { .. })
    ));
}
