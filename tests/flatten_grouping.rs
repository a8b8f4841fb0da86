mod util;
use util::*;

use asset_statement::prelude::*;
use proptest::prelude::*;
use rust_decimal::Decimal;

#[test]
fn example_tree_flattens_depth_first() {
    let rows = flatten(Some(&two_categories()));
    assert_eq!(names(&rows), ["A", "P1", "P2", "B", "P3", "<total>"]);

    let order = |i: usize| rows[i].group_order();
    // category < its positions < next category
    assert!(order(0) < order(1));
    assert_eq!(order(1), order(2));
    assert!(order(2) < order(3));
    assert!(order(3) < order(4));
    // grand total strictly greatest
    assert!((0..5).all(|i| order(i) < order(5)));
}

#[test]
fn exactly_one_grand_total_last() {
    let rows = flatten(Some(&mixed()));
    let totals: Vec<_> = rows
        .iter()
        .enumerate()
        .filter(|(_, r)| r.is_grand_total())
        .map(|(i, _)| i)
        .collect();
    assert_eq!(totals, [rows.len() - 1]);
    assert_eq!(rows.grand_total().unwrap().valuation(), &eur(1730));
}

#[test]
fn empty_category_keeps_its_slot() {
    let rows = flatten(Some(&mixed()));
    assert_eq!(
        names(&rows),
        ["Equity", "Acme Corp", "Beta AG", "Cash", "Giro", "Empty", "Mixed", "Acme Corp", "<total>"]
    );
    let empty = index_of(&rows, "Empty");
    let mixed = index_of(&rows, "Mixed");
    // "Empty" consumed two group values even without positions
    assert_eq!(
        rows[mixed].group_order().get() - rows[empty].group_order().get(),
        2
    );
}

#[test]
fn row_kinds_are_exhaustive() {
    let rows = flatten(Some(&mixed()));
    let kinds: Vec<&str> = rows
        .iter()
        .map(|r| match r.kind() {
            RowKind::GrandTotal(_) => "total",
            RowKind::Category(_) => "category",
            RowKind::Position(_) if r.is_security() => "security",
            RowKind::Position(_) => "account",
        })
        .collect();
    assert_eq!(
        kinds,
        ["category", "security", "security", "category", "account", "category", "category", "security", "total"]
    );
    assert_eq!(rows.securities().count(), 3);
}

#[test]
fn absent_input_is_empty() {
    let rows = flatten::<InMemoryStatement>(None);
    assert!(rows.is_empty());
    assert_eq!(rows.groups().count(), 0);
}

#[test]
fn statement_without_categories_is_only_total() {
    let statement = InMemoryStatement::builder("EUR").build().unwrap();
    let rows = flatten(Some(&statement));
    assert_eq!(rows.len(), 1);
    assert!(rows[0].is_grand_total());
    assert_eq!(rows[0].share(), Decimal::ONE);
    assert!(rows.validate_invariants().is_ok());
}

fn statement_from(shape: &[Vec<i64>]) -> InMemoryStatement {
    let mut builder = InMemoryStatement::builder("EUR");
    for (c, values) in shape.iter().enumerate() {
        builder = builder.category(format!("C{c}"));
        for (p, value) in values.iter().enumerate() {
            builder = builder.security(
                format!("S{c}-{p}").as_str(),
                format!("C{c}/P{p}"),
                "EUR",
                Decimal::ONE,
                Decimal::from(*value),
                Decimal::ZERO,
            );
        }
    }
    builder.build().unwrap()
}

fn category_of(name: &str) -> &str {
    name.split('/').next().unwrap_or(name)
}

proptest! {
    #[test]
    fn prop_positions_stay_between_their_category_and_the_next(
        shape in prop::collection::vec(prop::collection::vec(-50i64..50, 0..5), 0..8),
    ) {
        let rows = flatten(Some(&statement_from(&shape)));
        prop_assert!(rows.validate_invariants().is_ok());
        prop_assert_eq!(rows.len(), shape.len() + shape.iter().map(Vec::len).sum::<usize>() + 1);
        prop_assert!(rows[rows.len() - 1].is_grand_total());

        // every position follows its own category without interruption
        let mut current = None;
        for row in rows.iter() {
            match row.kind() {
                RowKind::Category(_) => current = row.name().map(str::to_string),
                RowKind::Position(_) => {
                    prop_assert_eq!(current.as_deref(), Some(category_of(row.name().unwrap())));
                }
                RowKind::GrandTotal(_) => current = None,
            }
        }
    }
}
