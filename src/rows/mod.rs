//! Flattened statement rows: the row model, the flattening engine and
//! group-preserving comparators.

pub mod compare;
pub mod flatten;
pub mod row;

pub use compare::{SortDirection, grouped_comparator, sort_rows};
pub use flatten::{FlatRows, flatten};
pub use row::{GroupOrder, Row, RowKind};
