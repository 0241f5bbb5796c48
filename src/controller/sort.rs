//! Client-side ordering of the rows of the current page.
//!
//! Only the fetched page is reordered; rows on other pages are not taken
//! into account.

use std::fmt::Debug;

use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Comparable projection of a column value. Missing values sort first.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    Missing,
    Bool(bool),
    Number(i64),
    Text(String),
}

impl SortValue {
    /// Case-insensitive text key.
    pub fn text(value: &str) -> Self {
        SortValue::Text(value.trim().to_lowercase())
    }

    pub fn optional_text(value: Option<&str>) -> Self {
        value.map_or(SortValue::Missing, SortValue::text)
    }

    pub fn number(value: impl Into<i64>) -> Self {
        SortValue::Number(value.into())
    }

    pub fn optional_number<N: Into<i64>>(value: Option<N>) -> Self {
        value.map_or(SortValue::Missing, |v| SortValue::Number(v.into()))
    }
}

/// Rows that can be ordered by one of their columns.
pub trait Sortable {
    type Column: Copy + Debug + PartialEq + Eq;

    fn sort_value(&self, column: Self::Column) -> SortValue;
}

/// Active sort column and direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SortState<C> {
    pub column: C,
    pub direction: SortDirection,
}

/// Next sort state after a click on `column`'s header.
///
/// The same column flips direction; another column starts ascending.
pub fn toggle<C: PartialEq + Copy>(current: Option<SortState<C>>, column: C) -> SortState<C> {
    match current {
        Some(state) if state.column == column => SortState {
            column,
            direction: state.direction.reversed(),
        },
        _ => SortState {
            column,
            direction: SortDirection::Ascending,
        },
    }
}

/// Stable sort of `rows` by `state`.
pub fn sort_rows<E: Sortable>(rows: &mut [E], state: SortState<E::Column>) {
    rows.sort_by(|a, b| {
        let ordering = a
            .sort_value(state.column)
            .cmp(&b.sort_value(state.column));
        match state.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}
