//! Aggregates derived from a ledger snapshot.
//!
//! Everything here is recomputed on each call from the ledger passed in.
use serde::Serialize;

use crate::{Category, Ledger, Money, UnifiedRow};

/// The summary figures of a ledger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub purchase: Money,
    pub expense: Money,
    pub sales: Money,
    pub balance: Money,
}

impl Totals {
    /// Builds the summary from the three category totals.
    pub fn from_totals(purchase: Money, expense: Money, sales: Money) -> Self {
        Self {
            purchase,
            expense,
            sales,
            balance: sales.saturating_sub(purchase.saturating_add(expense)),
        }
    }

    pub fn of(&self, category: Category) -> Money {
        match category {
            Category::Purchase => self.purchase,
            Category::Expense => self.expense,
            Category::Sale => self.sales,
        }
    }
}

/// Sum of the amounts of `category`. An empty table sums to zero.
pub fn total(ledger: &Ledger, category: Category) -> Money {
    ledger.rows(category).iter().map(|row| row.amount).sum()
}

/// `total(Sale) - (total(Purchase) + total(Expense))`, clamped to the `Money`
/// range. May be negative.
pub fn balance(ledger: &Ledger) -> Money {
    totals(ledger).balance
}

pub fn totals(ledger: &Ledger) -> Totals {
    Totals::from_totals(
        total(ledger, Category::Purchase),
        total(ledger, Category::Expense),
        total(ledger, Category::Sale),
    )
}

/// All rows tagged with their category: purchases, then expenses, then
/// sales, each in insertion order.
pub fn unified_view(ledger: &Ledger) -> Vec<UnifiedRow> {
    ledger
        .all_categories()
        .into_iter()
        .flat_map(|(category, rows)| rows.iter().map(move |row| UnifiedRow::from_row(category, row)))
        .collect()
}
