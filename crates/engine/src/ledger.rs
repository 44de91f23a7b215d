//! The in-memory set of the three category tables.
use chrono::NaiveDate;

use crate::{Category, Row};

/// Category tables indexed in ledger order.
///
/// The ledger trusts its input: rows are expected to come out of the
/// normalizer (or the store) and are swapped in wholesale, never merged.
/// Serial numbers are not required to be unique or contiguous.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ledger {
    tables: [Vec<Row>; 3],
}

impl Ledger {
    /// The session-start ledger: one seed row per category.
    pub fn seeded(date: NaiveDate) -> Self {
        Self {
            tables: Category::ALL.map(|category| vec![Row::seed(category, date)]),
        }
    }

    /// Replaces every row of `category`.
    pub fn replace(&mut self, category: Category, rows: Vec<Row>) {
        self.tables[category.index()] = rows;
    }

    pub fn rows(&self, category: Category) -> &[Row] {
        &self.tables[category.index()]
    }

    /// The three tables in Purchase, Expense, Sale order.
    pub fn all_categories(&self) -> [(Category, &[Row]); 3] {
        Category::ALL.map(|category| (category, self.rows(category)))
    }
}

#[cfg(test)]
mod tests {
    use crate::Money;

    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn seeded_has_one_row_per_category() {
        let ledger = Ledger::seeded(date());

        for (category, rows) in ledger.all_categories() {
            assert_eq!(rows, &[Row::seed(category, date())]);
            assert_eq!(rows[0].amount, Money::ZERO);
        }
        assert_eq!(ledger.rows(Category::Sale)[0].label, "Starting Balance");
        assert_eq!(ledger.rows(Category::Sale)[0].description, "Opening Balance");
    }

    #[test]
    fn replace_swaps_whole_table() {
        let mut ledger = Ledger::seeded(date());
        let rows = vec![
            Row::new(3, date(), "Acme", Money::new(100), "bolts"),
            Row::new(3, date(), "Acme", Money::new(200), "nuts"),
        ];

        ledger.replace(Category::Purchase, rows.clone());

        assert_eq!(ledger.rows(Category::Purchase), rows.as_slice());
        assert_eq!(ledger.rows(Category::Expense).len(), 1);
        assert_eq!(ledger.rows(Category::Sale).len(), 1);

        ledger.replace(Category::Purchase, Vec::new());
        assert!(ledger.rows(Category::Purchase).is_empty());
    }

    #[test]
    fn all_categories_in_fixed_order() {
        let ledger = Ledger::default();
        let order: Vec<Category> = ledger
            .all_categories()
            .iter()
            .map(|(category, _)| *category)
            .collect();

        assert_eq!(order, Category::ALL.to_vec());
        assert!(ledger.all_categories().iter().all(|(_, rows)| rows.is_empty()));
    }
}
