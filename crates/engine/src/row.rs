//! The module contains `Row`, one line item of a category table, and
//! `UnifiedRow`, the category-tagged form used by the combined view.
use chrono::NaiveDate;
use serde::Serialize;

use crate::{Category, Money};

/// Date format used in tables, CSV files and reports.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One line item of a category table.
///
/// `label` holds the customer name for purchases and sales and the expense
/// type for expenses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Row {
    pub serial: u32,
    pub date: NaiveDate,
    pub label: String,
    pub amount: Money,
    pub description: String,
}

impl Row {
    pub fn new(
        serial: u32,
        date: NaiveDate,
        label: impl Into<String>,
        amount: Money,
        description: impl Into<String>,
    ) -> Self {
        Self {
            serial,
            date,
            label: label.into(),
            amount,
            description: description.into(),
        }
    }

    /// The row a category starts with, also used as the fallback template
    /// when input cannot be read as a table.
    pub fn seed(category: Category, date: NaiveDate) -> Self {
        match category {
            Category::Purchase | Category::Expense => Self::new(1, date, "", Money::ZERO, ""),
            Category::Sale => Self::new(1, date, "Starting Balance", Money::ZERO, "Opening Balance"),
        }
    }

    pub fn formatted_date(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// A row of the unified transaction view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UnifiedRow {
    pub serial: u32,
    pub date: NaiveDate,
    pub category: Category,
    pub label: String,
    pub amount: Money,
    pub description: String,
}

impl UnifiedRow {
    pub fn from_row(category: Category, row: &Row) -> Self {
        Self {
            serial: row.serial,
            date: row.date,
            category,
            label: row.label.clone(),
            amount: row.amount,
            description: row.description.clone(),
        }
    }
}
