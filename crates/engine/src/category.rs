//! The three ledger categories and their column layout.
use core::fmt;

use serde::Serialize;

use crate::EngineError;

/// Column header for the serial number.
pub const SERIAL_COLUMN: &str = "SL";
/// Column header for the row date.
pub const DATE_COLUMN: &str = "Date";
/// Column header for the amount.
pub const AMOUNT_COLUMN: &str = "Amount";

/// Classifies a row and its sign in the balance.
///
/// The declaration order is the fixed iteration order used everywhere
/// (tables, unified view, exports).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Purchase,
    Expense,
    Sale,
}

impl Category {
    /// All categories in ledger order.
    pub const ALL: [Category; 3] = [Category::Purchase, Category::Expense, Category::Sale];

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Purchase => 0,
            Self::Expense => 1,
            Self::Sale => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Expense => "expense",
            Self::Sale => "sale",
        }
    }

    /// Name shown in the unified view.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Purchase => "Purchase",
            Self::Expense => "Expense",
            Self::Sale => "Sales",
        }
    }

    /// Heading of the category table in the report.
    pub fn table_title(self) -> &'static str {
        match self {
            Self::Purchase => "Purchases",
            Self::Expense => "Expenses",
            Self::Sale => "Sales",
        }
    }

    /// Header of the label column.
    pub fn label_column(self) -> &'static str {
        match self {
            Self::Purchase | Self::Sale => "Customer Name",
            Self::Expense => "Expense Type",
        }
    }

    /// Header of the description column.
    pub fn description_column(self) -> &'static str {
        match self {
            Self::Purchase => "Purchase Description",
            Self::Expense => "Expense Description",
            Self::Sale => "Sales Description",
        }
    }

    /// Columns in declaration order, as written in CSV headers.
    pub fn columns(self) -> [&'static str; 5] {
        [
            SERIAL_COLUMN,
            DATE_COLUMN,
            self.label_column(),
            AMOUNT_COLUMN,
            self.description_column(),
        ]
    }

    /// File name used by the CSV store.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Purchase => "purchase.csv",
            Self::Expense => "expense.csv",
            Self::Sale => "sales.csv",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl TryFrom<&str> for Category {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "purchase" | "purchases" => Ok(Self::Purchase),
            "expense" | "expenses" => Ok(Self::Expense),
            "sale" | "sales" => Ok(Self::Sale),
            other => Err(EngineError::KeyNotFound(other.to_string())),
        }
    }
}
