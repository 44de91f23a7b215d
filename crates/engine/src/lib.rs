use chrono::{Local, NaiveDate};
use serde_json::Value;

pub use category::Category;
pub use error::EngineError;
pub use export::ReportOptions;
pub use ledger::Ledger;
pub use money::Money;
pub use normalizer::{NormalizeWarning, Normalized, RawRow};
pub use reporter::Totals;
pub use row::{Row, UnifiedRow};
pub use store::CsvStore;

mod category;
mod error;
pub mod export;
mod ledger;
mod money;
pub mod normalizer;
pub mod reporter;
mod row;
mod store;

type ResultEngine<T> = Result<T, EngineError>;

/// One bookkeeping session: the three category tables, the date stamped on
/// submitted rows and the optional store they are persisted to.
#[derive(Debug)]
pub struct Engine {
    ledger: Ledger,
    selected_date: NaiveDate,
    store: Option<CsvStore>,
    report_options: ReportOptions,
}

/// Result of a successful submit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub category: Category,
    pub rows: usize,
    pub warnings: Vec<NormalizeWarning>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Replaces the table of `category` with the normalized `raw` records.
    ///
    /// Every stored row gets `selected_date`. When a store is configured the
    /// table is saved first; if that fails the ledger is left untouched.
    pub fn submit(
        &mut self,
        category: Category,
        raw: &Value,
        selected_date: NaiveDate,
    ) -> ResultEngine<Submission> {
        let Normalized { rows, warnings } = normalizer::normalize(category, raw, selected_date);

        if let Some(store) = &self.store {
            store.save(category, &rows)?;
        }

        tracing::debug!(
            category = category.as_str(),
            rows = rows.len(),
            warnings = warnings.len(),
            "table submitted"
        );
        let submission = Submission {
            category,
            rows: rows.len(),
            warnings,
        };
        self.ledger.replace(category, rows);
        self.selected_date = selected_date;
        Ok(submission)
    }

    pub fn totals(&self) -> Totals {
        reporter::totals(&self.ledger)
    }

    pub fn unified_view(&self) -> Vec<UnifiedRow> {
        reporter::unified_view(&self.ledger)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Date of the last submit, or the one the session was built with.
    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn store(&self) -> Option<&CsvStore> {
        self.store.as_ref()
    }

    pub fn report_options(&self) -> &ReportOptions {
        &self.report_options
    }

    /// CSV bytes of the `category` table.
    pub fn export_csv(&self, category: Category) -> ResultEngine<Vec<u8>> {
        tracing::debug!(category = category.as_str(), "exporting csv");
        export::category_csv(&self.ledger, category)
    }

    /// PDF bytes of the full report, generated now.
    pub fn export_document(&self, selected_date: NaiveDate) -> ResultEngine<Vec<u8>> {
        export::ledger_pdf(
            &self.ledger,
            selected_date,
            &self.report_options,
            Local::now().naive_local(),
        )
    }

    /// PDF bytes of the report for tables held outside the ledger, in
    /// purchase, expense, sale order.
    ///
    /// Unparseable amounts render as zero; a table that is not a list of
    /// records is an [`EngineError::Export`].
    pub fn export_document_from_raw(
        &self,
        selected_date: NaiveDate,
        tables: [&Value; 3],
    ) -> ResultEngine<Vec<u8>> {
        export::raw_pdf(
            tables,
            selected_date,
            &self.report_options,
            Local::now().naive_local(),
        )
    }
}

/// The builder for `Engine`
#[derive(Debug, Default)]
pub struct EngineBuilder {
    selected_date: Option<NaiveDate>,
    store: Option<CsvStore>,
    report_options: ReportOptions,
}

impl EngineBuilder {
    /// Date of the seed rows. Defaults to the local today.
    pub fn selected_date(mut self, selected_date: NaiveDate) -> EngineBuilder {
        self.selected_date = Some(selected_date);
        self
    }

    /// Where tables are persisted. `None` keeps the session in memory.
    pub fn store(mut self, store: Option<CsvStore>) -> EngineBuilder {
        self.store = store;
        self
    }

    pub fn report_options(mut self, report_options: ReportOptions) -> EngineBuilder {
        self.report_options = report_options;
        self
    }

    /// Construct `Engine`
    ///
    /// Categories found in the store replace their seed row. A category
    /// that fails to load is logged and keeps the seed.
    pub fn build(self) -> ResultEngine<Engine> {
        let selected_date = self
            .selected_date
            .unwrap_or_else(|| Local::now().date_naive());
        let mut ledger = Ledger::seeded(selected_date);

        if let Some(store) = &self.store {
            store.check()?;
            for category in Category::ALL {
                match store.load(category) {
                    Ok(Some(rows)) => ledger.replace(category, rows),
                    Ok(None) => {}
                    Err(err) => tracing::warn!(
                        category = category.as_str(),
                        "cannot load stored table: {err}"
                    ),
                }
            }
        }

        Ok(Engine {
            ledger,
            selected_date,
            store: self.store,
            report_options: self.report_options,
        })
    }
}
