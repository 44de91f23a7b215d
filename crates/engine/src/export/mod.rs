//! Serialization of a ledger snapshot: CSV per category and the paginated
//! PDF report.
//!
//! Everything here is a pure function of the rows (and date) it is given.
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::{Category, Ledger, ResultEngine};

pub mod csv;
pub mod document;
pub mod pdf;

pub use document::{ReportInput, ReportOptions};

/// CSV bytes of one category table.
pub fn category_csv(ledger: &Ledger, category: Category) -> ResultEngine<Vec<u8>> {
    csv::to_bytes(category, ledger.rows(category))
}

/// PDF bytes of the full report for `ledger`.
pub fn ledger_pdf(
    ledger: &Ledger,
    date: NaiveDate,
    options: &ReportOptions,
    generated_at: NaiveDateTime,
) -> ResultEngine<Vec<u8>> {
    report_pdf(&ReportInput::from_ledger(ledger, date), options, generated_at)
}

/// PDF bytes of the report for tables that bypassed the normalizer.
pub fn raw_pdf(
    tables: [&Value; 3],
    date: NaiveDate,
    options: &ReportOptions,
    generated_at: NaiveDateTime,
) -> ResultEngine<Vec<u8>> {
    report_pdf(&ReportInput::from_raw(date, tables)?, options, generated_at)
}

fn report_pdf(
    input: &ReportInput,
    options: &ReportOptions,
    generated_at: NaiveDateTime,
) -> ResultEngine<Vec<u8>> {
    let document = document::layout(input, options, generated_at);
    tracing::debug!(pages = document.pages.len(), "rendering report");
    pdf::render(&document, &options.title)
}
