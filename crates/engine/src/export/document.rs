//! Fixed-layout report: what goes on which page.
//!
//! The layout is computed in millimetres on an A4 page and kept free of any
//! PDF detail so it can be inspected directly; [`super::pdf`] only draws it.
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::{
    Category, EngineError, Ledger, Money, ResultEngine,
    category::{AMOUNT_COLUMN, DATE_COLUMN, SERIAL_COLUMN},
    normalizer::{coerce_amount, value_kind},
    reporter::{self, Totals},
    row::DATE_FORMAT,
};

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 10.0;
pub const CONTENT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
const CONTENT_HEIGHT_MM: f32 = PAGE_HEIGHT_MM - 2.0 * MARGIN_MM;

/// SL, Date, label, Amount, Description.
const COLUMN_WIDTHS_MM: [f32; 5] = [20.0, 40.0, 50.0, 30.0, 50.0];
const ROW_HEIGHT_MM: f32 = 10.0;
const ELLIPSIS: &str = "...";

/// Presentation settings of the report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportOptions {
    pub title: String,
    /// Prefix of summary amounts, e.g. `Tk`.
    pub currency: String,
    /// Labels and descriptions longer than this many characters are cut.
    pub truncate_at: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: "Business Transaction Report".to_string(),
            currency: "Tk".to_string(),
            truncate_at: 20,
        }
    }
}

/// One table row, already rendered to display strings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportRow {
    pub serial: String,
    pub date: String,
    pub label: String,
    pub amount: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportTable {
    pub category: Category,
    pub rows: Vec<ReportRow>,
}

/// Everything the report shows, before layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportInput {
    pub date: NaiveDate,
    pub totals: Totals,
    pub tables: Vec<ReportTable>,
}

impl ReportInput {
    pub fn from_ledger(ledger: &Ledger, date: NaiveDate) -> Self {
        let tables = ledger
            .all_categories()
            .into_iter()
            .map(|(category, rows)| ReportTable {
                category,
                rows: rows
                    .iter()
                    .map(|row| ReportRow {
                        serial: row.serial.to_string(),
                        date: row.formatted_date(),
                        label: row.label.clone(),
                        amount: row.amount.grouped(),
                        description: row.description.clone(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            date,
            totals: reporter::totals(ledger),
            tables,
        }
    }

    /// Builds the report from tables that did not go through the
    /// normalizer, in Purchase, Expense, Sale order.
    ///
    /// Cells are rendered as found. An amount that is not a number shows as
    /// `0.00` and counts as zero. A table that is not an array of records
    /// makes the whole export fail.
    pub fn from_raw(date: NaiveDate, tables: [&Value; 3]) -> ResultEngine<Self> {
        let mut totals = [Money::ZERO; 3];
        let mut report_tables = Vec::with_capacity(3);

        for ((category, raw), total) in Category::ALL.into_iter().zip(tables).zip(&mut totals) {
            let Value::Array(records) = raw else {
                return Err(EngineError::Export(format!(
                    "{} table is not a list of records (found {})",
                    category.as_str(),
                    value_kind(raw)
                )));
            };

            let mut rows = Vec::with_capacity(records.len());
            for (idx, record) in records.iter().enumerate() {
                let Value::Object(record) = record else {
                    return Err(EngineError::Export(format!(
                        "{} row {} is not a record (found {})",
                        category.as_str(),
                        idx + 1,
                        value_kind(record)
                    )));
                };
                let cell = |column: &str| record.get(column).map(display_cell).unwrap_or_default();
                let amount = match record.get(AMOUNT_COLUMN).and_then(coerce_amount) {
                    Some(amount) => amount,
                    None => {
                        tracing::warn!(
                            "{} row {}: amount not displayable, showing 0.00",
                            category.as_str(),
                            idx + 1
                        );
                        Money::ZERO
                    }
                };
                *total = total.saturating_add(amount);
                rows.push(ReportRow {
                    serial: cell(SERIAL_COLUMN),
                    date: cell(DATE_COLUMN),
                    label: cell(category.label_column()),
                    amount: amount.grouped(),
                    description: cell(category.description_column()),
                });
            }
            report_tables.push(ReportTable { category, rows });
        }

        let [purchase, expense, sales] = totals;
        Ok(Self {
            date,
            totals: Totals::from_totals(purchase, expense, sales),
            tables: report_tables,
        })
    }
}

fn display_cell(raw: &Value) -> String {
    match raw {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    Title,
    Text,
    Summary,
    Heading,
    TableHeader,
    TableRow,
    Footer,
    Gap,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub text: String,
    pub width_mm: f32,
    pub border: bool,
    pub align: Align,
}

impl Cell {
    fn plain(text: impl Into<String>, width_mm: f32) -> Self {
        Self {
            text: text.into(),
            width_mm,
            border: false,
            align: Align::Left,
        }
    }

    fn boxed(text: impl Into<String>, width_mm: f32) -> Self {
        Self {
            border: true,
            ..Self::plain(text, width_mm)
        }
    }
}

/// A horizontal band of cells.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub kind: LineKind,
    pub height_mm: f32,
    pub font_size: f32,
    pub bold: bool,
    pub cells: Vec<Cell>,
}

impl Line {
    fn new(kind: LineKind, height_mm: f32, font_size: f32, bold: bool, cells: Vec<Cell>) -> Self {
        Self {
            kind,
            height_mm,
            font_size,
            bold,
            cells,
        }
    }

    fn gap(height_mm: f32) -> Self {
        Self::new(LineKind::Gap, height_mm, 0.0, false, Vec::new())
    }

    /// Text of the cells, for inspection.
    pub fn texts(&self) -> Vec<&str> {
        self.cells.iter().map(|cell| cell.text.as_str()).collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<Line>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub pages: Vec<Page>,
}

impl Document {
    /// All lines of all pages, in order.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.pages.iter().flat_map(|page| page.lines.iter())
    }
}

/// Lays the report out over as many pages as needed.
pub fn layout(input: &ReportInput, options: &ReportOptions, generated_at: NaiveDateTime) -> Document {
    paginate(report_lines(input, options, generated_at))
}

fn report_lines(input: &ReportInput, options: &ReportOptions, generated_at: NaiveDateTime) -> Vec<Line> {
    let half = CONTENT_WIDTH_MM / 2.0;
    let money = |amount: Money| format!("{} {}", options.currency, amount.grouped());
    let totals = &input.totals;

    let mut lines = vec![
        Line::new(
            LineKind::Title,
            ROW_HEIGHT_MM,
            16.0,
            true,
            vec![Cell {
                align: Align::Center,
                ..Cell::boxed(options.title.clone(), CONTENT_WIDTH_MM)
            }],
        ),
        Line::gap(10.0),
        Line::new(
            LineKind::Text,
            ROW_HEIGHT_MM,
            12.0,
            true,
            vec![Cell::plain(
                format!("Date: {}", input.date.format(DATE_FORMAT)),
                CONTENT_WIDTH_MM,
            )],
        ),
        Line::gap(5.0),
        Line::new(
            LineKind::Summary,
            ROW_HEIGHT_MM,
            12.0,
            false,
            vec![
                Cell::boxed(format!("Total Purchase: {}", money(totals.purchase)), half),
                Cell::boxed(format!("Total Expense: {}", money(totals.expense)), half),
            ],
        ),
        Line::new(
            LineKind::Summary,
            ROW_HEIGHT_MM,
            12.0,
            false,
            vec![
                Cell::boxed(format!("Total Sales: {}", money(totals.sales)), half),
                Cell::boxed(format!("Today's Balance: {}", money(totals.balance)), half),
            ],
        ),
        Line::gap(10.0),
    ];

    for table in &input.tables {
        lines.push(Line::new(
            LineKind::Heading,
            ROW_HEIGHT_MM,
            12.0,
            true,
            vec![Cell::plain(table.category.table_title(), CONTENT_WIDTH_MM)],
        ));
        lines.push(table_line(
            LineKind::TableHeader,
            [
                SERIAL_COLUMN,
                DATE_COLUMN,
                table.category.label_column(),
                AMOUNT_COLUMN,
                "Description",
            ]
            .map(str::to_string),
        ));
        for row in &table.rows {
            lines.push(table_line(
                LineKind::TableRow,
                [
                    row.serial.clone(),
                    row.date.clone(),
                    truncate(&row.label, options.truncate_at),
                    row.amount.clone(),
                    truncate(&row.description, options.truncate_at),
                ],
            ));
        }
        lines.push(Line::gap(5.0));
    }

    lines.push(Line::new(
        LineKind::Footer,
        8.0,
        8.0,
        false,
        vec![Cell::plain(
            format!("Generated on {}", generated_at.format("%Y-%m-%d %H:%M:%S")),
            CONTENT_WIDTH_MM,
        )],
    ));

    lines
}

fn table_line(kind: LineKind, texts: [String; 5]) -> Line {
    let cells = texts
        .into_iter()
        .zip(COLUMN_WIDTHS_MM)
        .map(|(text, width)| Cell::boxed(text, width))
        .collect();
    Line::new(kind, ROW_HEIGHT_MM, 10.0, false, cells)
}

/// Distributes lines over pages. A table continuing on a new page repeats
/// its header; gaps are dropped at the top of a page.
fn paginate(lines: Vec<Line>) -> Document {
    let mut pages = vec![Page::default()];
    let mut used = 0.0f32;
    let mut table_header: Option<Line> = None;

    for line in lines {
        match line.kind {
            LineKind::Heading => table_header = None,
            LineKind::TableHeader => table_header = Some(line.clone()),
            _ => {}
        }

        if used + line.height_mm > CONTENT_HEIGHT_MM && used > 0.0 {
            pages.push(Page::default());
            used = 0.0;
            if line.kind == LineKind::Gap {
                continue;
            }
            if line.kind == LineKind::TableRow
                && let Some(header) = &table_header
            {
                used += header.height_mm;
                if let Some(page) = pages.last_mut() {
                    page.lines.push(header.clone());
                }
            }
        }

        used += line.height_mm;
        if let Some(page) = pages.last_mut() {
            page.lines.push(line);
        }
    }

    Document { pages }
}

/// Cuts `text` to at most `max` characters, ending with `...` when cut.
/// Widths too narrow for the ellipsis get a plain cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max < ELLIPSIS.len() {
        return text.chars().take(max).collect();
    }
    let mut cut: String = text.chars().take(max - ELLIPSIS.len()).collect();
    cut.push_str(ELLIPSIS);
    cut
}
