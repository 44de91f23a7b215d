//! Boundary between loosely typed table input and ledger rows.
//!
//! Input arrives as JSON (`serde_json::Value`) and is expected to be an array
//! of objects keyed by column header. Normalization never fails; it runs
//! three passes and reports what it repaired:
//!
//! 1. **structure**: keep only the category's recognized columns. Input that
//!    is not an array of objects is replaced by the category template.
//! 2. **amounts**: coerce the whole amount column; anything non-numeric
//!    becomes `0`.
//! 3. **date**: stamp every row with the selected date, discarding whatever
//!    date the row carried.
use core::fmt;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::{
    Category, Money, Row,
    category::{AMOUNT_COLUMN, DATE_COLUMN, SERIAL_COLUMN},
    row::DATE_FORMAT,
};

/// One record as received from the editing surface.
pub type RawRow = Map<String, Value>;

/// A problem the normalizer recovered from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NormalizeWarning {
    /// The input was not a sequence of records; the template row was used.
    NotTabular {
        category: Category,
        found: &'static str,
    },
    /// A non-numeric amount was replaced by `0`.
    AmountCoerced {
        category: Category,
        row: usize,
        raw: String,
    },
}

impl fmt::Display for NormalizeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotTabular { category, found } => write!(
                f,
                "{category} input is not a table ({found}); default row restored"
            ),
            Self::AmountCoerced { category, row, raw } => write!(
                f,
                "{category} row {row}: amount {raw} is not a number, using 0"
            ),
        }
    }
}

/// Output of [`normalize`]: repaired rows plus the warnings raised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Normalized {
    pub rows: Vec<Row>,
    pub warnings: Vec<NormalizeWarning>,
}

/// Normalizes `raw` into rows of `category`, using the category seed row
/// as the fallback template.
pub fn normalize(category: Category, raw: &Value, selected_date: NaiveDate) -> Normalized {
    let template = Row::seed(category, selected_date);
    normalize_with_template(category, raw, &template, selected_date)
}

/// Normalizes `raw` into rows of `category`.
///
/// The output has one row per input record, or exactly one copy of
/// `template` when `raw` is not an array of objects.
pub fn normalize_with_template(
    category: Category,
    raw: &Value,
    template: &Row,
    selected_date: NaiveDate,
) -> Normalized {
    let mut warnings = Vec::new();

    let mut rows = match clean_records(category, raw) {
        Ok(records) => coerce_amounts(category, records, template, &mut warnings),
        Err(found) => {
            warnings.push(NormalizeWarning::NotTabular { category, found });
            vec![template.clone()]
        }
    };
    stamp_date(&mut rows, selected_date);

    for warning in &warnings {
        tracing::warn!("{warning}");
    }

    Normalized { rows, warnings }
}

/// A structurally clean record. The amount is still raw.
#[derive(Debug)]
struct Record<'a> {
    serial: u32,
    date: Option<NaiveDate>,
    label: String,
    amount: Option<&'a Value>,
    description: String,
}

/// Structure pass. Returns the kind of the offending value when `raw` is
/// not an array of objects.
fn clean_records(category: Category, raw: &Value) -> Result<Vec<Record<'_>>, &'static str> {
    let Value::Array(items) = raw else {
        return Err(value_kind(raw));
    };

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::Object(record) => Ok(clean_record(category, idx, record)),
            other => Err(value_kind(other)),
        })
        .collect()
}

fn clean_record(category: Category, idx: usize, record: &RawRow) -> Record<'_> {
    Record {
        serial: record
            .get(SERIAL_COLUMN)
            .and_then(serial)
            .unwrap_or_else(|| position_serial(idx)),
        date: record.get(DATE_COLUMN).and_then(date),
        label: record.get(category.label_column()).map(text).unwrap_or_default(),
        amount: record.get(AMOUNT_COLUMN),
        description: record
            .get(category.description_column())
            .map(text)
            .unwrap_or_default(),
    }
}

/// Amount pass, over the whole column.
fn coerce_amounts(
    category: Category,
    records: Vec<Record<'_>>,
    template: &Row,
    warnings: &mut Vec<NormalizeWarning>,
) -> Vec<Row> {
    let amounts: Vec<Money> = records
        .iter()
        .enumerate()
        .map(|(idx, record)| match record.amount {
            None | Some(Value::Null) => Money::ZERO,
            Some(Value::String(s)) if s.trim().is_empty() => Money::ZERO,
            Some(raw) => coerce_amount(raw).unwrap_or_else(|| {
                warnings.push(NormalizeWarning::AmountCoerced {
                    category,
                    row: idx + 1,
                    raw: raw.to_string(),
                });
                Money::ZERO
            }),
        })
        .collect();

    records
        .into_iter()
        .zip(amounts)
        .map(|(record, amount)| Row {
            serial: record.serial,
            date: record.date.unwrap_or(template.date),
            label: record.label,
            amount,
            description: record.description,
        })
        .collect()
}

/// Date pass.
fn stamp_date(rows: &mut [Row], selected_date: NaiveDate) {
    for row in rows {
        row.date = selected_date;
    }
}

/// Converts a JSON number or numeric string to money.
///
/// Strings are parsed strictly first (`10,50` is ten and a half) and then as
/// a float, so `1e3` or `12.345` still yield a rounded value.
pub(crate) fn coerce_amount(raw: &Value) -> Option<Money> {
    match raw {
        Value::Number(number) => match number.as_i64() {
            Some(units) => units.checked_mul(100).map(Money::new),
            None => number.as_f64().and_then(Money::from_major_f64),
        },
        Value::String(s) => s.parse::<Money>().ok().or_else(|| {
            s.trim()
                .parse::<f64>()
                .ok()
                .and_then(Money::from_major_f64)
        }),
        _ => None,
    }
}

fn serial(raw: &Value) -> Option<u32> {
    let value = match raw {
        Value::Number(number) => match number.as_u64() {
            Some(value) => value,
            None => {
                let float = number.as_f64()?;
                if float.fract() != 0.0 || float < 0.0 {
                    return None;
                }
                float as u64
            }
        },
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(value).ok().filter(|serial| *serial >= 1)
}

fn position_serial(idx: usize) -> u32 {
    u32::try_from(idx + 1).unwrap_or(u32::MAX)
}

fn date(raw: &Value) -> Option<NaiveDate> {
    raw.as_str()
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok())
}

fn text(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => String::new(),
    }
}

pub(crate) fn value_kind(raw: &Value) -> &'static str {
    match raw {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
