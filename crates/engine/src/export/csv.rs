//! CSV layout shared by exports and the store: one file per category, a
//! header row with the category columns, then one record per row.
use std::io::{Read, Write};

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Writer};
use serde_json::{Map, Value};

use crate::{Category, EngineError, Money, ResultEngine, Row, row::DATE_FORMAT};

/// Writes `rows` of `category` as CSV, header included.
pub fn write_rows<W: Write>(category: Category, rows: &[Row], writer: W) -> ResultEngine<()> {
    let mut writer = Writer::from_writer(writer);
    writer.write_record(category.columns())?;
    for row in rows {
        writer.write_record([
            row.serial.to_string(),
            row.formatted_date(),
            row.label.clone(),
            row.amount.to_string(),
            row.description.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Serializes `rows` of `category` into an in-memory CSV file.
pub fn to_bytes(category: Category, rows: &[Row]) -> ResultEngine<Vec<u8>> {
    let mut data = Vec::new();
    write_rows(category, rows, &mut data)?;
    Ok(data)
}

/// Reads rows previously written by [`write_rows`].
///
/// Unlike the normalizer this is strict: a header that does not match the
/// category, or a field that does not parse, is an error.
pub fn read_rows<R: Read>(category: Category, reader: R) -> ResultEngine<Vec<Row>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = reader.headers()?.clone();
    let expected = category.columns();
    if headers.len() != expected.len()
        || headers
            .iter()
            .zip(expected)
            .any(|(found, expected)| found.trim() != expected)
    {
        return Err(EngineError::InvalidCsv(format!(
            "unexpected {} header: {}",
            category.as_str(),
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }

    reader
        .records()
        .enumerate()
        .map(|(idx, record)| parse_record(&record?, idx + 2))
        .collect()
}

fn parse_record(record: &StringRecord, line: usize) -> ResultEngine<Row> {
    let field = |idx: usize| record.get(idx).unwrap_or_default();

    let serial = field(0)
        .trim()
        .parse::<u32>()
        .map_err(|_| EngineError::InvalidCsv(format!("line {line}: invalid serial {}", field(0))))?;
    let date = NaiveDate::parse_from_str(field(1).trim(), DATE_FORMAT)
        .map_err(|_| EngineError::InvalidDate(format!("line {line}: {}", field(1))))?;
    let amount = field(3).parse::<Money>()?;

    Ok(Row {
        serial,
        date,
        label: field(2).to_string(),
        amount,
        description: field(4).to_string(),
    })
}

/// Reads an edited table as raw records for the normalizer: every cell
/// becomes a JSON string keyed by its header. Short records just miss keys.
pub fn read_raw<R: Read>(reader: R) -> ResultEngine<Value> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        let raw: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.clone(), Value::String(cell.to_string())))
            .collect();
        records.push(Value::Object(raw));
    }

    Ok(Value::Array(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
    }

    #[test]
    fn writes_header_and_rows() {
        let rows = vec![
            Row::new(1, date(), "Acme, Inc.", Money::new(123_456), "bolts \"M8\""),
            Row::new(1, date(), "", Money::new(-50), ""),
        ];

        let data = to_bytes(Category::Purchase, &rows).unwrap();

        assert_eq!(
            String::from_utf8(data).unwrap(),
            "SL,Date,Customer Name,Amount,Purchase Description\n\
             1,2024-05-17,\"Acme, Inc.\",1234.56,\"bolts \"\"M8\"\"\"\n\
             1,2024-05-17,,-0.50,\n"
        );
    }

    #[test]
    fn read_back_what_was_written() {
        let rows = vec![
            Row::new(2, date(), "Rent", Money::new(120_000), "May, office"),
            Row::new(9, date(), "  spaced  ", Money::ZERO, "line\nbreak"),
        ];

        let data = to_bytes(Category::Expense, &rows).unwrap();
        let parsed = read_rows(Category::Expense, data.as_slice()).unwrap();

        assert_eq!(parsed, rows);
    }

    #[test]
    fn header_of_another_category_is_rejected() {
        let data = to_bytes(Category::Sale, &[]).unwrap();

        let err = read_rows(Category::Expense, data.as_slice()).unwrap_err();

        assert!(matches!(err, EngineError::InvalidCsv(_)));
    }

    #[test]
    fn bad_amount_in_stored_file_is_an_error() {
        let data = "SL,Date,Customer Name,Amount,Sales Description\n1,2024-05-17,Acme,lots,\n";

        let err = read_rows(Category::Sale, data.as_bytes()).unwrap_err();

        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }

    #[test]
    fn raw_read_keeps_cells_as_strings() {
        let data = "SL,Customer Name,Amount\n1,Acme,abc\n2,Bolt\n";

        let raw = read_raw(data.as_bytes()).unwrap();

        assert_eq!(
            raw,
            serde_json::json!([
                {"SL": "1", "Customer Name": "Acme", "Amount": "abc"},
                {"SL": "2", "Customer Name": "Bolt"},
            ])
        );
    }
}
