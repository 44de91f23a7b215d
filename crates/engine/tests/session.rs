use chrono::NaiveDate;
use serde_json::{Value, json};

use engine::{Category, CsvStore, Engine, EngineError, Money, NormalizeWarning, Row, Totals};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
}

fn engine() -> Engine {
    Engine::builder().selected_date(date()).build().unwrap()
}

fn record(serial: u64, label: &str, amount: Value) -> Value {
    json!({
        "SL": serial,
        "Date": "1999-01-01",
        "Customer Name": label,
        "Expense Type": label,
        "Amount": amount,
        "Purchase Description": "",
        "Expense Description": "",
        "Sales Description": "",
    })
}

#[test]
fn fresh_session_holds_the_seed_rows() {
    let engine = engine();

    assert_eq!(engine.unified_view().len(), 3);
    assert_eq!(engine.totals(), Totals::default());
    let sale = &engine.ledger().rows(Category::Sale)[0];
    assert_eq!(sale.label, "Starting Balance");
    assert_eq!(sale.description, "Opening Balance");
}

#[test]
fn scenario_totals_and_balance() {
    let mut engine = engine();

    engine
        .submit(Category::Purchase, &json!([record(1, "Acme", json!(100))]), date())
        .unwrap();
    engine
        .submit(Category::Expense, &json!([record(1, "Rent", json!("20"))]), date())
        .unwrap();
    engine
        .submit(Category::Sale, &json!([record(1, "Bolt", json!(150.0))]), date())
        .unwrap();

    let totals = engine.totals();
    assert_eq!(totals.purchase, Money::new(100_00));
    assert_eq!(totals.expense, Money::new(20_00));
    assert_eq!(totals.sales, Money::new(150_00));
    assert_eq!(totals.balance, Money::new(30_00));
}

#[test]
fn non_numeric_amount_contributes_zero() {
    let mut engine = engine();

    let submission = engine
        .submit(Category::Purchase, &json!([record(1, "Acme", json!("abc"))]), date())
        .unwrap();

    assert_eq!(engine.totals().purchase, Money::ZERO);
    assert_eq!(
        submission.warnings,
        vec![NormalizeWarning::AmountCoerced {
            category: Category::Purchase,
            row: 1,
            raw: "\"abc\"".to_string(),
        }]
    );
}

#[test]
fn bad_amount_among_good_rows_leaves_their_sum() {
    let mut engine = engine();

    let submission = engine
        .submit(
            Category::Purchase,
            &json!([
                record(1, "Acme", json!("abc")),
                record(2, "Bolt", json!(40)),
                record(3, "Cork", json!("12.50")),
            ]),
            date(),
        )
        .unwrap();

    assert_eq!(submission.rows, 3);
    assert_eq!(submission.warnings.len(), 1);
    assert_eq!(engine.totals().purchase, Money::new(52_50));
    assert_eq!(engine.totals().balance, Money::new(-52_50));
}

#[test]
fn extreme_amounts_clamp_the_balance() {
    let mut engine = engine();
    let huge = json!(90_000_000_000_000_000i64);

    let submission = engine
        .submit(Category::Purchase, &json!([record(1, "Acme", huge.clone())]), date())
        .unwrap();
    engine
        .submit(Category::Expense, &json!([record(1, "Rent", huge)]), date())
        .unwrap();

    assert!(submission.warnings.is_empty());
    let totals = engine.totals();
    assert_eq!(totals.purchase, Money::new(9_000_000_000_000_000_000));
    assert_eq!(totals.balance, Money::new(-i64::MAX));
}

#[test]
fn raw_document_export_survives_extreme_amounts() {
    let engine = engine();
    let huge = json!(90_000_000_000_000_000i64);
    let purchases = json!([record(1, "Acme", huge.clone()), record(2, "Bolt", huge)]);
    let empty = json!([]);

    let pdf = engine
        .export_document_from_raw(date(), [&purchases, &empty, &empty])
        .unwrap();

    assert!(pdf.starts_with(b"%PDF"));
}

#[test]
fn balance_can_be_negative() {
    let mut engine = engine();

    engine
        .submit(Category::Expense, &json!([record(1, "Rent", json!(75.5))]), date())
        .unwrap();

    assert_eq!(engine.totals().balance, Money::new(-75_50));
}

#[test]
fn resubmission_is_idempotent() {
    let mut engine = engine();
    let raw = json!([
        record(1, "Acme", json!("12.50")),
        record(2, "Bolt", json!(7)),
    ]);

    engine.submit(Category::Purchase, &raw, date()).unwrap();
    let view = engine.unified_view();
    let csv = engine.export_csv(Category::Purchase).unwrap();
    let totals = engine.totals();

    engine.submit(Category::Purchase, &raw, date()).unwrap();

    assert_eq!(engine.unified_view(), view);
    assert_eq!(engine.export_csv(Category::Purchase).unwrap(), csv);
    assert_eq!(engine.totals(), totals);
}

#[test]
fn submitted_rows_carry_the_selected_date() {
    let mut engine = engine();
    let later = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    engine
        .submit(
            Category::Expense,
            &json!([record(1, "Rent", json!(1)), record(2, "Power", json!(2))]),
            later,
        )
        .unwrap();

    assert!(
        engine
            .ledger()
            .rows(Category::Expense)
            .iter()
            .all(|row| row.date == later)
    );
    assert_eq!(engine.selected_date(), later);
}

#[test]
fn unified_view_orders_by_category() {
    let mut engine = engine();
    engine
        .submit(
            Category::Sale,
            &json!([record(1, "A", json!(1)), record(2, "B", json!(2))]),
            date(),
        )
        .unwrap();
    engine
        .submit(Category::Purchase, &json!([record(1, "P", json!(3))]), date())
        .unwrap();

    let view = engine.unified_view();

    let order: Vec<_> = view.iter().map(|row| (row.category, row.label.as_str())).collect();
    assert_eq!(
        order,
        vec![
            (Category::Purchase, "P"),
            (Category::Expense, ""),
            (Category::Sale, "A"),
            (Category::Sale, "B"),
        ]
    );
}

#[test]
fn structural_garbage_falls_back_to_the_seed() {
    let mut engine = engine();

    let submission = engine
        .submit(Category::Sale, &json!({"not": "a table"}), date())
        .unwrap();

    assert_eq!(submission.rows, 1);
    assert!(matches!(
        submission.warnings.as_slice(),
        [NormalizeWarning::NotTabular { category: Category::Sale, .. }]
    ));
    assert_eq!(engine.ledger().rows(Category::Sale)[0].label, "Starting Balance");
}

#[test]
fn store_persists_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvStore::new(dir.path().join("books"));

    let mut first = Engine::builder()
        .selected_date(date())
        .store(Some(store.clone()))
        .build()
        .unwrap();
    first
        .submit(Category::Sale, &json!([record(4, "Bolt", json!("99.99"))]), date())
        .unwrap();

    let second = Engine::builder()
        .selected_date(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap())
        .store(Some(store))
        .build()
        .unwrap();

    assert_eq!(second.ledger().rows(Category::Sale), first.ledger().rows(Category::Sale));
    assert_eq!(second.totals().sales, Money::new(99_99));
    // Categories never saved keep the seed of the new session.
    assert_eq!(
        second.ledger().rows(Category::Purchase)[0].date,
        NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()
    );
}

#[test]
fn failed_save_keeps_the_previous_table() {
    let dir = tempfile::tempdir().unwrap();
    let books = dir.path().join("books");
    let mut engine = Engine::builder()
        .selected_date(date())
        .store(Some(CsvStore::new(&books)))
        .build()
        .unwrap();
    engine
        .submit(Category::Purchase, &json!([record(1, "Acme", json!(5))]), date())
        .unwrap();
    let before = engine.ledger().clone();

    std::fs::remove_dir_all(&books).unwrap();
    std::fs::write(&books, b"in the way").unwrap();
    let result = engine.submit(Category::Purchase, &json!([record(1, "Bolt", json!(9))]), date());

    assert!(result.is_err());
    assert_eq!(engine.ledger(), &before);
}

#[test]
fn store_path_that_is_a_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books");
    std::fs::write(&path, b"").unwrap();

    let result = Engine::builder().store(Some(CsvStore::new(path))).build();

    assert!(matches!(result, Err(EngineError::Store(_))));
}

#[test]
fn corrupt_stored_table_keeps_the_seed() {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvStore::new(dir.path());
    std::fs::write(store.path(Category::Expense), "nonsense\n1\n").unwrap();

    let engine = Engine::builder()
        .selected_date(date())
        .store(Some(store))
        .build()
        .unwrap();

    assert_eq!(engine.ledger().rows(Category::Expense), &[Row::seed(Category::Expense, date())]);
}

#[test]
fn csv_export_round_trips_through_submit() {
    let mut engine = engine();
    engine
        .submit(
            Category::Expense,
            &json!([record(3, "Rent, May", json!("1200.5")), record(7, "Tea", json!(-2))]),
            date(),
        )
        .unwrap();
    let csv = engine.export_csv(Category::Expense).unwrap();

    let raw = engine::export::csv::read_raw(csv.as_slice()).unwrap();
    let mut other = self::engine();
    other.submit(Category::Expense, &raw, date()).unwrap();

    assert_eq!(
        other.ledger().rows(Category::Expense),
        engine.ledger().rows(Category::Expense)
    );
}

#[test]
fn document_export_produces_a_pdf() {
    let mut engine = engine();
    engine
        .submit(Category::Purchase, &json!([record(1, "Acme", json!(100))]), date())
        .unwrap();

    let pdf = engine.export_document(date()).unwrap();

    assert!(pdf.starts_with(b"%PDF"));
}

#[test]
fn raw_document_export_tolerates_bad_amounts() {
    let engine = engine();
    let purchases = json!([record(1, "Acme", json!("abc"))]);
    let empty = json!([]);

    let pdf = engine
        .export_document_from_raw(date(), [&purchases, &empty, &empty])
        .unwrap();

    assert!(pdf.starts_with(b"%PDF"));
}

#[test]
fn raw_document_export_rejects_non_tabular_tables() {
    let engine = engine();
    let purchases = json!([]);
    let expenses = json!("oops");

    let err = engine
        .export_document_from_raw(date(), [&purchases, &expenses, &purchases])
        .unwrap_err();

    assert!(matches!(err, EngineError::Export(_)));
}
