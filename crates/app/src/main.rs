use std::{
    fs::{self, File},
    io::{self, BufReader, Write},
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use engine::{Category, CsvStore, Engine, ReportOptions, export};
use serde_json::Value;

use error::{AppError, Result};
use settings::Settings;

mod error;
mod settings;

#[derive(Parser, Debug)]
#[command(name = "daybook")]
#[command(about = "Daily purchase, expense and sales book with PDF reports")]
struct Cli {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Date stamped on submitted rows and printed on reports (YYYY-MM-DD).
    /// Defaults to today.
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replace a category table with the records of a JSON or CSV file.
    Submit(SubmitArgs),
    /// Print the category totals and the balance.
    Totals(OutputArgs),
    /// Print every row of every category.
    View(OutputArgs),
    /// Write one category table as CSV.
    ExportCsv(ExportCsvArgs),
    /// Write the full report as PDF.
    ExportPdf(ExportPdfArgs),
}

#[derive(Args, Debug)]
struct SubmitArgs {
    #[arg(value_parser = parse_category)]
    category: Category,
    file: PathBuf,
}

#[derive(Args, Debug)]
struct OutputArgs {
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ExportCsvArgs {
    #[arg(value_parser = parse_category)]
    category: Category,
    /// Output file. Defaults to stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ExportPdfArgs {
    /// Output file. Defaults to `report_<date>.pdf`.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn parse_category(raw: &str) -> std::result::Result<Category, String> {
    Category::try_from(raw).map_err(|err| err.to_string())
}

fn parse_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Date(raw.to_string()).to_string())
}

fn main() {
    let cli = Cli::parse();

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "daybook={level},engine={level}",
            level = settings.app.level
        ))
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(cli, settings) {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli, settings: Settings) -> Result<()> {
    let date = cli.date.unwrap_or_else(|| Local::now().date_naive());
    let store = settings.store.dir.map(CsvStore::new);
    let options = ReportOptions::from(settings.report);

    let mut engine = Engine::builder()
        .selected_date(date)
        .store(store)
        .report_options(options)
        .build()?;

    match cli.command {
        Command::Submit(args) => submit(&mut engine, args, date),
        Command::Totals(args) => totals(&engine, args.json),
        Command::View(args) => view(&engine, args.json),
        Command::ExportCsv(args) => {
            let data = engine.export_csv(args.category)?;
            match args.out {
                Some(path) => write_file(&path, &data),
                None => Ok(io::stdout().lock().write_all(&data)?),
            }
        }
        Command::ExportPdf(args) => {
            let path = args
                .out
                .unwrap_or_else(|| PathBuf::from(format!("report_{}.pdf", date.format("%Y-%m-%d"))));
            export_pdf(&engine, &path, date)
        }
    }
}

fn submit(engine: &mut Engine, args: SubmitArgs, date: NaiveDate) -> Result<()> {
    let raw = read_table(&args.file)?;
    if engine.store().is_none() {
        tracing::warn!("no store.dir configured, the submitted table is not persisted");
    }

    let submission = engine.submit(args.category, &raw, date)?;
    println!(
        "{}: {} row(s) saved, {} warning(s)",
        args.category.table_title(),
        submission.rows,
        submission.warnings.len()
    );
    Ok(())
}

/// Raw records of a `.csv` file, or any JSON document otherwise.
fn read_table(path: &Path) -> Result<Value> {
    let reader = BufReader::new(File::open(path)?);
    let is_csv = path
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("csv"));

    if is_csv {
        Ok(export::csv::read_raw(reader)?)
    } else {
        Ok(serde_json::from_reader(reader)?)
    }
}

fn totals(engine: &Engine, json: bool) -> Result<()> {
    let totals = engine.totals();
    if json {
        println!("{}", serde_json::to_string_pretty(&totals)?);
        return Ok(());
    }

    let currency = &engine.report_options().currency;
    for category in Category::ALL {
        println!(
            "Total {}: {currency} {}",
            category.display_name(),
            totals.of(category).grouped()
        );
    }
    println!("Balance: {currency} {}", totals.balance.grouped());
    Ok(())
}

fn view(engine: &Engine, json: bool) -> Result<()> {
    let rows = engine.unified_view();
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let mut out = io::stdout().lock();
    writeln!(out, "Category\tSL\tDate\tName\tAmount\tDescription")?;
    for row in rows {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}",
            row.category, row.serial, row.date, row.label, row.amount, row.description
        )?;
    }
    Ok(())
}

/// Writes the PDF report, or the three category CSVs next to `path` when
/// the report cannot be produced.
fn export_pdf(engine: &Engine, path: &Path, date: NaiveDate) -> Result<()> {
    match engine.export_document(date) {
        Ok(data) => write_file(path, &data),
        Err(err) => {
            tracing::error!("report export failed, writing CSV tables instead: {err}");
            for category in Category::ALL {
                let data = engine.export_csv(category)?;
                write_file(&path.with_file_name(category.file_name()), &data)?;
            }
            Ok(())
        }
    }
}

fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, data)?;
    tracing::info!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_arguments() {
        let cli = Cli::try_parse_from([
            "daybook",
            "--date",
            "2024-05-17",
            "export-csv",
            "Sales",
            "--out",
            "out.csv",
        ])
        .unwrap();

        assert_eq!(cli.date, NaiveDate::from_ymd_opt(2024, 5, 17));
        let Command::ExportCsv(args) = cli.command else {
            panic!("unexpected command");
        };
        assert_eq!(args.category, Category::Sale);
        assert_eq!(args.out, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn rejects_unknown_category_and_bad_date() {
        assert!(Cli::try_parse_from(["daybook", "submit", "refunds", "x.json"]).is_err());
        assert!(Cli::try_parse_from(["daybook", "--date", "17/05/2024", "totals"]).is_err());
    }

    #[test]
    fn reads_csv_and_json_tables() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("sales.CSV");
        let json = dir.path().join("sales.json");
        fs::write(&csv, "SL,Amount\n1,10\n").unwrap();
        fs::write(&json, r#"[{"SL": 1, "Amount": 10}]"#).unwrap();

        assert_eq!(read_table(&csv).unwrap(), serde_json::json!([{"SL": "1", "Amount": "10"}]));
        assert_eq!(read_table(&json).unwrap(), serde_json::json!([{"SL": 1, "Amount": 10}]));
    }

    #[test]
    fn submit_then_export_files() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        let table = dir.path().join("purchase.json");
        fs::write(&table, r#"[{"Customer Name": "Acme", "Amount": "100"}]"#).unwrap();
        let mut engine = Engine::builder()
            .selected_date(date)
            .store(Some(CsvStore::new(dir.path().join("books"))))
            .build()
            .unwrap();

        submit(
            &mut engine,
            SubmitArgs {
                category: Category::Purchase,
                file: table,
            },
            date,
        )
        .unwrap();
        let report = dir.path().join("out/report.pdf");
        export_pdf(&engine, &report, date).unwrap();

        assert!(dir.path().join("books/purchase.csv").exists());
        assert!(fs::read(&report).unwrap().starts_with(b"%PDF"));
    }
}
