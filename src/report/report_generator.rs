use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use csv::Writer;
use tracing::{debug, info};

use crate::models::{Cell, Record, Table};
use crate::report::summaries::{self, ColumnDescription, GroupRate, FRAUD_COLUMN};
use crate::report::ReportError;

const CATEGORY_COLUMNS: [&str; 5] = ["vendor_category", "country", "currency", "device", "channel"];
const TEMPORAL_COLUMNS: [&str; 2] = ["hour", "dayofweek"];
const TOP_N: usize = 10;
const SUMMARY_TOP_VENDOR_CATEGORIES: usize = 5;

/// Writes the exploratory-analysis artifacts for a table into a fresh,
/// timestamped folder under `reports_dir`.
pub struct ReportGenerator {
    reports_dir: PathBuf
}

impl ReportGenerator {
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            reports_dir: reports_dir.into()
        }
    }

    /// Produces every report artifact and returns the folder they were written to.
    ///
    /// Artifacts that depend on a column the table does not declare are skipped.
    pub fn run<R: Record>(&self, table: &Table<R>) -> Result<PathBuf, ReportError> {
        let out_dir = self.start_report_folder()?;
        info!("Writing EDA reports to {}", out_dir.display());

        write_dataset(table, &out_dir)?;
        write_basic_stats(table, &out_dir)?;
        write_fraud_stats(table, &out_dir)?;

        for column in CATEGORY_COLUMNS {
            if table.has_column(column) {
                write_top_categories(table, column, &out_dir)?;
            }
        }

        write_class_balance(table, &out_dir)?;
        write_correlation(table, &out_dir)?;
        write_temporal_patterns(table, &out_dir)?;
        write_summary(table, &out_dir)?;

        info!("EDA finished");

        Ok(out_dir)
    }

    fn start_report_folder(&self) -> Result<PathBuf, ReportError> {
        let out_dir = self.reports_dir.join(format!("EDA_{}", Utc::now().format("%Y%m%d_%H%M%S")));
        fs::create_dir_all(&out_dir).map_err(|error| ReportError::io(&out_dir, error))?;

        Ok(out_dir)
    }
}

fn create_writer(path: &Path) -> Result<Writer<fs::File>, ReportError> {
    Writer::from_path(path).map_err(|error| ReportError::csv(path, error))
}

fn write_rows<I, S>(path: &Path, rows: I) -> Result<(), ReportError>
where
    I: IntoIterator<Item = Vec<S>>,
    S: AsRef<[u8]>,
{
    let mut writer = create_writer(path)?;

    for row in rows {
        writer.write_record(row).map_err(|error| ReportError::csv(path, error))?;
    }

    writer.flush().map_err(|error| ReportError::io(path, error))
}

fn write_text(path: &Path, content: &str) -> Result<(), ReportError> {
    fs::write(path, content).map_err(|error| ReportError::io(path, error))
}

fn format_option<T: ToString>(value: Option<T>) -> String {
    value.map(|value| value.to_string()).unwrap_or_default()
}

fn write_dataset<R: Record>(table: &Table<R>, out_dir: &Path) -> Result<(), ReportError> {
    let header = std::iter::once(table.columns().to_vec());
    let rows = table.rows().iter()
        .map(|row| table.columns().iter().map(|column| row.cell(column).to_string()).collect::<Vec<String>>());

    write_rows(&out_dir.join("dataset.csv"), header.chain(rows))
}

fn description_record(description: &ColumnDescription) -> Vec<String> {
    let [lower, middle, upper] = description.quartiles.map_or([None; 3], |quartiles| quartiles.map(Some));

    vec![
        description.column.clone(),
        description.count.to_string(),
        format_option(description.unique),
        description.top.clone().unwrap_or_default(),
        format_option(description.freq),
        format_option(description.mean),
        format_option(description.std),
        format_option(description.min),
        format_option(lower),
        format_option(middle),
        format_option(upper),
        format_option(description.max)
    ]
}

fn write_basic_stats<R: Record>(table: &Table<R>, out_dir: &Path) -> Result<(), ReportError> {
    let header = ["column", "count", "unique", "top", "freq", "mean", "std", "min", "25%", "50%", "75%", "max"]
        .map(String::from)
        .to_vec();
    let mut missing = Vec::with_capacity(table.columns().len());
    let mut descriptions = vec![header];

    for column in table.columns() {
        let cells = summaries::column(table, column);
        missing.push((column.clone(), cells.iter().filter(|cell| cell.is_null()).count()));
        descriptions.push(description_record(&summaries::describe(column, &cells)));
    }

    write_rows(&out_dir.join("describe.csv"), descriptions)?;

    missing.sort_by(|left, right| right.1.cmp(&left.1));
    let missing = std::iter::once(vec!["column".to_string(), "missing".to_string()])
        .chain(missing.into_iter().map(|(column, count)| vec![column, count.to_string()]));

    write_rows(&out_dir.join("missing_values.csv"), missing)
}

fn write_fraud_stats<R: Record>(table: &Table<R>, out_dir: &Path) -> Result<(), ReportError> {
    let content = match summaries::mean(&summaries::column(table, FRAUD_COLUMN)) {
        Some(rate) => format!("Fraud rate: {:.4}%\nImbalance ratio: {:.2}\n", rate * 100.0, (1.0 - rate) / rate),
        None => "Fraud rate: n/a\nImbalance ratio: n/a\n".to_string()
    };

    write_text(&out_dir.join("fraud_stats.txt"), &content)
}

fn write_class_balance<R: Record>(table: &Table<R>, out_dir: &Path) -> Result<(), ReportError> {
    let counts = summaries::class_balance(&summaries::column(table, FRAUD_COLUMN));
    let rows = std::iter::once(vec![FRAUD_COLUMN.to_string(), "count".to_string()])
        .chain(counts.into_iter().map(|(label, count)| vec![label, count.to_string()]));

    write_rows(&out_dir.join("class_balance.csv"), rows)
}

/// Pairwise Pearson matrix over the numeric columns. Undefined pairs are left empty.
fn write_correlation<R: Record>(table: &Table<R>, out_dir: &Path) -> Result<(), ReportError> {
    let numeric: Vec<(&String, Vec<Cell>)> = table.columns().iter()
        .map(|column| (column, summaries::column(table, column)))
        .filter(|(_, cells)| summaries::is_numeric(cells))
        .collect();

    let header = std::iter::once("column".to_string())
        .chain(numeric.iter().map(|(column, _)| column.to_string()))
        .collect::<Vec<String>>();
    let rows = numeric.iter().map(|(column, cells)| {
        std::iter::once(column.to_string())
            .chain(numeric.iter().map(|(_, other)| format_option(summaries::pearson(cells, other))))
            .collect::<Vec<String>>()
    });

    debug!("Correlating {} numeric column(s)", numeric.len());

    write_rows(&out_dir.join("correlation.csv"), std::iter::once(header).chain(rows))
}

fn group_rows(rates: impl Iterator<Item = GroupRate>, key_name: &str) -> impl Iterator<Item = Vec<String>> {
    std::iter::once(vec![key_name.to_string(), "transactions".to_string(), "fraud_rate".to_string()])
        .chain(rates.map(|rate| vec![rate.key, rate.transactions.to_string(), rate.fraud_rate.to_string()]))
}

fn write_top_categories<R: Record>(table: &Table<R>, column: &str, out_dir: &Path) -> Result<(), ReportError> {
    let keys = summaries::column(table, column);
    let labels = summaries::column(table, FRAUD_COLUMN);
    let mut rates = summaries::fraud_rate_by(&keys, &labels);

    rates.sort_by(|left, right| right.transactions.cmp(&left.transactions));
    write_rows(&out_dir.join(format!("top_{column}.csv")), group_rows(rates.iter().take(TOP_N).cloned(), column))?;

    rates.sort_by(|left, right| right.fraud_rate.total_cmp(&left.fraud_rate));
    write_rows(&out_dir.join(format!("fraud_rate_top_{column}.csv")), group_rows(rates.into_iter().take(TOP_N), column))?;

    debug!("Wrote category breakdown for [{column}]");

    Ok(())
}

fn write_temporal_patterns<R: Record>(table: &Table<R>, out_dir: &Path) -> Result<(), ReportError> {
    let labels = summaries::column(table, FRAUD_COLUMN);

    for column in TEMPORAL_COLUMNS {
        let keys = summaries::temporal_key(table, column);
        let mut rates = summaries::fraud_rate_by(&keys, &labels);
        rates.sort_by(|left, right| summaries::numeric_key(&left.key).total_cmp(&summaries::numeric_key(&right.key)));

        write_rows(&out_dir.join(format!("fraud_by_{column}.csv")), group_rows(rates.into_iter(), column))?;
    }

    Ok(())
}

fn write_summary<R: Record>(table: &Table<R>, out_dir: &Path) -> Result<(), ReportError> {
    let fraud_rate = summaries::mean(&summaries::column(table, FRAUD_COLUMN));
    let vendor_categories = summaries::column(table, "vendor_category");
    let top_vendor_categories: Vec<String> = summaries::value_counts(vendor_categories.iter())
        .into_iter()
        .take(SUMMARY_TOP_VENDOR_CATEGORIES)
        .map(|(value, _)| value)
        .collect();

    let summary = [
        "# EDA Summary".to_string(),
        format!("Generated: {} UTC", Utc::now().format("%Y-%m-%d %H:%M:%S")),
        format!("- Transactions: {}", table.len()),
        format!("- Fraud share: {}", fraud_rate.map_or("n/a".to_string(), |rate| format!("{:.2}%", rate * 100.0))),
        format!("- Countries: {}", summaries::distinct(&summaries::column(table, "country"))),
        format!("- Currencies: {}", summaries::distinct(&summaries::column(table, "currency"))),
        format!("- Top vendor categories: {}", top_vendor_categories.join(", "))
    ];

    write_text(&out_dir.join("summary.md"), &summary.join("\n"))
}
