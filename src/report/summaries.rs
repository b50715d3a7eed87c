//! Column summaries computed over the dynamic `Cell` view of a table.

use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, Timelike};

use crate::features::stats;
use crate::models::fields::parse_timestamp;
use crate::models::{Cell, Record, Table};

pub const FRAUD_COLUMN: &str = "is_fraud";

pub fn column<R: Record>(table: &Table<R>, name: &str) -> Vec<Cell> {
    table.rows().iter().map(|row| row.cell(name)).collect()
}

/// One line of `describe.csv`; numeric statistics are empty for non-numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescription {
    pub column: String,
    pub count: usize,
    pub unique: Option<usize>,
    pub top: Option<String>,
    pub freq: Option<usize>,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub quartiles: Option<[f64; 3]>,
    pub max: Option<f64>
}

pub fn describe(column_name: &str, cells: &[Cell]) -> ColumnDescription {
    let present: Vec<&Cell> = cells.iter().filter(|cell| !cell.is_null()).collect();
    let numbers: Vec<f64> = present.iter().filter_map(|cell| cell.as_number()).collect();
    let mut description = ColumnDescription {
        column: column_name.to_string(),
        count: present.len(),
        unique: None,
        top: None,
        freq: None,
        mean: None,
        std: None,
        min: None,
        quartiles: None,
        max: None
    };

    if is_numeric(cells) {
        description.mean = Some(numbers.iter().sum::<f64>() / numbers.len() as f64);
        description.std = stats::sample_std(&numbers);
        description.min = numbers.iter().copied().reduce(f64::min);
        description.max = numbers.iter().copied().reduce(f64::max);
        description.quartiles = stats::quantile(&numbers, 0.25)
            .zip(stats::quantile(&numbers, 0.5))
            .zip(stats::quantile(&numbers, 0.75))
            .map(|((lower, middle), upper)| [lower, middle, upper]);
    } else {
        let counts = value_counts(present.iter().copied());
        description.unique = Some(counts.len());

        if let Some((value, count)) = counts.first() {
            description.top = Some(value.clone());
            description.freq = Some(*count);
        }
    }

    description
}

/// A column is numeric when it has at least one value and every present value is a number.
pub fn is_numeric(cells: &[Cell]) -> bool {
    let mut present = cells.iter().filter(|cell| !cell.is_null()).peekable();

    present.peek().is_some() && present.all(|cell| cell.as_number().is_some())
}

/// Pearson correlation over the rows where both cells are numbers.
///
/// `None` with fewer than two such rows or when either side is constant.
pub fn pearson(left: &[Cell], right: &[Cell]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = left.iter()
        .zip(right)
        .filter_map(|(left, right)| left.as_number().zip(right.as_number()))
        .collect();

    if pairs.len() < 2 {
        return None;
    }

    let count = pairs.len() as f64;
    let mean_left = pairs.iter().map(|(left, _)| left).sum::<f64>() / count;
    let mean_right = pairs.iter().map(|(_, right)| right).sum::<f64>() / count;

    let (covariance, variance_left, variance_right) = pairs.iter()
        .fold((0.0, 0.0, 0.0), |(covariance, variance_left, variance_right), (left, right)| {
            let (left, right) = (left - mean_left, right - mean_right);
            (covariance + left * right, variance_left + left * left, variance_right + right * right)
        });

    let denominator = (variance_left * variance_right).sqrt();

    if denominator == 0.0 {
        return None;
    }

    Some((covariance / denominator).clamp(-1.0, 1.0))
}

/// Row count per fraud label, ordered by label. Rows without a label are skipped.
pub fn class_balance(labels: &[Cell]) -> Vec<(String, usize)> {
    let mut counts = value_counts(labels.iter());
    counts.sort_by(|left, right| numeric_key(&left.0).total_cmp(&numeric_key(&right.0)));
    counts
}

/// Orders numeric keys by value and puts anything else last.
pub fn numeric_key(key: &str) -> f64 {
    key.parse::<f64>().unwrap_or(f64::MAX)
}

/// Occurrences per distinct non-missing value, most frequent first.
pub fn value_counts<'a>(cells: impl Iterator<Item = &'a Cell>) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    for cell in cells.filter(|cell| !cell.is_null()) {
        *counts.entry(cell.to_string()).or_default() += 1;
    }

    let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
    counts.sort_by(|left, right| right.1.cmp(&left.1));
    counts
}

pub fn distinct(cells: &[Cell]) -> usize {
    cells.iter()
        .filter(|cell| !cell.is_null())
        .map(|cell| cell.to_string())
        .collect::<HashSet<_>>()
        .len()
}

/// Fraud rate for one group of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRate {
    pub key: String,
    pub transactions: usize,
    pub fraud_rate: f64
}

/// Groups rows by `keys` and averages the fraud label per group. Rows with a missing key are skipped.
pub fn fraud_rate_by(keys: &[Cell], labels: &[Cell]) -> Vec<GroupRate> {
    let mut groups: BTreeMap<String, (usize, usize, f64)> = BTreeMap::new();

    for (key, label) in keys.iter().zip(labels) {
        if key.is_null() {
            continue;
        }

        let group = groups.entry(key.to_string()).or_default();
        group.0 += 1;

        if let Some(label) = label.as_number() {
            group.1 += 1;
            group.2 += label;
        }
    }

    groups.into_iter()
        .map(|(key, (transactions, labelled, frauds))| GroupRate {
            key,
            transactions,
            fraud_rate: if labelled == 0 { f64::NAN } else { frauds / labelled as f64 }
        })
        .collect()
}

pub fn mean(cells: &[Cell]) -> Option<f64> {
    let numbers: Vec<f64> = cells.iter().filter_map(Cell::as_number).collect();

    if numbers.is_empty() {
        return None;
    }

    Some(numbers.iter().sum::<f64>() / numbers.len() as f64)
}

/// The temporal key for `name`, taken from the table when declared and
/// otherwise derived from `timestamp`.
pub fn temporal_key<R: Record>(table: &Table<R>, name: &str) -> Vec<Cell> {
    if table.has_column(name) {
        return column(table, name);
    }

    column(table, "timestamp").iter()
        .map(|cell| match cell {
            Cell::Text(value) => parse_timestamp(value)
                .map(|timestamp| match name {
                    "hour" => timestamp.hour(),
                    _ => timestamp.weekday().num_days_from_monday()
                })
                .map_or(Cell::Null, |key| Cell::Number(f64::from(key))),
            _ => Cell::Null
        })
        .collect()
}
