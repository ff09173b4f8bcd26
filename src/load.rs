//! Reading input series from CSV.

use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use tracing::{debug, info};

use canteen_data::{Columns, StepDate, TimeSeries, Value};

use crate::config::SeriesToml;

/// Reads a CSV with one row per step into a time series.
///
/// The date column is parsed with `cfg.date_format`. Every other column
/// becomes an input named after its header and categorised by name (see
/// [`canteen_data::categorize`]). Empty cells are left out of that step.
/// When no column is a storage column, `cfg.initial_storage` is added as
/// `storage` on the first step.
pub fn read_series(path: &Path, cfg: &SeriesToml) -> Result<TimeSeries> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open series CSV: {}", path.display()))?;

    let headers = reader.headers().context("failed to read CSV header")?.clone();
    let Some(date_idx) = headers.iter().position(|h| h == cfg.date_column) else {
        bail!("date column {:?} not found in {}", cfg.date_column, path.display());
    };

    let mut dates = Vec::new();
    let mut columns = Columns::new();
    for (i, name) in headers.iter().enumerate() {
        if i != date_idx {
            columns.insert(name.to_string(), Vec::new());
        }
    }

    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("failed to read CSV row {}", row + 1))?;
        let raw_date = record.get(date_idx).unwrap_or_default();
        let date = NaiveDate::parse_from_str(raw_date, &cfg.date_format)
            .with_context(|| format!("row {}: cannot parse date {raw_date:?}", row + 1))?;
        dates.push(StepDate::Date(date));
        let cells = record
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != date_idx)
            .map(|(_, cell)| cell);
        for (cell, values) in cells.zip(columns.values_mut()) {
            values.push(parse_cell(cell));
        }
    }
    if dates.is_empty() {
        bail!("series CSV {} has no rows", path.display());
    }

    let has_storage = columns
        .keys()
        .any(|k| canteen_data::categorize(k) == canteen_data::Category::Storage);
    if !has_storage {
        if let Some(storage) = cfg.initial_storage {
            let mut column = vec![None; dates.len()];
            column[0] = Some(Value::Number(storage));
            columns.insert("storage".to_string(), column);
            debug!(storage, "initial storage taken from config");
        }
    }

    let n_rows = dates.len();
    let series = TimeSeries::from_columns(dates, columns)
        .with_context(|| format!("invalid series in {}", path.display()))?;
    info!(path = %path.display(), n_rows, "series loaded");
    Ok(series)
}

/// Numbers become numbers, `true`/`false` become flags, empty cells are
/// missing and anything else is text.
fn parse_cell(cell: &str) -> Option<Value> {
    if cell.is_empty() {
        return None;
    }
    if let Ok(x) = cell.parse::<f64>() {
        return Some(Value::Number(x));
    }
    match cell {
        "true" => Some(Value::Flag(true)),
        "false" => Some(Value::Flag(false)),
        _ => Some(Value::Text(cell.to_string())),
    }
}
