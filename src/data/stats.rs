use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use super::model::{Column, Table};
use crate::error::{Error, Result};

/// Descriptive statistics of one column, computed over non-NaN samples.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n − 1); NaN below two samples.
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

/// Per-column summary, or `None` for a table without rows.
pub fn summarize(table: &Table) -> Option<Vec<ColumnSummary>> {
    if table.is_empty() {
        return None;
    }
    Some(table.columns().iter().map(summarize_column).collect())
}

fn summarize_column(column: &Column) -> ColumnSummary {
    let mut sorted: Vec<f64> = column
        .values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .collect();
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let mean = if count == 0 {
        f64::NAN
    } else {
        sorted.iter().sum::<f64>() / count as f64
    };
    let std = if count < 2 {
        f64::NAN
    } else {
        let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    };

    ColumnSummary {
        name: column.name.clone(),
        count,
        mean,
        std,
        min: sorted.first().copied().unwrap_or(f64::NAN),
        q25: quantile(&sorted, 0.25),
        q50: quantile(&sorted, 0.50),
        q75: quantile(&sorted, 0.75),
        max: sorted.last().copied().unwrap_or(f64::NAN),
    }
}

/// Linear-interpolated quantile of already sorted values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
        }
    }
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

fn stat(summary: &[ColumnSummary], f: fn(&ColumnSummary) -> f64) -> ArrayRef {
    Arc::new(Float64Array::from(
        summary.iter().map(|s| round3(f(s))).collect::<Vec<_>>(),
    ))
}

/// Render the summary as a text table, one row per column, values rounded
/// to three decimals. `labels` replaces the column names as row labels.
pub fn format_summary(summary: &[ColumnSummary], labels: &[String]) -> Result<String> {
    if labels.len() != summary.len() {
        return Err(Error::LabelMismatch {
            expected: summary.len(),
            actual: labels.len(),
        });
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("variable", DataType::Utf8, false),
        Field::new("count", DataType::UInt64, false),
        Field::new("mean", DataType::Float64, false),
        Field::new("std", DataType::Float64, false),
        Field::new("min", DataType::Float64, false),
        Field::new("25%", DataType::Float64, false),
        Field::new("50%", DataType::Float64, false),
        Field::new("75%", DataType::Float64, false),
        Field::new("max", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(labels.to_vec())),
            Arc::new(UInt64Array::from(
                summary.iter().map(|s| s.count as u64).collect::<Vec<_>>(),
            )),
            stat(summary, |s| s.mean),
            stat(summary, |s| s.std),
            stat(summary, |s| s.min),
            stat(summary, |s| s.q25),
            stat(summary, |s| s.q50),
            stat(summary, |s| s.q75),
            stat(summary, |s| s.max),
        ],
    )?;

    Ok(pretty_format_batches(&[batch])?.to_string())
}
