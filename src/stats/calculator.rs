//! Statistics Calculator Module
//! Describes every column of a frame: numeric summaries, date ranges,
//! and value frequencies for everything else.

use crate::data::{date_to_days, date_values, f64_values, string_values};
use polars::prelude::*;
use rayon::prelude::*;
use statrs::statistics::Statistics;
use std::collections::HashMap;

/// How a column is summarized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    /// Statistics are held as days since the Unix epoch.
    Date,
    Categorical,
}

/// Descriptive statistics for a single column.
#[derive(Debug, Clone)]
pub struct ColumnSummary {
    pub column: String,
    pub kind: ColumnKind,
    pub count: usize,
    pub unique: Option<usize>,
    pub top: Option<String>,
    pub freq: Option<usize>,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

impl Default for ColumnSummary {
    fn default() -> Self {
        Self {
            column: String::new(),
            kind: ColumnKind::Numeric,
            count: 0,
            unique: None,
            top: None,
            freq: None,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            p25: f64::NAN,
            p50: f64::NAN,
            p75: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Handles statistical calculations with multi-threading support.
pub struct StatsCalculator;

impl StatsCalculator {
    pub fn column_kind(dtype: &DataType) -> ColumnKind {
        match dtype {
            DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => ColumnKind::Numeric,
            DataType::Date => ColumnKind::Date,
            _ => ColumnKind::Categorical,
        }
    }

    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> ColumnSummary {
        let n = values.len();
        if n == 0 {
            return ColumnSummary::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        ColumnSummary {
            count: n,
            mean: values.iter().mean(),
            // Sample deviation; NaN for a single value
            std: values.iter().std_dev(),
            min: sorted[0],
            p25: Self::percentile(&sorted, 25.0),
            p50: Self::percentile(&sorted, 50.0),
            p75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
            ..ColumnSummary::default()
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Count, distinct values and the most frequent value of a text column.
    ///
    /// Ties for the most frequent value go to the one seen first.
    pub fn compute_frequency_stats(values: &[String]) -> ColumnSummary {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();
        for value in values {
            let count = counts.entry(value.as_str()).or_insert(0);
            if *count == 0 {
                order.push(value.as_str());
            }
            *count += 1;
        }

        let mut top: Option<(&str, usize)> = None;
        for &value in &order {
            let count = counts[value];
            if top.map_or(true, |(_, best)| count > best) {
                top = Some((value, count));
            }
        }

        ColumnSummary {
            kind: ColumnKind::Categorical,
            count: values.len(),
            unique: Some(order.len()),
            top: top.map(|(value, _)| value.to_string()),
            freq: top.map(|(_, count)| count),
            ..ColumnSummary::default()
        }
    }

    /// Summarize one column according to its dtype.
    pub fn summarize_column(column: &Column) -> PolarsResult<ColumnSummary> {
        let kind = Self::column_kind(column.dtype());
        let mut summary = match kind {
            ColumnKind::Numeric => {
                let values: Vec<f64> = f64_values(column)?
                    .into_iter()
                    .flatten()
                    .filter(|v| !v.is_nan())
                    .collect();
                Self::compute_descriptive_stats(&values)
            }
            ColumnKind::Date => {
                let days: Vec<f64> = date_values(column)?
                    .into_iter()
                    .flatten()
                    .map(|d| date_to_days(d) as f64)
                    .collect();
                Self::compute_descriptive_stats(&days)
            }
            ColumnKind::Categorical => {
                let values: Vec<String> = string_values(column)?.into_iter().flatten().collect();
                Self::compute_frequency_stats(&values)
            }
        };

        if kind == ColumnKind::Date {
            // No deviation for dates
            summary.std = f64::NAN;
        }
        summary.kind = kind;
        summary.column = column.name().to_string();
        Ok(summary)
    }

    /// Summarize all columns in parallel, keeping column order.
    pub fn describe(df: &DataFrame) -> PolarsResult<Vec<ColumnSummary>> {
        df.get_columns()
            .par_iter()
            .map(Self::summarize_column)
            .collect()
    }

    /// Missing values per column, in column order.
    pub fn null_counts(df: &DataFrame) -> Vec<(String, usize)> {
        df.get_columns()
            .iter()
            .map(|col| (col.name().to_string(), col.null_count()))
            .collect()
    }
}
