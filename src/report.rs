//! Exploratory Report
//! Prints a preview, per-column statistics and missing-value counts.

use crate::data::days_to_date;
use crate::stats::{ColumnKind, ColumnSummary, StatsCalculator};
use polars::prelude::*;
use std::io::{self, Write};
use thiserror::Error;

/// Rows shown in the preview.
pub const PREVIEW_ROWS: usize = 5;

/// Name of the statistic label column; empty so it cannot clash with a data column.
const LABEL_COLUMN: &str = "";

/// Significant digits shown for numeric statistics.
const SIGNIFICANT_DIGITS: i32 = 6;

const STAT_NAMES: [&str; 11] = [
    "count", "unique", "top", "freq", "mean", "std", "min", "25%", "50%", "75%", "max",
];

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    Io(#[from] io::Error),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

pub struct Reporter;

impl Reporter {
    /// Write the full exploratory report for a cleaned frame.
    pub fn report<W: Write>(df: &DataFrame, out: &mut W) -> Result<(), ReportError> {
        writeln!(out, "Rows: {}, Columns: {}", df.height(), df.width())?;

        writeln!(out, "Data Preview:")?;
        writeln!(out, "{}\n", df.head(Some(PREVIEW_ROWS)))?;

        let summaries = StatsCalculator::describe(df)?;
        writeln!(out, "Summary Statistics:")?;
        writeln!(out, "{}\n", Self::summary_table(&summaries)?)?;

        writeln!(out, "Missing values:")?;
        let counts = StatsCalculator::null_counts(df);
        let width = counts.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        for (name, count) in &counts {
            writeln!(out, "{:<width$}    {}", name, count, width = width)?;
        }
        writeln!(out)?;

        Ok(())
    }

    /// Lay the summaries out with one row per statistic and one column per
    /// input column.
    pub fn summary_table(summaries: &[ColumnSummary]) -> PolarsResult<DataFrame> {
        let mut columns = vec![Column::new(
            LABEL_COLUMN.into(),
            STAT_NAMES.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
        )];

        for summary in summaries {
            let cells: Vec<String> = STAT_NAMES
                .iter()
                .map(|stat| Self::cell(summary, stat))
                .collect();
            columns.push(Column::new(summary.column.as_str().into(), cells));
        }

        DataFrame::new(columns)
    }

    fn cell(summary: &ColumnSummary, stat: &str) -> String {
        match (stat, summary.kind) {
            ("count", _) => summary.count.to_string(),
            ("unique", ColumnKind::Categorical) => Self::optional(summary.unique),
            ("top", ColumnKind::Categorical) => {
                summary.top.clone().unwrap_or_else(|| "NaN".to_string())
            }
            ("freq", ColumnKind::Categorical) => Self::optional(summary.freq),
            (_, ColumnKind::Categorical) | ("unique" | "top" | "freq", _) => "NaN".to_string(),
            ("std", ColumnKind::Date) => "NaN".to_string(),
            (_, kind) => {
                let value = match stat {
                    "mean" => summary.mean,
                    "std" => summary.std,
                    "min" => summary.min,
                    "25%" => summary.p25,
                    "50%" => summary.p50,
                    "75%" => summary.p75,
                    _ => summary.max,
                };
                if kind == ColumnKind::Date {
                    Self::format_day(value)
                } else {
                    Self::format_number(value)
                }
            }
        }
    }

    fn optional(value: Option<usize>) -> String {
        value
            .map(|v| v.to_string())
            .unwrap_or_else(|| "NaN".to_string())
    }

    /// Six significant digits, switching to exponent form for very large or
    /// small magnitudes (`1.23457e+06`).
    fn format_number(value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value == 0.0 || value.is_infinite() {
            return format!("{}", value);
        }

        let exponent = value.abs().log10().floor() as i32;
        if exponent < -4 || exponent >= SIGNIFICANT_DIGITS {
            let text = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, value);
            let Some((mantissa, exp)) = text.split_once('e') else {
                return text;
            };
            let exp: i32 = exp.parse().unwrap_or(0);
            return format!("{}e{:+03}", Self::trim_zeros(mantissa), exp);
        }

        let decimals = (SIGNIFICANT_DIGITS - 1 - exponent).max(0) as usize;
        Self::trim_zeros(&format!("{:.*}", decimals, value)).to_string()
    }

    fn trim_zeros(text: &str) -> &str {
        if text.contains('.') {
            text.trim_end_matches('0').trim_end_matches('.')
        } else {
            text
        }
    }

    fn format_day(value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        days_to_date(value.round() as i32)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "NaN".to_string())
    }
}
