//! Chart Plotter Module
//! Turns the cleaned observations into chart data, one series per entity.

use crate::data::{
    date_values, f64_values, string_values, DATE_COL, FULLY_VACCINATED_COL, LOCATION_COL,
    TOTAL_CASES_COL, TOTAL_DEATHS_COL,
};
use chrono::NaiveDate;
use polars::prelude::*;
use std::cmp::Ordering;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// What a line chart plots and how it is labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSpec {
    pub metric: &'static str,
    pub title: &'static str,
    pub y_label: &'static str,
    /// An absent metric column gives an empty chart instead of an error
    pub optional: bool,
}

pub const CASES_CHART: ChartSpec = ChartSpec {
    metric: TOTAL_CASES_COL,
    title: "Total COVID-19 Cases Over Time",
    y_label: "Total Cases",
    optional: false,
};

pub const DEATHS_CHART: ChartSpec = ChartSpec {
    metric: TOTAL_DEATHS_COL,
    title: "Total COVID-19 Deaths Over Time",
    y_label: "Total Deaths",
    optional: false,
};

pub const VACCINATION_CHART: ChartSpec = ChartSpec {
    metric: FULLY_VACCINATED_COL,
    title: "Vaccination Progress (Fully Vaccinated % of Population)",
    y_label: "% Fully Vaccinated",
    optional: true,
};

/// Line charts in display order.
pub const LINE_CHARTS: [ChartSpec; 3] = [CASES_CHART, DEATHS_CHART, VACCINATION_CHART];

const DATE_LABEL: &str = "Date";

#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub entity: String,
    pub points: Vec<(NaiveDate, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<LineSeries>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub entity: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub y_label: String,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Line(LineChart),
    Bar(BarChart),
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Chart::Line(chart) => &chart.title,
            Chart::Bar(chart) => &chart.title,
        }
    }
}

/// Builds chart data from a cleaned frame.
pub struct ChartPlotter;

impl ChartPlotter {
    /// One line per entity, in order of first appearance.
    ///
    /// Points with a missing date or value are skipped, and an entity with no
    /// points gets no line.
    pub fn line_chart(df: &DataFrame, spec: &ChartSpec) -> Result<Chart, ChartError> {
        let mut chart = LineChart {
            title: spec.title.to_string(),
            x_label: DATE_LABEL.to_string(),
            y_label: spec.y_label.to_string(),
            series: Vec::new(),
        };

        let metric = match df.column(spec.metric) {
            Ok(column) => column,
            Err(_) if spec.optional => {
                debug!(metric = spec.metric, "optional metric absent, chart left empty");
                return Ok(Chart::Line(chart));
            }
            Err(e) => return Err(e.into()),
        };

        let locations = string_values(df.column(LOCATION_COL)?)?;
        let dates = date_values(df.column(DATE_COL)?)?;
        let values = f64_values(metric)?;

        let mut positions: HashMap<String, usize> = HashMap::new();
        for ((location, date), value) in locations.into_iter().zip(dates).zip(values) {
            let Some(entity) = location else {
                continue;
            };
            let idx = *positions.entry(entity.clone()).or_insert_with(|| {
                chart.series.push(LineSeries {
                    entity,
                    points: Vec::new(),
                });
                chart.series.len() - 1
            });

            if let (Some(date), Some(value)) = (date, value) {
                if !value.is_nan() {
                    chart.series[idx].points.push((date, value));
                }
            }
        }

        chart.series.retain(|s| {
            if s.points.is_empty() {
                debug!(entity = %s.entity, metric = spec.metric, "no values, line skipped");
            }
            !s.points.is_empty()
        });

        Ok(Chart::Line(chart))
    }

    /// Bars for the `top_n` rows with the most cases on the latest date.
    ///
    /// Ties keep row order; rows without a case count sort last.
    pub fn top_n_chart(df: &DataFrame, top_n: usize) -> Result<Chart, ChartError> {
        let cases = f64_values(df.column(TOTAL_CASES_COL)?)?;
        let dates = date_values(df.column(DATE_COL)?)?;
        let locations = string_values(df.column(LOCATION_COL)?)?;

        let latest = dates.iter().flatten().max().copied();
        let as_of = latest
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "n/a".to_string());

        let mut rows: Vec<Bar> = dates
            .iter()
            .zip(locations)
            .zip(cases)
            .filter(|((date, _), _)| latest.is_some() && **date == latest)
            .map(|((_, location), value)| Bar {
                entity: location.unwrap_or_default(),
                value: value.filter(|v| !v.is_nan()),
            })
            .collect();

        rows.sort_by(|a, b| Self::descending(a.value, b.value));
        rows.truncate(top_n);

        Ok(Chart::Bar(BarChart {
            title: format!(
                "Top {} Countries by Total Cases (as of {})",
                top_n, as_of
            ),
            y_label: "Total Cases".to_string(),
            bars: rows,
        }))
    }

    fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
        match (a, b) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}
