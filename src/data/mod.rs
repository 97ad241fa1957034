//! Data module - CSV loading and cleaning

mod loader;
mod processor;

pub use loader::DataLoader;
#[cfg(test)]
pub use loader::LoaderError;
pub use processor::DataProcessor;

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

pub const LOCATION_COL: &str = "location";
pub const DATE_COL: &str = "date";
pub const TOTAL_CASES_COL: &str = "total_cases";
pub const TOTAL_DEATHS_COL: &str = "total_deaths";
pub const FULLY_VACCINATED_COL: &str = "people_fully_vaccinated_per_hundred";

/// Days from 0001-01-01 to 1970-01-01; Polars stores dates as days since the Unix epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

pub fn date_to_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

pub fn days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
}

/// Read a `Date` column as calendar dates, nulls preserved.
pub fn date_values(column: &Column) -> PolarsResult<Vec<Option<NaiveDate>>> {
    let days = column.as_materialized_series().cast(&DataType::Int32)?;
    Ok(days
        .i32()?
        .into_iter()
        .map(|d| d.and_then(days_to_date))
        .collect())
}

/// Read any numeric column as `f64`, nulls preserved.
pub fn f64_values(column: &Column) -> PolarsResult<Vec<Option<f64>>> {
    let values = column.as_materialized_series().cast(&DataType::Float64)?;
    Ok(values.f64()?.into_iter().collect())
}

/// Read a column as text, nulls preserved.
pub fn string_values(column: &Column) -> PolarsResult<Vec<Option<String>>> {
    let text = column.as_materialized_series().cast(&DataType::String)?;
    Ok(text
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect())
}
