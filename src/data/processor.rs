//! Data Processor Module
//! Cleans the loaded observations: date parsing, entity filter, gap filling.

use super::{date_to_days, DATE_COL, LOCATION_COL};
use crate::config::FillScope;
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Layout of the `date` column in OWID exports.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp layouts accepted when a date carries a time of day.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Columns that identify a row and are never gap-filled.
const KEY_COLUMNS: [&str; 2] = [LOCATION_COL, DATE_COL];

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Handles data cleaning operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Parse dates, keep the allow-listed entities and fill gaps.
    ///
    /// The input frame is not modified. An allow-list that matches nothing
    /// yields an empty frame.
    pub fn clean(
        df: &DataFrame,
        entities: &[String],
        scope: FillScope,
    ) -> Result<DataFrame, ProcessorError> {
        let mut parsed = df.clone();
        let dates = Self::parse_dates(df.column(DATE_COL)?)?;
        parsed.with_column(dates)?;

        let filtered = Self::filter_entities(parsed, entities)?;
        debug!(
            rows_in = df.height(),
            rows_kept = filtered.height(),
            "filtered entities"
        );

        Self::fill_missing(&filtered, scope)
    }

    /// Convert the date column to `Date`. Values that do not parse become null.
    pub fn parse_dates(column: &Column) -> Result<Column, ProcessorError> {
        let text = column.as_materialized_series().cast(&DataType::String)?;
        let days: Int32Chunked = text
            .str()?
            .into_iter()
            .map(|v| v.and_then(Self::parse_date).map(date_to_days))
            .collect();

        let invalid = days.null_count().saturating_sub(column.null_count());
        if invalid > 0 {
            debug!(invalid, "unparseable dates set to null");
        }

        let dates = days.with_name(column.name().clone()).into_date();
        Ok(Column::from(dates.into_series()))
    }

    fn parse_date(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        NaiveDate::parse_from_str(raw, DATE_FORMAT).ok().or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
    }

    /// Keep rows whose location is one of `entities`, in their original order.
    pub fn filter_entities(
        df: DataFrame,
        entities: &[String],
    ) -> Result<DataFrame, ProcessorError> {
        let predicate = entities
            .iter()
            .map(|entity| col(LOCATION_COL).eq(lit(entity.as_str())))
            .reduce(|acc, next| acc.or(next))
            .unwrap_or_else(|| lit(false));

        let filtered = df.lazy().filter(predicate).collect()?;
        Ok(filtered)
    }

    /// Forward-fill then backward-fill every non-key column.
    pub fn fill_missing(df: &DataFrame, scope: FillScope) -> Result<DataFrame, ProcessorError> {
        let groups = match scope {
            FillScope::Entity => Self::group_ids(df.column(LOCATION_COL)?)?,
            FillScope::Frame => vec![0; df.height()],
        };

        let columns = df
            .get_columns()
            .iter()
            .map(|column| {
                if KEY_COLUMNS.contains(&column.name().as_str()) {
                    Ok(column.clone())
                } else {
                    Self::fill_column(column, &groups)
                }
            })
            .collect::<PolarsResult<Vec<Column>>>()?;

        Ok(DataFrame::new(columns)?)
    }

    fn fill_column(column: &Column, groups: &[usize]) -> PolarsResult<Column> {
        let series = column.as_materialized_series();
        let nulls = series.null_count();
        if nulls == 0 || nulls == series.len() {
            return Ok(column.clone());
        }

        let present: Vec<bool> = series
            .is_not_null()
            .into_iter()
            .map(|v| v.unwrap_or(false))
            .collect();

        let indices: IdxCa = Self::fill_sources(&present, groups)
            .into_iter()
            .map(|source| source.map(|i| i as IdxSize))
            .collect();

        Ok(Column::from(series.take(&indices)?))
    }

    /// For each row, the row whose value it should take.
    ///
    /// Present rows point at themselves. Missing rows point at the last
    /// present row before them in the same group, else the first present row
    /// after them, else nowhere.
    pub fn fill_sources(present: &[bool], groups: &[usize]) -> Vec<Option<usize>> {
        let mut sources: Vec<Option<usize>> = vec![None; present.len()];

        let mut last_seen: HashMap<usize, usize> = HashMap::new();
        for (i, &is_present) in present.iter().enumerate() {
            if is_present {
                last_seen.insert(groups[i], i);
                sources[i] = Some(i);
            } else {
                sources[i] = last_seen.get(&groups[i]).copied();
            }
        }

        let mut next_seen: HashMap<usize, usize> = HashMap::new();
        for (i, &is_present) in present.iter().enumerate().rev() {
            if is_present {
                next_seen.insert(groups[i], i);
            } else if sources[i].is_none() {
                sources[i] = next_seen.get(&groups[i]).copied();
            }
        }

        sources
    }

    /// Dense group id per row, numbered by first appearance of the location.
    fn group_ids(location: &Column) -> PolarsResult<Vec<usize>> {
        let text = location.as_materialized_series().cast(&DataType::String)?;
        let mut ids: HashMap<Option<&str>, usize> = HashMap::new();

        let groups = text
            .str()?
            .into_iter()
            .map(|name| {
                let next = ids.len();
                *ids.entry(name).or_insert(next)
            })
            .collect();

        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{date_values, f64_values, TOTAL_CASES_COL};

    fn entities(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn cases(df: &DataFrame) -> Vec<Option<f64>> {
        f64_values(df.column(TOTAL_CASES_COL).unwrap()).unwrap()
    }

    #[test]
    fn test_forward_fill_then_keep_later_value() {
        let df = df!(
            "location" => ["Kenya", "Kenya", "Kenya", "Kenya"],
            "date" => ["2021-01-01", "2021-01-02", "2021-01-03", "2021-01-04"],
            "total_cases" => [Some(5i64), None, None, Some(8)],
        )
        .unwrap();

        let out = DataProcessor::clean(&df, &entities(&["Kenya"]), FillScope::Entity).unwrap();
        assert_eq!(cases(&out), vec![Some(5.0), Some(5.0), Some(5.0), Some(8.0)]);
    }

    #[test]
    fn test_leading_gap_takes_next_value() {
        let df = df!(
            "location" => ["India", "India", "India"],
            "date" => ["2021-01-01", "2021-01-02", "2021-01-03"],
            "total_cases" => [None, None, Some(3i64)],
        )
        .unwrap();

        let out = DataProcessor::clean(&df, &entities(&["India"]), FillScope::Entity).unwrap();
        assert_eq!(cases(&out), vec![Some(3.0), Some(3.0), Some(3.0)]);
    }

    #[test]
    fn test_fill_follows_row_order_not_date_order() {
        let df = df!(
            "location" => ["Kenya", "Kenya", "Kenya"],
            "date" => ["2021-01-03", "2021-01-01", "2021-01-02"],
            "total_cases" => [Some(30i64), Some(10), None],
        )
        .unwrap();

        let out = DataProcessor::clean(&df, &entities(&["Kenya"]), FillScope::Entity).unwrap();
        assert_eq!(cases(&out), vec![Some(30.0), Some(10.0), Some(10.0)]);
    }

    #[test]
    fn test_entity_scope_does_not_leak_between_entities() {
        let df = df!(
            "location" => ["Kenya", "Kenya", "India", "India"],
            "date" => ["2021-01-01", "2021-01-02", "2021-01-01", "2021-01-02"],
            "total_cases" => [Some(7i64), None, None, Some(40)],
        )
        .unwrap();

        let out = DataProcessor::clean(&df, &entities(&["Kenya", "India"]), FillScope::Entity)
            .unwrap();
        assert_eq!(cases(&out), vec![Some(7.0), Some(7.0), Some(40.0), Some(40.0)]);

        let out = DataProcessor::clean(&df, &entities(&["Kenya", "India"]), FillScope::Frame)
            .unwrap();
        assert_eq!(cases(&out), vec![Some(7.0), Some(7.0), Some(7.0), Some(40.0)]);
    }

    #[test]
    fn test_default_scope_fills_across_the_filtered_frame() {
        let df = df!(
            "location" => ["Kenya", "Kenya", "India", "India"],
            "date" => ["2021-01-01", "2021-01-02", "2021-01-01", "2021-01-02"],
            "total_cases" => [Some(7i64), None, None, Some(40)],
        )
        .unwrap();

        let scope = crate::config::TrackerConfig::default().fill_scope;
        let out = DataProcessor::clean(&df, &entities(&["Kenya", "India"]), scope).unwrap();
        assert_eq!(cases(&out), vec![Some(7.0), Some(7.0), Some(7.0), Some(40.0)]);
    }

    #[test]
    fn test_entity_without_values_stays_missing() {
        let df = df!(
            "location" => ["Kenya", "India", "India"],
            "date" => ["2021-01-01", "2021-01-01", "2021-01-02"],
            "people_fully_vaccinated_per_hundred" => [Some(1.5f64), None, None],
        )
        .unwrap();

        let out = DataProcessor::clean(&df, &entities(&["Kenya", "India"]), FillScope::Entity)
            .unwrap();
        let vacc = f64_values(out.column("people_fully_vaccinated_per_hundred").unwrap()).unwrap();
        assert_eq!(vacc, vec![Some(1.5), None, None]);
    }

    #[test]
    fn test_filter_keeps_only_allow_list() {
        let df = df!(
            "location" => ["Kenya", "France", "India", "France"],
            "date" => ["2021-01-01", "2021-01-01", "2021-01-01", "2021-01-02"],
            "total_cases" => [1i64, 2, 3, 4],
        )
        .unwrap();

        let out = DataProcessor::clean(&df, &entities(&["India", "Kenya"]), FillScope::Entity)
            .unwrap();
        let locations = crate::data::string_values(out.column("location").unwrap()).unwrap();
        assert_eq!(
            locations,
            vec![Some("Kenya".to_string()), Some("India".to_string())]
        );
    }

    #[test]
    fn test_no_matching_entity_gives_empty_frame() {
        let df = df!(
            "location" => ["France", "Spain"],
            "date" => ["2021-01-01", "2021-01-01"],
            "total_cases" => [1i64, 2],
        )
        .unwrap();

        let out = DataProcessor::clean(&df, &entities(&["Kenya"]), FillScope::Entity).unwrap();
        assert_eq!(out.height(), 0);

        let out = DataProcessor::clean(&df, &[], FillScope::Entity).unwrap();
        assert_eq!(out.height(), 0);
    }

    #[test]
    fn test_bad_date_becomes_null_and_is_not_filled() {
        let df = df!(
            "location" => ["Kenya", "Kenya", "Kenya"],
            "date" => ["2021-01-01", "not a date", "2021-01-03"],
            "total_cases" => [1i64, 2, 3],
        )
        .unwrap();

        let out = DataProcessor::clean(&df, &entities(&["Kenya"]), FillScope::Entity).unwrap();
        let dates = date_values(out.column("date").unwrap()).unwrap();
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2021, 1, 1));
        assert_eq!(dates[1], None);
        assert_eq!(dates[2], NaiveDate::from_ymd_opt(2021, 1, 3));
        assert_eq!(out.height(), 3);
    }

    #[test]
    fn test_timestamped_dates_keep_their_day() {
        let df = df!(
            "location" => ["Kenya", "Kenya", "Kenya"],
            "date" => ["2021-01-05 00:00:00", "2021-01-06T12:30:00", "05/01/2021"],
            "total_cases" => [1i64, 2, 3],
        )
        .unwrap();

        let out = DataProcessor::clean(&df, &entities(&["Kenya"]), FillScope::Entity).unwrap();
        let dates = date_values(out.column("date").unwrap()).unwrap();
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2021, 1, 5));
        assert_eq!(dates[1], NaiveDate::from_ymd_opt(2021, 1, 6));
        assert_eq!(dates[2], None);
    }

    #[test]
    fn test_missing_location_column_is_an_error() {
        let df = df!(
            "date" => ["2021-01-01"],
            "total_cases" => [1i64],
        )
        .unwrap();

        assert!(DataProcessor::clean(&df, &entities(&["Kenya"]), FillScope::Entity).is_err());
    }

    #[test]
    fn test_fill_sources_scan() {
        let present = [false, true, false, false, true, false];
        let groups = [0, 0, 0, 1, 1, 1];
        assert_eq!(
            DataProcessor::fill_sources(&present, &groups),
            vec![Some(1), Some(1), Some(1), Some(4), Some(4), Some(4)]
        );

        let present = [false, false];
        assert_eq!(DataProcessor::fill_sources(&present, &[0, 0]), vec![None, None]);
    }
}
