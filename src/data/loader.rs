//! CSV Data Loader Module
//! Reads the observation file into a Polars DataFrame.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Rows sampled when inferring column types.
const INFER_SCHEMA_ROWS: usize = 10000;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error(
        "CSV file not found: {}. Download it from Our World in Data (owid-covid-data.csv).",
        path.display()
    )]
    NotFound { path: PathBuf },
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
}

/// Loads observation files with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file, failing with `NotFound` before touching the reader
    /// when the path is absent. No schema checks happen here.
    pub fn load_csv(file_path: &Path) -> Result<DataFrame, LoaderError> {
        if !file_path.exists() {
            return Err(LoaderError::NotFound {
                path: file_path.to_path_buf(),
            });
        }

        debug!(path = %file_path.display(), "reading csv");
        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        info!(rows = df.height(), columns = df.width(), "loaded dataset");
        Ok(df)
    }
}
