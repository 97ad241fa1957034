//! Tracker pipeline: load, clean, describe, plot.

use crate::charts::{ChartPlotter, LINE_CHARTS};
use crate::config::TrackerConfig;
use crate::data::{DataLoader, DataProcessor};
use crate::gui::ChartDisplay;
use crate::report::Reporter;
use anyhow::Result;
use std::io::Write;
use tracing::info;

pub const CLOSING_MESSAGE: &str = "Analysis complete. Add your narrative insights here.";

/// Run every stage once. The first failing stage stops the run.
pub fn run<D, W>(config: &TrackerConfig, display: &mut D, out: &mut W) -> Result<()>
where
    D: ChartDisplay,
    W: Write,
{
    info!(path = %config.data_file.display(), "Loading data...");
    let raw = DataLoader::load_csv(&config.data_file)?;

    info!(entities = ?config.entities, "Cleaning data...");
    let df = DataProcessor::clean(&raw, &config.entities, config.fill_scope)?;

    info!("Running exploratory analysis...");
    Reporter::report(&df, out)?;

    info!("Generating plots...");
    for spec in &LINE_CHARTS {
        let chart = ChartPlotter::line_chart(&df, spec)?;
        display.show(&chart)?;
    }
    let top = ChartPlotter::top_n_chart(&df, config.top_n)?;
    display.show(&top)?;

    writeln!(out, "\n{}", CLOSING_MESSAGE)?;
    Ok(())
}
