//! COVID-19 Tracker - load, clean, describe and chart OWID time series
//!
//! Reads `owid-covid-data.csv`, keeps a handful of countries, prints summary
//! statistics and shows four charts, one window at a time.

mod charts;
mod config;
mod data;
mod gui;
mod pipeline;
mod report;
mod stats;

use anyhow::Result;
use config::TrackerConfig;
use gui::WindowDisplay;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let config = TrackerConfig::default();
    let mut display = WindowDisplay;
    pipeline::run(&config, &mut display, &mut std::io::stdout())
}
