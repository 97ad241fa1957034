//! GUI module - chart display

mod app;
mod chart_viewer;

pub use app::WindowDisplay;
pub use chart_viewer::ChartViewer;

use crate::charts::Chart;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("Failed to open chart window: {0}")]
    Window(String),
}

/// Somewhere charts can be shown. `show` returns once the chart is dismissed.
pub trait ChartDisplay {
    fn show(&mut self, chart: &Chart) -> Result<(), DisplayError>;
}
