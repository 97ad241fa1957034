//! Charts module - chart data building

mod plotter;

pub use plotter::{BarChart, Chart, ChartPlotter, LineChart, LINE_CHARTS};
