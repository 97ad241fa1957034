//! Stats module - descriptive statistics

mod calculator;

pub use calculator::{ColumnKind, ColumnSummary, StatsCalculator};
