//! Chart Window
//! One native window per chart; `run_native` blocks until it is closed.

use super::{ChartDisplay, ChartViewer, DisplayError};
use crate::charts::Chart;
use eframe::egui;
use tracing::debug;

const APP_NAME: &str = "COVID-19 Tracker";

/// Window size matching a 10x6 inch figure at 100 DPI.
const WINDOW_SIZE: [f32; 2] = [1000.0, 600.0];

/// Application state for a single chart window.
pub struct ChartWindow {
    chart: Chart,
}

impl ChartWindow {
    pub fn new(_cc: &eframe::CreationContext<'_>, chart: Chart) -> Self {
        Self { chart }
    }
}

impl eframe::App for ChartWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ChartViewer::show(ui, &self.chart);
        });
    }
}

/// Shows each chart in its own native window, one at a time.
#[derive(Default)]
pub struct WindowDisplay;

impl ChartDisplay for WindowDisplay {
    fn show(&mut self, chart: &Chart) -> Result<(), DisplayError> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size(WINDOW_SIZE)
                .with_title(chart.title()),
            ..Default::default()
        };

        debug!(title = chart.title(), "opening chart window");
        let chart = chart.clone();
        eframe::run_native(
            APP_NAME,
            options,
            Box::new(move |cc| Ok(Box::new(ChartWindow::new(cc, chart)))),
        )
        .map_err(|e| DisplayError::Window(e.to_string()))
    }
}
