//! Chart Viewer Widget
//! Draws a single line or bar chart with egui_plot.

use crate::charts::{BarChart, Chart, LineChart};
use crate::data::{date_to_days, days_to_date};
use egui::{Color32, RichText};
use egui_plot::{Bar as PlotBar, BarChart as PlotBarChart, Legend, Line, Plot, PlotPoints};

/// Color palette for entities
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219), // Blue
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

const BAR_WIDTH: f64 = 0.6;

pub struct ChartViewer;

impl ChartViewer {
    pub fn series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Draw the chart title and plot, filling the available space.
    pub fn show(ui: &mut egui::Ui, chart: &Chart) {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(chart.title()).strong().size(16.0));
        });

        match chart {
            Chart::Line(line) => Self::draw_line_chart(ui, line),
            Chart::Bar(bar) => Self::draw_bar_chart(ui, bar),
        }
    }

    /// Dates are plotted as days since the Unix epoch.
    fn draw_line_chart(ui: &mut egui::Ui, chart: &LineChart) {
        Plot::new(format!("line_{}", chart.title))
            .legend(Legend::default())
            .x_axis_label(chart.x_label.as_str())
            .y_axis_label(chart.y_label.as_str())
            .x_axis_formatter(|mark, _range| {
                days_to_date(mark.value.round() as i32)
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                for (i, series) in chart.series.iter().enumerate() {
                    let points: PlotPoints = series
                        .points
                        .iter()
                        .map(|(date, value)| [date_to_days(*date) as f64, *value])
                        .collect();

                    plot_ui.line(
                        Line::new(points)
                            .color(Self::series_color(i))
                            .width(1.5)
                            .name(&series.entity),
                    );
                }
            });
    }

    /// One bar per entity, labelled on the x axis.
    fn draw_bar_chart(ui: &mut egui::Ui, chart: &BarChart) {
        let x_labels: Vec<String> = chart.bars.iter().map(|b| b.entity.clone()).collect();

        let bars: Vec<PlotBar> = chart
            .bars
            .iter()
            .enumerate()
            .filter_map(|(i, bar)| {
                let value = bar.value?;
                Some(
                    PlotBar::new(i as f64, value)
                        .width(BAR_WIDTH)
                        .name(&bar.entity)
                        .fill(Self::series_color(0)),
                )
            })
            .collect();

        Plot::new(format!("bar_{}", chart.title))
            .y_axis_label(chart.y_label.as_str())
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if idx < 0.0 || (idx - mark.value).abs() > f64::EPSILON {
                    return String::new();
                }
                x_labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(PlotBarChart::new(bars).name(chart.y_label.as_str()));
            });
    }
}
