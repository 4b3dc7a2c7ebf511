use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};

use datacure::data::MissingValueReport;

use crate::color::ColorMap;
use crate::constants::CHART_HEIGHT;

// ---------------------------------------------------------------------------
// Missing-value bar chart
// ---------------------------------------------------------------------------

/// Render one bar per column showing its missing-cell count.
pub fn missing_values_chart(
    ui: &mut Ui,
    id: &str,
    report: &MissingValueReport,
    color_map: Option<&ColorMap>,
) {
    if report.columns.is_empty() {
        ui.label("No columns.");
        return;
    }

    // Keep the y axis visible when every count is zero.
    let y_max = report.max().max(1) as f64;

    Plot::new(id)
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .y_axis_label("Missing values")
        .show_x(false)
        .include_y(0.0)
        .include_y(y_max)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for (i, (column, missing)) in report.iter().enumerate() {
                let color = color_map
                    .map(|cm| cm.color_for(column))
                    .unwrap_or(eframe::egui::Color32::LIGHT_BLUE);

                let bar = Bar::new(i as f64, missing as f64)
                    .name(column)
                    .fill(color)
                    .width(0.6);

                plot_ui.bar_chart(BarChart::new(vec![bar]).name(column).color(color));
            }
        });
}
