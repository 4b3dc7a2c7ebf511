use eframe::egui::{self, Color32, RichText, Ui};

use crate::constants::{APP_NAME, PREVIEW_ROWS};
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// Home
// ---------------------------------------------------------------------------

pub fn home_page(ui: &mut Ui) {
    ui.heading(APP_NAME);
    ui.add_space(8.0);
    ui.label("Welcome to the Advanced Dataset Cleaner! This app allows you to:");
    for line in [
        "Upload your dataset in CSV format (JSON and Parquet also work).",
        "Clean the dataset by handling missing values, duplicates, and special characters.",
        "Standardize spaces and hyphens.",
        "Visualize the progress and download cleaned results.",
    ] {
        ui.label(format!("  •  {line}"));
    }
    ui.add_space(8.0);
    ui.strong("Let's make your data cleaner and better!");
}

// ---------------------------------------------------------------------------
// Data
// ---------------------------------------------------------------------------

/// The upload → preview → clean → download workflow.
pub fn data_page(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Clean and Analyze Your Dataset");
    ui.add_space(4.0);

    if ui.button("Upload your dataset (CSV)…").clicked() {
        panels::open_file_dialog(state);
    }
    ui.add_space(8.0);

    let (Some(original), Some(outcome)) = (&state.original, &state.outcome) else {
        ui.label("Please upload a CSV file to get started.");
        return;
    };

    ui.strong("Initial Dataset Preview");
    table::dataset_preview(ui, "initial_preview", original, PREVIEW_ROWS);
    ui.add_space(8.0);

    ui.strong("Missing Values Per Column (Before Cleaning)");
    plot::missing_values_chart(ui, "missing_before", &outcome.before, state.color_map.as_ref());
    ui.add_space(8.0);

    ui.strong("Cleaning Progress");
    ui.add(egui::ProgressBar::new(state.progress()).show_percentage());
    for stage in &state.completed_stages {
        ui.label(format!("  ✔  {}", stage.label()));
    }
    if state.is_cleaned() {
        ui.label(RichText::new("Cleaning Complete!").color(Color32::GREEN).strong());
    }
    ui.add_space(8.0);

    ui.strong("Missing Values Per Column (After Cleaning)");
    plot::missing_values_chart(ui, "missing_after", &outcome.after, state.color_map.as_ref());
    ui.add_space(8.0);

    ui.strong("Cleaned Dataset Preview");
    table::dataset_preview(ui, "cleaned_preview", &outcome.cleaned, PREVIEW_ROWS);
    ui.add_space(8.0);

    if ui.button("Download Cleaned Dataset").clicked() {
        panels::save_cleaned_dialog(state);
    }
}

// ---------------------------------------------------------------------------
// Coming soon
// ---------------------------------------------------------------------------

pub fn coming_soon_page(ui: &mut Ui) {
    ui.heading("Coming Soon");
    ui.add_space(8.0);
    ui.label("We're working hard to bring you new features, including:");
    for line in [
        "Advanced data visualization tools.",
        "Automated exploratory data analysis (EDA).",
        "Predictive modeling options.",
    ] {
        ui.label(format!("  •  {line}"));
    }
    ui.add_space(8.0);
    ui.strong("Stay tuned!");
}
