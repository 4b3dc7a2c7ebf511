use anyhow::Context;
use eframe::egui::{self, Color32, RichText, Ui};

use datacure::data::export::{self, CLEANED_FILE_NAME, CSV_MIME, REPORT_FILE_NAME};
use datacure::data::load_file;

use crate::constants::{APP_VERSION, FOOTER};
use crate::state::{AppState, Page};

// ---------------------------------------------------------------------------
// Left side panel – navigation
// ---------------------------------------------------------------------------

/// Render the navigation panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Navigation");
    ui.separator();

    ui.label("Go to:");
    for page in Page::ALL {
        ui.radio_value(&mut state.page, page, page.label());
    }

    ui.separator();

    match (&state.source_path, &state.outcome) {
        (Some(path), Some(outcome)) => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui.strong(name);
            ui.label(format!("{} rows loaded", outcome.rows_before));
            ui.label(format!("{} missing values filled", outcome.before.total()));
            ui.label(format!("{} duplicate rows removed", outcome.duplicates_removed));
        }
        _ => {
            ui.label("No dataset loaded.");
        }
    }

    ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui: &mut Ui| {
        ui.label(RichText::new(format!("v{APP_VERSION}")).weak());
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let cleaned = state.outcome.is_some();
            if ui
                .add_enabled(cleaned, egui::Button::new("Save cleaned dataset…"))
                .clicked()
            {
                save_cleaned_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(cleaned, egui::Button::new("Save missing-value report…"))
                .clicked()
            {
                save_report_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(outcome) = &state.outcome {
            ui.label(format!(
                "{} rows in, {} rows after cleaning",
                outcome.rows_before,
                outcome.cleaned.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::GREEN
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

/// Render the footer line shown under every page.
pub fn footer(ui: &mut Ui) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(FOOTER).weak());
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Upload your dataset")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows with columns {:?}",
                    dataset.len(),
                    dataset.column_names()
                );
                state.set_dataset(path, dataset);
            }
            Err(e) => {
                let err = anyhow::Error::new(e).context(format!("loading {}", path.display()));
                log::error!("Failed to load file: {err:#}");
                state.set_error(&err);
            }
        }
    }
}

pub fn save_cleaned_dialog(state: &mut AppState) {
    let Some(outcome) = &state.outcome else {
        return;
    };

    let file = rfd::FileDialog::new()
        .set_title("Download cleaned dataset")
        .set_file_name(CLEANED_FILE_NAME)
        .add_filter(CSV_MIME, &["csv"])
        .save_file();

    if let Some(path) = file {
        match export::save_csv(&outcome.cleaned, &path) {
            Ok(()) => state.set_info(format!("Saved {}", path.display())),
            Err(e) => {
                log::error!("Failed to save cleaned dataset: {e:#}");
                state.set_error(&e);
            }
        }
    }
}

pub fn save_report_dialog(state: &mut AppState) {
    let Some(outcome) = &state.outcome else {
        return;
    };

    let file = rfd::FileDialog::new()
        .set_title("Save missing-value report")
        .set_file_name(REPORT_FILE_NAME)
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        let result = export::save_report_json(&outcome.before, &outcome.after, &path)
            .context("saving missing-value report");
        match result {
            Ok(()) => state.set_info(format!("Saved {}", path.display())),
            Err(e) => {
                log::error!("{e:#}");
                state.set_error(&e);
            }
        }
    }
}
