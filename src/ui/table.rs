use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use datacure::data::Dataset;

/// Render the first `max_rows` rows of a dataset as a striped table.
pub fn dataset_preview(ui: &mut Ui, id: &str, dataset: &Dataset, max_rows: usize) {
    if dataset.width() == 0 {
        ui.label("The dataset has no columns.");
        return;
    }

    let n_rows = dataset.len().min(max_rows);

    ui.push_id(id, |ui: &mut Ui| {
        ScrollArea::horizontal()
            .id_salt(id)
            .show(ui, |ui: &mut Ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .vscroll(false)
                    .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                    .columns(TableColumn::auto().at_least(60.0), dataset.width())
                    .header(20.0, |mut header| {
                        for name in dataset.column_names() {
                            header.col(|ui: &mut Ui| {
                                ui.label(RichText::new(name).strong());
                            });
                        }
                    })
                    .body(|mut body| {
                        for row_idx in 0..n_rows {
                            body.row(18.0, |mut row| {
                                for value in dataset.row(row_idx) {
                                    row.col(|ui: &mut Ui| {
                                        ui.label(value.to_string());
                                    });
                                }
                            });
                        }
                    });
            });
    });

    ui.label(
        RichText::new(format!(
            "Showing {n_rows} of {} rows, {} columns",
            dataset.len(),
            dataset.width()
        ))
        .weak(),
    );
}
