mod app;
mod color;
mod constants;
mod state;
mod ui;

use app::DataCureApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(constants::WINDOW_SIZE)
            .with_min_inner_size(constants::MIN_WINDOW_SIZE),
        ..Default::default()
    };

    eframe::run_native(
        constants::APP_NAME,
        options,
        Box::new(|_cc| Ok(Box::new(DataCureApp::default()))),
    )
}
