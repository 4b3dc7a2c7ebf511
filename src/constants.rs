//! Application identity and layout constants.

/// Window title and heading.
pub const APP_NAME: &str = "DataCure – Advanced Dataset Cleaner";

/// Application version from Cargo.toml.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const FOOTER: &str = "Developed with DataCure | Optimized for user-friendly cleaning and analysis.";

/// Initial and minimum window sizes in logical points.
pub const WINDOW_SIZE: [f32; 2] = [1200.0, 800.0];
pub const MIN_WINDOW_SIZE: [f32; 2] = [600.0, 400.0];

/// Rows shown in the before/after table previews.
pub const PREVIEW_ROWS: usize = 5;

/// Height of the missing-value bar charts.
pub const CHART_HEIGHT: f32 = 220.0;
