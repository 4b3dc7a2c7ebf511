use std::path::PathBuf;

use datacure::data::{clean_with_progress, CleanOutcome, Dataset, Stage};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Pages reachable from the navigation panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    Data,
    ComingSoon,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Home, Page::Data, Page::ComingSoon];

    pub fn label(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Data => "Data",
            Page::ComingSoon => "Coming Soon",
        }
    }
}

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    pub page: Page,

    /// File the current dataset was loaded from.
    pub source_path: Option<PathBuf>,

    /// Dataset as loaded, before cleaning (None until user opens a file).
    pub original: Option<Dataset>,

    /// Result of cleaning `original`.
    pub outcome: Option<CleanOutcome>,

    /// Stages completed by the last cleaning pass, in order.
    pub completed_stages: Vec<Stage>,

    /// Per-column bar colours shared by both charts.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded dataset and clean it straight away.
    pub fn set_dataset(&mut self, path: PathBuf, dataset: Dataset) {
        self.color_map = Some(ColorMap::new(
            dataset.columns().iter().map(|c| c.name.as_str()),
        ));

        let mut stages = Vec::with_capacity(Stage::ALL.len());
        let outcome = clean_with_progress(dataset.clone(), |stage| stages.push(stage));

        self.completed_stages = stages;
        self.outcome = Some(outcome);
        self.original = Some(dataset);
        self.source_path = Some(path);
        self.status_message = None;
        self.page = Page::Data;
    }

    /// Record a failure without disturbing the currently loaded data.
    pub fn set_error(&mut self, err: &anyhow::Error) {
        self.status_message = Some(format!("Error processing the dataset: {err:#}"));
    }

    pub fn set_info(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
    }

    /// Progress of the last cleaning pass, 0.0 to 1.0.
    pub fn progress(&self) -> f32 {
        self.completed_stages
            .last()
            .map_or(0.0, |stage| stage.fraction())
    }

    pub fn is_cleaned(&self) -> bool {
        self.completed_stages.last() == Some(&Stage::Deduplicated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datacure::data::read_csv;

    #[test]
    fn loading_a_dataset_cleans_it() {
        let mut state = AppState::default();
        let ds = read_csv("name,score\nAlice,5\nBob,\nAlice,5\n".as_bytes()).unwrap();
        state.set_dataset(PathBuf::from("scores.csv"), ds);

        assert_eq!(state.page, Page::Data);
        assert!(state.is_cleaned());
        assert_eq!(state.progress(), 1.0);
        assert_eq!(state.original.as_ref().unwrap().len(), 3);
        assert_eq!(state.outcome.as_ref().unwrap().cleaned.len(), 2);
    }

    #[test]
    fn errors_keep_previous_data() {
        let mut state = AppState::default();
        let ds = read_csv("a\n1\n".as_bytes()).unwrap();
        state.set_dataset(PathBuf::from("a.csv"), ds);
        state.set_error(&anyhow::anyhow!("boom"));

        assert!(state.outcome.is_some());
        assert_eq!(
            state.status_message.as_deref(),
            Some("Error processing the dataset: boom")
        );
    }
}
