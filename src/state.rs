use std::path::PathBuf;

use versus::compare::{MetricOutcome, analyze};
use versus::config::ComparisonConfig;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Run parameters; the data directory may change at runtime.
    pub config: ComparisonConfig,

    /// One entry per requested metric, in config order.
    pub outcomes: Vec<MetricOutcome>,

    /// Index into `outcomes` of the chart on screen.
    pub selected: usize,

    /// Whether baseline reference lines are drawn.
    pub show_baselines: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Run the analysis once and keep the results.
    pub fn new(config: ComparisonConfig) -> Self {
        let mut state = Self {
            config,
            outcomes: Vec::new(),
            selected: 0,
            show_baselines: true,
            status_message: None,
        };
        state.reload();
        state
    }

    /// Re-read every dataset and rebuild all charts.
    pub fn reload(&mut self) {
        self.outcomes = analyze(&self.config);
        if self.selected >= self.outcomes.len() {
            self.selected = 0;
        }

        let failed = self.outcomes.iter().filter(|o| o.result.is_err()).count();
        self.status_message = (failed > 0).then(|| {
            format!("{failed} of {} charts failed", self.outcomes.len())
        });
        log::info!(
            "analysed {} metrics from {} ({failed} failed)",
            self.outcomes.len(),
            self.config.data_dir.display()
        );
    }

    /// Point the analysis at another directory and rebuild.
    pub fn set_data_dir(&mut self, dir: PathBuf) {
        self.config.data_dir = dir;
        self.reload();
    }

    /// The outcome currently on screen.
    pub fn current(&self) -> Option<&MetricOutcome> {
        self.outcomes.get(self.selected)
    }
}
