use std::sync::Mutex;
use std::time::Duration;

use folio::{FetchState, Snapshot};
use indicatif::{ProgressBar, ProgressStyle};

/// Interactive progress reporter using indicatif.
///
/// Shows a spinner for as long as the latest snapshot is `Loading`.
pub struct InteractiveReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl InteractiveReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    pub fn handle(&self, snapshot: &Snapshot) {
        let mut spinner = self.spinner.lock().unwrap_or_else(|e| e.into_inner());

        match &snapshot.state {
            FetchState::Loading => {
                let subject = snapshot
                    .subject
                    .as_ref()
                    .map(|s| s.as_str())
                    .unwrap_or_default();
                let bar = spinner.get_or_insert_with(|| {
                    let bar = ProgressBar::new_spinner();
                    bar.set_style(Self::spinner_style());
                    bar.enable_steady_tick(Duration::from_millis(100));
                    bar
                });
                bar.set_message(format!("Loading portfolio for {subject}…"));
            }
            FetchState::Idle | FetchState::Success { .. } | FetchState::Error { .. } => {
                if let Some(bar) = spinner.take() {
                    bar.finish_and_clear();
                }
            }
        }
    }

    pub fn clear(&self) {
        let mut spinner = self.spinner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(bar) = spinner.take() {
            bar.finish_and_clear();
        }
    }
}
