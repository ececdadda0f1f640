//! Progress reporting while an activation is in flight.
//!
//! This module provides two modes of progress reporting:
//! - Interactive mode (TTY): a spinner using indicatif
//! - Logging mode (non-TTY): structured logging using tracing

mod interactive;
mod logging;

use console::Term;
use folio::Snapshot;

pub use interactive::InteractiveReporter;
pub use logging::LoggingReporter;

/// Progress reporter that handles both interactive and logging modes.
pub enum ProgressReporter {
    /// Interactive spinner for TTY.
    Interactive(InteractiveReporter),
    /// Structured logging for non-TTY (CI, pipes).
    Logging(LoggingReporter),
}

impl ProgressReporter {
    /// Create a new progress reporter, auto-detecting TTY mode.
    pub fn new() -> Self {
        if Term::stdout().is_term() {
            Self::Interactive(InteractiveReporter::new())
        } else {
            Self::Logging(LoggingReporter::new())
        }
    }

    /// Handle a published snapshot.
    pub fn handle(&self, snapshot: &Snapshot) {
        match self {
            Self::Interactive(r) => r.handle(snapshot),
            Self::Logging(r) => r.handle(snapshot),
        }
    }

    /// Clear any live output before the page is printed.
    pub fn clear(&self) {
        if let Self::Interactive(r) = self {
            r.clear();
        }
    }
}
