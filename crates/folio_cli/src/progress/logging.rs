use folio::{FetchState, Snapshot};

/// Logging reporter using tracing for structured output.
pub struct LoggingReporter;

impl LoggingReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, snapshot: &Snapshot) {
        let activation = snapshot.activation.map(|id| id.0);
        let subject = snapshot
            .subject
            .as_ref()
            .map(|s| s.as_str())
            .unwrap_or_default();

        match &snapshot.state {
            FetchState::Idle => {
                tracing::debug!("Waiting for a subject");
            }
            FetchState::Loading => {
                tracing::info!(activation = ?activation, subject = %subject, "Loading portfolio");
            }
            FetchState::Success { repositories, .. } => {
                tracing::debug!(
                    activation = ?activation,
                    subject = %subject,
                    repositories = repositories.len(),
                    "Portfolio ready"
                );
            }
            FetchState::Error { message } => {
                tracing::debug!(activation = ?activation, subject = %subject, error = %message, "Portfolio failed");
            }
        }
    }
}
