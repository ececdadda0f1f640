use std::io;
use std::sync::Arc;
use std::time::Duration;

use console::Term;
use folio::http::reqwest_transport::ReqwestTransport;
use folio::{Orchestrator, ProfileClient, Subject, project_snapshot};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::config::{Config, ServiceOverrides};
use crate::progress::ProgressReporter;
use crate::render::{OutputFormat, render};

/// Build an orchestrator backed by the real HTTP transport.
pub(crate) fn build_orchestrator(
    config: &Config,
    overrides: &ServiceOverrides,
    token: CancellationToken,
) -> Result<Orchestrator<ReqwestTransport>, Box<dyn std::error::Error>> {
    let service = config.service_config(overrides)?;
    let transport = match config.timeout(overrides) {
        Some(timeout) => ReqwestTransport::with_timeout(timeout)?,
        None => ReqwestTransport::default(),
    };

    tracing::debug!(
        base_url = %service.base_url(),
        repo_limit = service.repo_limit(),
        "Using profile-data service"
    );

    Ok(Orchestrator::new(
        ProfileClient::new(service, Arc::new(transport)),
        token,
    ))
}

/// Fetch once and render the result.
///
/// Returns whether the portfolio loaded successfully.
pub(crate) async fn handle_show(
    orchestrator: &Orchestrator<ReqwestTransport>,
    subject: Subject,
    output: OutputFormat,
) -> Result<bool, Box<dyn std::error::Error>> {
    let reporter = ProgressReporter::new();
    let mut snapshots = orchestrator.subscribe();

    let activation = orchestrator.observe(subject);
    let id = activation.id();

    while let Some(snapshot) = snapshots.next().await {
        if !snapshot.belongs_to(id) {
            continue;
        }
        reporter.handle(&snapshot);

        if snapshot.state.is_terminal() {
            reporter.clear();
            let model = project_snapshot(&snapshot);
            render(&model, output, &mut io::stdout().lock())?;
            return Ok(model.error.is_none());
        }
    }

    reporter.clear();
    Err("interrupted before the portfolio finished loading".into())
}

/// Re-fetch every `every` and re-render each result until shutdown.
///
/// A refresh that fires while the previous fetch is still in flight supersedes it.
pub(crate) async fn handle_watch(
    orchestrator: &Orchestrator<ReqwestTransport>,
    subject: Subject,
    every: Duration,
    output: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let reporter = ProgressReporter::new();
    let term = Term::stdout();
    let mut snapshots = orchestrator.subscribe();

    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let activation = orchestrator.observe(subject.clone());
                tracing::debug!(activation = %activation.id(), "Refreshing portfolio");
            }
            snapshot = snapshots.next() => {
                let Some(snapshot) = snapshot else { break };
                reporter.handle(&snapshot);

                if snapshot.state.is_terminal() {
                    reporter.clear();
                    if term.is_term() && matches!(output, OutputFormat::Text) {
                        term.clear_screen()?;
                    }
                    render(&project_snapshot(&snapshot), output, &mut io::stdout().lock())?;
                }
            }
        }
    }

    reporter.clear();
    Ok(())
}
