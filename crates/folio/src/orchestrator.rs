//! Fetch orchestration for one subject at a time.
//!
//! An [`Orchestrator`] owns a single [`FetchState`]. Every call to
//! [`Orchestrator::observe`] starts a new activation: the previous activation is
//! cancelled, `Loading` is published, and the profile and repository requests
//! run concurrently on a background task. When both settle the activation
//! publishes exactly one terminal snapshot, unless it was superseded or torn
//! down in the meantime, in which case its result is discarded.
//!
//! Cancellation is advisory. Requests are never aborted; each activation holds a
//! [`CancellationToken`] that is checked, under the state lock, right before
//! anything is published. Activation switching happens under the same lock, so a
//! stale result can never land after a newer `Loading`.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use folio::{Orchestrator, ProfileClient, ServiceConfig, Subject};
//! use folio::http::reqwest_transport::ReqwestTransport;
//! use tokio_util::sync::CancellationToken;
//!
//! let client = ProfileClient::new(ServiceConfig::default(), Arc::new(ReqwestTransport::default()));
//! let orchestrator = Orchestrator::new(client, CancellationToken::new());
//! let mut snapshots = orchestrator.subscribe();
//!
//! orchestrator.observe(Subject::new("alice")?);
//! while let Some(snapshot) = snapshots.next().await {
//!     let model = folio::project(&snapshot.state);
//!     if snapshot.state.is_terminal() {
//!         break;
//!     }
//! }
//! ```

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::client::ProfileClient;
use crate::http::HttpTransport;
use crate::join::join_all_or_nothing;
use crate::model::Subject;
use crate::state::{ActivationId, FetchState, Snapshot};

/// State shared between the orchestrator and its activation tasks.
struct Shared {
    current: Snapshot,
    last_id: u64,
    /// Activation that may still publish.
    active: Option<(ActivationId, CancellationToken)>,
    subscribers: Vec<mpsc::UnboundedSender<Snapshot>>,
}

impl Shared {
    fn publish(&mut self, snapshot: Snapshot) {
        self.subscribers
            .retain(|tx| tx.send(snapshot.clone()).is_ok());
        self.current = snapshot;
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(|e| e.into_inner())
}

/// Drives activations and publishes their snapshots.
///
/// Dropping the orchestrator tears it down, like [`shutdown`](Self::shutdown).
pub struct Orchestrator<T: ?Sized> {
    client: ProfileClient<T>,
    root: CancellationToken,
    shared: Arc<Mutex<Shared>>,
}

impl<T> Orchestrator<T>
where
    T: HttpTransport + ?Sized + 'static,
{
    /// Create an orchestrator bound to an observing context.
    ///
    /// Cancelling `token` ends the context: in-flight activations stop
    /// publishing and snapshot streams finish. Tearing the orchestrator down
    /// only cancels its own child of `token`.
    pub fn new(client: ProfileClient<T>, token: CancellationToken) -> Self {
        Self {
            client,
            root: token.child_token(),
            shared: Arc::new(Mutex::new(Shared {
                current: Snapshot::idle(),
                last_id: 0,
                active: None,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Start a new activation for `subject`, superseding any previous one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn observe(&self, subject: Subject) -> Activation {
        let mut shared = lock(&self.shared);

        if let Some((_, previous)) = shared.active.take() {
            previous.cancel();
        }

        shared.last_id += 1;
        let id = ActivationId(shared.last_id);
        let token = self.root.child_token();

        if token.is_cancelled() {
            drop(shared);
            tracing::debug!(activation = %id, subject = %subject, "Observer torn down, not activating");
            return Activation {
                id,
                subject,
                token,
                shared: Weak::new(),
                task: None,
            };
        }

        shared.active = Some((id, token.clone()));
        shared.publish(Snapshot {
            activation: Some(id),
            subject: Some(subject.clone()),
            state: FetchState::Loading,
        });
        drop(shared);

        tracing::debug!(activation = %id, subject = %subject, "Activation started");

        let task = tokio::spawn(run_activation(
            self.client.clone(),
            Arc::clone(&self.shared),
            id,
            subject.clone(),
            token.clone(),
        ));

        Activation {
            id,
            subject,
            token,
            shared: Arc::downgrade(&self.shared),
            task: Some(task),
        }
    }
}

impl<T: ?Sized> Orchestrator<T> {
    /// Stream every snapshot published from now on, starting with the current one.
    pub fn subscribe(&self) -> Snapshots {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut shared = lock(&self.shared);
        // Receiver is alive, so this cannot fail.
        let _ = tx.send(shared.current.clone());
        shared.subscribers.push(tx);
        Snapshots {
            rx,
            token: self.root.clone(),
        }
    }

    /// The latest published snapshot.
    #[must_use]
    pub fn current(&self) -> Snapshot {
        lock(&self.shared).current.clone()
    }

    /// Tear down the observing context.
    pub fn shutdown(&self) {
        let mut shared = lock(&self.shared);
        self.root.cancel();
        shared.active = None;
        shared.subscribers.clear();
    }

    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.root.is_cancelled()
    }
}

impl<T: ?Sized> Drop for Orchestrator<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run_activation<T>(
    client: ProfileClient<T>,
    shared: Arc<Mutex<Shared>>,
    id: ActivationId,
    subject: Subject,
    token: CancellationToken,
) where
    T: HttpTransport + ?Sized,
{
    let outcome = join_all_or_nothing(
        client.fetch_profile(&subject),
        client.fetch_repositories(&subject),
    )
    .await;

    let (state, failure) = match outcome {
        Ok((profile, repositories)) => (
            FetchState::Success {
                profile,
                repositories,
            },
            None,
        ),
        Err(e) => (
            FetchState::Error {
                message: e.user_message(),
            },
            Some(e),
        ),
    };

    {
        let mut guard = lock(&shared);
        if token.is_cancelled() {
            drop(guard);
            tracing::debug!(
                activation = %id,
                subject = %subject,
                status = %state.status(),
                "Discarding result of superseded activation"
            );
            return;
        }
        guard.active = None;
        guard.publish(Snapshot {
            activation: Some(id),
            subject: Some(subject.clone()),
            state: state.clone(),
        });
    }

    match failure {
        Some(e) => tracing::warn!(
            activation = %id,
            subject = %subject,
            resource = %e.resource(),
            error = %e,
            "Failed to load portfolio data"
        ),
        None => tracing::info!(
            activation = %id,
            subject = %subject,
            repositories = state.repositories().len(),
            "Loaded portfolio data"
        ),
    }
}

/// Handle to one activation.
///
/// Dropping the handle does not cancel the activation.
#[derive(Debug)]
pub struct Activation {
    id: ActivationId,
    subject: Subject,
    token: CancellationToken,
    shared: Weak<Mutex<Shared>>,
    task: Option<JoinHandle<()>>,
}

impl Activation {
    #[must_use]
    pub fn id(&self) -> ActivationId {
        self.id
    }

    #[must_use]
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// Abandon this activation; its result will not be published.
    ///
    /// If it is still the pending activation, `Idle` is published for it so
    /// consumers drop their loading indicator. Cancelling a settled or
    /// superseded activation publishes nothing.
    pub fn cancel(&self) {
        let Some(shared) = self.shared.upgrade() else {
            self.token.cancel();
            return;
        };

        let mut guard = lock(&shared);
        self.token.cancel();
        if guard.active.as_ref().is_some_and(|(id, _)| *id == self.id) {
            guard.active = None;
            guard.publish(Snapshot {
                activation: Some(self.id),
                subject: Some(self.subject.clone()),
                state: FetchState::Idle,
            });
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait until both requests have settled and the result was published or discarded.
    pub async fn wait(self) {
        if let Some(task) = self.task
            && let Err(e) = task.await
        {
            tracing::error!(activation = %self.id, error = %e, "Activation task failed");
        }
    }
}

/// Ordered stream of published snapshots.
///
/// Ends once the orchestrator is torn down and buffered snapshots are drained.
pub struct Snapshots {
    rx: mpsc::UnboundedReceiver<Snapshot>,
    token: CancellationToken,
}

impl Snapshots {
    pub async fn next(&mut self) -> Option<Snapshot> {
        tokio::select! {
            biased;
            snapshot = self.rx.recv() => snapshot,
            _ = self.token.cancelled() => self.rx.try_recv().ok(),
        }
    }

    /// Take an already published snapshot without waiting.
    pub fn try_next(&mut self) -> Option<Snapshot> {
        self.rx.try_recv().ok()
    }
}
