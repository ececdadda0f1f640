//! Folio - portfolio data acquisition and presentation state.
//!
//! This library fetches a user's profile and pinned repositories from a
//! profile-data service, reconciles both into one [`FetchState`], and projects
//! that state into a [`DisplayModel`] for whatever renders the page.
//!
//! # Features
//!
//! - `reqwest` (default) - Enables [`http::reqwest_transport::ReqwestTransport`],
//!   the production [`HttpTransport`](http::HttpTransport).
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use folio::{Orchestrator, ProfileClient, ServiceConfig, Subject, project};
//! use folio::http::reqwest_transport::ReqwestTransport;
//! use tokio_util::sync::CancellationToken;
//!
//! let config = ServiceConfig::new("http://localhost:8000")?;
//! let client = ProfileClient::new(config, Arc::new(ReqwestTransport::default()));
//! let orchestrator = Orchestrator::new(client, CancellationToken::new());
//!
//! orchestrator.observe(Subject::new("alice")?).wait().await;
//! let model = project(&orchestrator.current().state);
//! println!("{} has {} followers", model.profile.heading, model.stats.followers);
//! ```

pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod http;
pub mod join;
pub mod model;
pub mod orchestrator;
pub mod state;

pub use client::ProfileClient;
pub use config::{DEFAULT_BASE_URL, DEFAULT_REPO_LIMIT, ServiceConfig};
pub use display::{
    DisplayModel, Links, PLACEHOLDER, ProfileView, RepositoryCard, Stats, project, project_snapshot,
};
pub use error::{ConfigError, FetchError, Resource, SubjectError};
pub use join::join_all_or_nothing;
pub use model::{Profile, Repository, Subject};
pub use orchestrator::{Activation, Orchestrator, Snapshots};
pub use state::{ActivationId, FetchState, FetchStatus, Snapshot};
