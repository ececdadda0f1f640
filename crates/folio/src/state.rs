//! Aggregated fetch state and the snapshots published to consumers.

use std::fmt;

use serde::Serialize;

use crate::model::{Profile, Repository, Subject};

/// Discriminant of [`FetchState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    Idle,
    Loading,
    Success,
    Error,
}

impl FetchStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FetchStatus::Idle => "idle",
            FetchStatus::Loading => "loading",
            FetchStatus::Success => "success",
            FetchStatus::Error => "error",
        }
    }
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render-ready state for one subject.
///
/// Exactly one status holds at a time, and the data each status needs travels
/// with it: a successful state always has a profile, a failed one always has a
/// message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Success {
        profile: Profile,
        repositories: Vec<Repository>,
    },
    Error {
        message: String,
    },
}

impl FetchState {
    #[must_use]
    pub fn status(&self) -> FetchStatus {
        match self {
            FetchState::Idle => FetchStatus::Idle,
            FetchState::Loading => FetchStatus::Loading,
            FetchState::Success { .. } => FetchStatus::Success,
            FetchState::Error { .. } => FetchStatus::Error,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    /// Whether this state ends an activation.
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, FetchState::Success { .. } | FetchState::Error { .. })
    }

    #[must_use]
    pub fn profile(&self) -> Option<&Profile> {
        match self {
            FetchState::Success { profile, .. } => Some(profile),
            _ => None,
        }
    }

    /// Repositories of a successful fetch; empty for every other status.
    #[must_use]
    pub fn repositories(&self) -> &[Repository] {
        match self {
            FetchState::Success { repositories, .. } => repositories,
            _ => &[],
        }
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            FetchState::Error { message } => Some(message),
            _ => None,
        }
    }
}

/// Identifies one activation of an orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ActivationId(pub u64);

impl fmt::Display for ActivationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One published state, attributed to the activation that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// `None` before the first activation.
    pub activation: Option<ActivationId>,
    pub subject: Option<Subject>,
    pub state: FetchState,
}

impl Snapshot {
    /// The snapshot an orchestrator holds before anything was observed.
    #[must_use]
    pub fn idle() -> Self {
        Self {
            activation: None,
            subject: None,
            state: FetchState::Idle,
        }
    }

    #[must_use]
    pub fn belongs_to(&self, activation: ActivationId) -> bool {
        self.activation == Some(activation)
    }
}
