//! Error types for fetching, subject validation and service configuration.

use std::fmt;

use thiserror::Error;

/// The two resources fetched for every activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Profile,
    Repositories,
}

impl Resource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Profile => "profile",
            Resource::Repositories => "repositories",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while fetching a resource from the profile-data service.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not complete.
    #[error("Failed to load {resource}: {message}")]
    Network { resource: Resource, message: String },

    /// The service answered with a non-success status.
    #[error("Failed to load {resource}: HTTP {status}")]
    Response { resource: Resource, status: u16 },

    /// The body did not match the expected shape.
    #[error("Failed to load {resource}: invalid response body ({message})")]
    Parse { resource: Resource, message: String },
}

impl FetchError {
    /// Create a network error.
    #[inline]
    pub fn network(resource: Resource, message: impl Into<String>) -> Self {
        Self::Network {
            resource,
            message: message.into(),
        }
    }

    /// Create a parse error.
    #[inline]
    pub fn parse(resource: Resource, message: impl Into<String>) -> Self {
        Self::Parse {
            resource,
            message: message.into(),
        }
    }

    /// The resource whose request failed.
    #[must_use]
    pub fn resource(&self) -> Resource {
        match self {
            Self::Network { resource, .. }
            | Self::Response { resource, .. }
            | Self::Parse { resource, .. } => *resource,
        }
    }

    /// Short banner text for the rendering layer.
    ///
    /// Only the failing resource is named; the detailed cause goes to the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        format!("Failed to load {}", self.resource())
    }
}

/// Raised when a subject identifier is unusable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubjectError {
    #[error("subject must not be empty")]
    Empty,
}

/// Invalid service configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("base URL '{0}' cannot carry a path")]
    OpaqueBaseUrl(String),

    #[error("repository limit must be at least 1")]
    ZeroRepoLimit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_names_the_failing_resource() {
        let profile = FetchError::Response {
            resource: Resource::Profile,
            status: 404,
        };
        assert_eq!(profile.user_message(), "Failed to load profile");

        let repos = FetchError::network(Resource::Repositories, "connection refused");
        assert_eq!(repos.user_message(), "Failed to load repositories");
    }

    #[test]
    fn display_carries_the_cause() {
        let err = FetchError::Response {
            resource: Resource::Profile,
            status: 503,
        };
        assert_eq!(err.to_string(), "Failed to load profile: HTTP 503");

        let err = FetchError::parse(Resource::Repositories, "expected a sequence");
        assert_eq!(
            err.to_string(),
            "Failed to load repositories: invalid response body (expected a sequence)"
        );
        assert_eq!(err.resource(), Resource::Repositories);
    }
}
