//! Service location and fetch limits.
//!
//! The library never reads ambient configuration; callers build a
//! [`ServiceConfig`] and hand it to [`ProfileClient`](crate::ProfileClient).

use url::Url;

use crate::error::ConfigError;

/// Base address used when nothing else is configured (local development).
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Number of repositories requested per activation.
pub const DEFAULT_REPO_LIMIT: usize = 6;

/// Where the profile-data service lives and how much to ask it for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    base_url: Url,
    repo_limit: usize,
}

impl ServiceConfig {
    /// Parse a base URL and use the default repository limit.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        Self::from_url(parsed)
    }

    /// Use an already parsed base URL.
    pub fn from_url(base_url: Url) -> Result<Self, ConfigError> {
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::OpaqueBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            base_url,
            repo_limit: DEFAULT_REPO_LIMIT,
        })
    }

    /// Override the number of repositories requested.
    pub fn with_repo_limit(mut self, repo_limit: usize) -> Result<Self, ConfigError> {
        if repo_limit == 0 {
            return Err(ConfigError::ZeroRepoLimit);
        }
        self.repo_limit = repo_limit;
        Ok(self)
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn repo_limit(&self) -> usize {
        self.repo_limit
    }

    /// Build `{base}/{segments...}`, keeping any path prefix on the base.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            repo_limit: DEFAULT_REPO_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_development_service() {
        let config = ServiceConfig::default();
        assert_eq!(config.base_url().as_str(), "http://localhost:8000/");
        assert_eq!(config.repo_limit(), 6);
    }

    #[test]
    fn endpoint_appends_segments_to_bare_host() {
        let config = ServiceConfig::new("http://localhost:8000").unwrap();
        let url = config.endpoint(&["api", "github", "profile"]);
        assert_eq!(url.as_str(), "http://localhost:8000/api/github/profile");
    }

    #[test]
    fn endpoint_keeps_path_prefix_with_or_without_trailing_slash() {
        for base in ["https://example.com/backend", "https://example.com/backend/"] {
            let config = ServiceConfig::new(base).unwrap();
            let url = config.endpoint(&["api", "github", "repos"]);
            assert_eq!(url.as_str(), "https://example.com/backend/api/github/repos");
        }
    }

    #[test]
    fn endpoint_drops_query_and_fragment_from_base() {
        let config = ServiceConfig::new("https://example.com/?stale=1#top").unwrap();
        let url = config.endpoint(&["api"]);
        assert_eq!(url.as_str(), "https://example.com/api");
    }

    #[test]
    fn rejects_unparseable_and_opaque_urls() {
        assert!(matches!(
            ServiceConfig::new("not a url"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            ServiceConfig::new("mailto:someone@example.com"),
            Err(ConfigError::OpaqueBaseUrl(_))
        ));
    }

    #[test]
    fn repo_limit_must_be_positive() {
        let config = ServiceConfig::default();
        assert!(matches!(
            config.clone().with_repo_limit(0),
            Err(ConfigError::ZeroRepoLimit)
        ));
        assert_eq!(config.with_repo_limit(12).unwrap().repo_limit(), 12);
    }
}
