//! Client for the profile-data service.

use std::sync::Arc;

use url::Url;

use crate::config::ServiceConfig;
use crate::error::{FetchError, Resource};
use crate::http::{HttpRequest, HttpResponse, HttpTransport};
use crate::model::{Profile, Repository, Subject, repositories_from_json};

const USER_AGENT: &str = concat!("folio/", env!("CARGO_PKG_VERSION"));

/// Fetches profiles and repository lists over an [`HttpTransport`].
///
/// Cloning is cheap; clones share the transport.
pub struct ProfileClient<T: ?Sized> {
    config: ServiceConfig,
    transport: Arc<T>,
}

impl<T: ?Sized> Clone for ProfileClient<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: HttpTransport + ?Sized> ProfileClient<T> {
    pub fn new(config: ServiceConfig, transport: Arc<T>) -> Self {
        Self { config, transport }
    }

    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// `GET {base}/api/github/profile?username={subject}`
    #[must_use]
    pub fn profile_url(&self, subject: &Subject) -> Url {
        let mut url = self.config.endpoint(&["api", "github", "profile"]);
        url.query_pairs_mut()
            .append_pair("username", subject.as_str());
        url
    }

    /// `GET {base}/api/github/repos?username={subject}&limit={n}`
    #[must_use]
    pub fn repositories_url(&self, subject: &Subject) -> Url {
        let mut url = self.config.endpoint(&["api", "github", "repos"]);
        url.query_pairs_mut()
            .append_pair("username", subject.as_str())
            .append_pair("limit", &self.config.repo_limit().to_string());
        url
    }

    /// Fetch the profile for `subject`.
    pub async fn fetch_profile(&self, subject: &Subject) -> Result<Profile, FetchError> {
        let response = self
            .get(Resource::Profile, self.profile_url(subject))
            .await?;
        let profile = Profile::from_json(&response.body, subject)
            .map_err(|e| FetchError::parse(Resource::Profile, e.to_string()))?;

        tracing::debug!(subject = %subject, login = %profile.login, "Fetched profile");
        Ok(profile)
    }

    /// Fetch up to the configured number of repositories for `subject`.
    pub async fn fetch_repositories(
        &self,
        subject: &Subject,
    ) -> Result<Vec<Repository>, FetchError> {
        let response = self
            .get(Resource::Repositories, self.repositories_url(subject))
            .await?;
        let repositories = repositories_from_json(&response.body)
            .map_err(|e| FetchError::parse(Resource::Repositories, e.to_string()))?;

        tracing::debug!(subject = %subject, count = repositories.len(), "Fetched repositories");
        Ok(repositories)
    }

    async fn get(&self, resource: Resource, url: Url) -> Result<HttpResponse, FetchError> {
        let request = HttpRequest::get(url.as_str())
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT);

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| FetchError::network(resource, e.to_string()))?;

        if !response.is_success() {
            return Err(FetchError::Response {
                resource,
                status: response.status,
            });
        }

        Ok(response)
    }
}
