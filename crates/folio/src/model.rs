//! Wire and domain types for profiles and repositories.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SubjectError;

/// The username whose profile and repositories are fetched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Subject(String);

impl Subject {
    /// Create a subject, trimming surrounding whitespace.
    pub fn new(value: impl AsRef<str>) -> Result<Self, SubjectError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SubjectError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Subject {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A user profile as served by `/api/github/profile`.
///
/// Everything except the login is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Identifying handle. Filled from the requested subject when absent.
    #[serde(default, deserialize_with = "null_as_default")]
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Personal homepage.
    #[serde(default)]
    pub blog: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Profile page on the code host.
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub followers: Option<u64>,
    #[serde(default)]
    pub following: Option<u64>,
    #[serde(default)]
    pub public_repos: Option<u64>,
}

impl Profile {
    /// Decode a profile body, using `subject` as the handle when the body has none.
    pub fn from_json(body: &[u8], subject: &Subject) -> serde_json::Result<Self> {
        let mut profile: Profile = serde_json::from_slice(body)?;
        if profile.login.trim().is_empty() {
            profile.login = subject.as_str().to_string();
        }
        Ok(profile)
    }
}

/// A repository as served by `/api/github/repos`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// `owner/name`.
    pub full_name: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub html_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stargazers_count: u64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub topics: Vec<String>,
}

/// Decode a repository list body, preserving the service's order.
pub fn repositories_from_json(body: &[u8]) -> serde_json::Result<Vec<Repository>> {
    serde_json::from_slice(body)
}
