//! Configuration file support for folio.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `FOLIO_`, e.g., `FOLIO_SERVICE__BASE_URL`)
//! 3. Config file (./folio.toml, then ~/.config/folio/config.toml)
//! 4. Built-in defaults
//!
//! Example config file:
//! ```toml
//! [service]
//! base_url = "https://portfolio-api.example.com"  # default: http://localhost:8000
//! subject = "octocat"
//! repo_limit = 6
//! timeout_secs = 15  # optional, no timeout by default
//! ```

use std::path::PathBuf;
use std::time::Duration;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use folio::{ConfigError, DEFAULT_BASE_URL, DEFAULT_REPO_LIMIT, ServiceConfig};
use serde::Deserialize;

/// Subject shown when neither the config nor the command line names one.
pub const DEFAULT_SUBJECT: &str = "djacoo";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Profile-data service configuration.
    pub service: ServiceSection,
}

/// Profile-data service configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServiceSection {
    /// Base URL of the service.
    /// Can also be set via FOLIO_SERVICE__BASE_URL environment variable.
    pub base_url: String,
    /// Username whose portfolio is rendered.
    /// Can also be set via FOLIO_SERVICE__SUBJECT environment variable.
    pub subject: String,
    /// Number of repositories to request.
    pub repo_limit: usize,
    /// Request timeout in seconds. Unset means wait indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            subject: DEFAULT_SUBJECT.to_string(),
            repo_limit: DEFAULT_REPO_LIMIT,
            timeout_secs: None,
        }
    }
}

/// Command-line overrides for the service section.
#[derive(Debug, Clone, Default)]
pub struct ServiceOverrides {
    pub base_url: Option<String>,
    pub repo_limit: Option<usize>,
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/folio/config.toml)
    /// 3. Local config file (./folio.toml)
    /// 4. Environment variables with FOLIO_ prefix
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(xdg_config) = Self::default_config_path()
            && xdg_config.exists()
        {
            tracing::debug!("Loading config from {:?}", xdg_config);
            builder = builder.add_source(
                File::from(xdg_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let local_config = PathBuf::from("folio.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./folio.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // e.g., FOLIO_SERVICE__BASE_URL -> service.base_url
        builder = builder.add_source(
            Environment::with_prefix("FOLIO")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// The configured subject, unless the command line names one.
    pub fn subject(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .unwrap_or_else(|| self.service.subject.clone())
    }

    /// Build the library's service configuration, applying CLI overrides.
    pub fn service_config(&self, overrides: &ServiceOverrides) -> Result<ServiceConfig, ConfigError> {
        let base_url = overrides
            .base_url
            .as_deref()
            .unwrap_or(&self.service.base_url);
        let repo_limit = overrides.repo_limit.unwrap_or(self.service.repo_limit);

        ServiceConfig::new(base_url)?.with_repo_limit(repo_limit)
    }

    /// Transport timeout, if any.
    pub fn timeout(&self, overrides: &ServiceOverrides) -> Option<Duration> {
        overrides
            .timeout_secs
            .or(self.service.timeout_secs)
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Get the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "folio").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
