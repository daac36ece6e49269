//! Client configuration
//!
//! `ClientConfig` holds the backend base URLs and the knobs of the HTTP layer.
//! It can be built in code, loaded from YAML, and overridden from `LEARNHUB_*`
//! environment variables.

use crate::error::{Error, Result};
use crate::http::RateLimiterConfig;
use crate::types::{ApiScope, ConcurrentRefreshPolicy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Prefix shared by all environment overrides
pub const ENV_PREFIX: &str = "LEARNHUB_";

/// Configuration for the LearnHub client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL for general requests (courses, uploads)
    pub api_base_url: String,

    /// Base URL for user-scoped requests (account, refresh, payments)
    pub user_base_url: String,

    /// Base URL for admin-scoped requests
    pub admin_base_url: String,

    /// Login entry point used for session redirects
    pub login_path: String,

    /// Refresh endpoint, relative to the user base URL
    pub refresh_path: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// User agent string
    pub user_agent: String,

    /// Behavior of requests that see 401 while a refresh is in flight
    pub concurrent_refresh: ConcurrentRefreshPolicy,

    /// Per-scope rate limiting (disabled when absent)
    pub rate_limit: Option<RateLimiterConfig>,

    /// Headers added to every request
    pub default_headers: HashMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".to_string(),
            user_base_url: "http://localhost:5000/api/user".to_string(),
            admin_base_url: "http://localhost:5000/api/admin".to_string(),
            login_path: "/login".to_string(),
            refresh_path: "/refresh-token".to_string(),
            timeout_secs: 30,
            user_agent: format!("learnhub-client/{}", env!("CARGO_PKG_VERSION")),
            concurrent_refresh: ConcurrentRefreshPolicy::default(),
            rate_limit: None,
            default_headers: HashMap::new(),
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Parse a config from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: ClientConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Load from an optional file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `LEARNHUB_*` overrides using the given lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(v) = var("API_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = var("USER_URL") {
            self.user_base_url = v;
        }
        if let Some(v) = var("ADMIN_URL") {
            self.admin_base_url = v;
        }
        if let Some(v) = var("LOGIN_PATH") {
            self.login_path = v;
        }
        if let Some(v) = var("REFRESH_PATH") {
            self.refresh_path = v;
        }
        if let Some(v) = var("USER_AGENT") {
            self.user_agent = v;
        }
        if let Some(v) = var("TIMEOUT_SECS") {
            self.timeout_secs = v
                .parse()
                .map_err(|e| Error::invalid_value("timeout_secs", format!("{v}: {e}")))?;
        }
        if let Some(v) = var("REFRESH_POLICY") {
            self.concurrent_refresh = serde_yaml::from_str(&v)
                .map_err(|e| Error::invalid_value("concurrent_refresh", format!("{v}: {e}")))?;
        }
        Ok(())
    }

    /// Check that every base URL parses and the timeout is usable
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("api_base_url", &self.api_base_url),
            ("user_base_url", &self.user_base_url),
            ("admin_base_url", &self.admin_base_url),
        ] {
            Url::parse(value).map_err(|e| Error::invalid_value(field, format!("{value}: {e}")))?;
        }
        if self.timeout_secs == 0 {
            return Err(Error::invalid_value("timeout_secs", "must be greater than 0"));
        }
        Ok(())
    }

    /// Base URL for a scope
    pub fn base_url(&self, scope: ApiScope) -> &str {
        match scope {
            ApiScope::General => &self.api_base_url,
            ApiScope::User => &self.user_base_url,
            ApiScope::Admin => &self.admin_base_url,
        }
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Builder for client config
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Point all three scopes at one server (`{root}/api`, `{root}/api/user`, `{root}/api/admin`)
    pub fn server(mut self, root: impl AsRef<str>) -> Self {
        let root = root.as_ref().trim_end_matches('/');
        self.config.api_base_url = format!("{root}/api");
        self.config.user_base_url = format!("{root}/api/user");
        self.config.admin_base_url = format!("{root}/api/admin");
        self
    }

    /// Set the general API base URL
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into();
        self
    }

    /// Set the user API base URL
    pub fn user_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.user_base_url = url.into();
        self
    }

    /// Set the admin API base URL
    pub fn admin_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.admin_base_url = url.into();
        self
    }

    /// Set the login redirect target
    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.config.login_path = path.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Set the concurrent refresh policy
    pub fn concurrent_refresh(mut self, policy: ConcurrentRefreshPolicy) -> Self {
        self.config.concurrent_refresh = policy;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
