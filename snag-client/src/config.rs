//! Client configuration
//!
//! Connection and identification settings for the Bugsnag notify API.

use std::time::Duration;

use crate::error::{ClientError, Result};

/// Default notify endpoint
pub const DEFAULT_ENDPOINT: &str = "https://notify.bugsnag.com";

/// Reporting client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Project API key, sent with every report
    pub api_key: String,

    /// Notify endpoint URL
    pub endpoint: String,

    /// Release stage of the running application (e.g. "production")
    pub release_stage: String,

    /// Version of the running application
    pub app_version: Option<String>,

    /// Only notify when `release_stage` is in this list. `None` notifies
    /// from every stage.
    pub notify_release_stages: Option<Vec<String>>,

    /// Hostname reported in the device section
    pub hostname: Option<String>,

    /// HTTP timeout for a single delivery
    pub timeout: Duration,
}

impl ClientConfig {
    /// Creates a new configuration with defaults
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            release_stage: "production".to_string(),
            app_version: None,
            notify_release_stages: None,
            hostname: None,
            timeout: Duration::from_secs(10),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - BUGSNAG_API_KEY (required)
    /// - BUGSNAG_ENDPOINT (optional, default: https://notify.bugsnag.com)
    /// - BUGSNAG_RELEASE_STAGE (optional, default: production)
    /// - BUGSNAG_APP_VERSION (optional)
    /// - BUGSNAG_NOTIFY_RELEASE_STAGES (optional, comma-separated)
    /// - BUGSNAG_TIMEOUT (optional, seconds, default: 10)
    /// - HOSTNAME (optional)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with a custom variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("BUGSNAG_API_KEY").ok_or_else(|| {
            ClientError::InvalidConfiguration("BUGSNAG_API_KEY environment variable not set".into())
        })?;

        let mut config = Self::new(api_key);

        if let Some(endpoint) = lookup("BUGSNAG_ENDPOINT") {
            config.endpoint = endpoint;
        }

        if let Some(stage) = lookup("BUGSNAG_RELEASE_STAGE") {
            config.release_stage = stage;
        }

        config.app_version = lookup("BUGSNAG_APP_VERSION");
        config.hostname = lookup("HOSTNAME");

        config.notify_release_stages = lookup("BUGSNAG_NOTIFY_RELEASE_STAGES").map(|stages| {
            stages
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        });

        config.timeout = lookup("BUGSNAG_TIMEOUT")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(config.timeout);

        Ok(config)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_release_stage(mut self, stage: impl Into<String>) -> Self {
        self.release_stage = stage.into();
        self
    }

    pub fn with_app_version(mut self, version: impl Into<String>) -> Self {
        self.app_version = Some(version.into());
        self
    }

    pub fn with_notify_release_stages<I, S>(mut self, stages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.notify_release_stages = Some(stages.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether reports from the current release stage should be sent
    pub fn should_notify(&self) -> bool {
        match &self.notify_release_stages {
            Some(stages) => stages.iter().any(|s| *s == self.release_stage),
            None => true,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(ClientError::InvalidConfiguration(
                "api_key cannot be empty".into(),
            ));
        }

        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ClientError::InvalidConfiguration(
                "endpoint must start with http:// or https://".into(),
            ));
        }

        if self.timeout.is_zero() {
            return Err(ClientError::InvalidConfiguration(
                "timeout must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}
