//! Configuration module
//!
//! Handles CLI configuration and its conversion into a client configuration.

use anyhow::{Result, bail};
use snag_client::ClientConfig;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bugsnag project API key, only needed to send reports
    pub api_key: Option<String>,

    /// Notify endpoint URL
    pub endpoint: String,

    /// Release stage of the reporting application
    pub release_stage: String,

    /// Version of the reporting application
    pub app_version: Option<String>,
}

impl Config {
    /// Builds a validated client configuration
    pub fn client_config(&self) -> Result<ClientConfig> {
        let Some(api_key) = &self.api_key else {
            bail!("an API key is required: pass --api-key or set BUGSNAG_API_KEY");
        };

        let mut config = ClientConfig::new(api_key.as_str())
            .with_endpoint(self.endpoint.as_str())
            .with_release_stage(self.release_stage.as_str());

        if let Some(version) = &self.app_version {
            config = config.with_app_version(version.as_str());
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> Config {
        Config {
            api_key: api_key.map(String::from),
            endpoint: "http://localhost:9000".to_string(),
            release_stage: "staging".to_string(),
            app_version: Some("1.2.3".to_string()),
        }
    }

    #[test]
    fn test_client_config() {
        let client_config = config(Some("key")).client_config().unwrap();
        assert_eq!(client_config.api_key, "key");
        assert_eq!(client_config.endpoint, "http://localhost:9000");
        assert_eq!(client_config.release_stage, "staging");
        assert_eq!(client_config.app_version.as_deref(), Some("1.2.3"));
    }

    #[test]
    fn test_client_config_requires_api_key() {
        assert!(config(None).client_config().is_err());
        assert!(config(Some("")).client_config().is_err());
    }
}
