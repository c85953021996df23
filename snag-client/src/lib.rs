//! Snag reporting client
//!
//! Submits error reports to the Bugsnag notify API.
//!
//! [`ReportingClient`] is the contract log handlers program against: one
//! call per report, with a callback that can adjust the [`Report`] draft
//! before it is sent. [`BugsnagClient`] implements it by queueing serialized
//! payloads for a [`Delivery`] task that performs the HTTP requests.
//!
//! # Example
//!
//! ```no_run
//! use snag_client::{BugsnagClient, ClientConfig, ReportingClient};
//! use snag_core::Severity;
//!
//! #[tokio::main]
//! async fn main() -> snag_client::Result<()> {
//!     let (client, delivery) = BugsnagClient::new(ClientConfig::from_env()?)?;
//!     let delivery = delivery.spawn();
//!
//!     client.notify_error("disk low", "[app] disk low", &|report| {
//!         report.set_severity(Severity::Warning);
//!     })?;
//!
//!     drop(client);
//!     let stats = delivery.await.expect("delivery task panicked");
//!     println!("sent {} report(s)", stats.sent);
//!     Ok(())
//! }
//! ```

pub mod config;
mod delivery;
pub mod error;
mod notify;
pub mod payload;
pub mod report;

// Re-export commonly used types
pub use config::ClientConfig;
pub use delivery::{Delivery, DeliveryStats};
pub use error::{ClientError, Result};
pub use report::{Report, ReportException, SeverityReason};

use snag_core::ExceptionRef;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Contract of an error-reporting client
///
/// The callback runs synchronously on the calling thread, before the report
/// leaves the client. Implementations must be safe to call from several
/// threads at once.
pub trait ReportingClient: Send + Sync {
    /// Submit a report built from an error value
    fn notify_exception(
        &self,
        exception: &ExceptionRef,
        callback: &dyn Fn(&mut Report),
    ) -> Result<()>;

    /// Submit a report built from an error name and message
    fn notify_error(&self, name: &str, message: &str, callback: &dyn Fn(&mut Report)) -> Result<()>;
}

/// Bugsnag notify API client
///
/// Cheap to clone; all clones feed the same [`Delivery`]. The delivery task
/// finishes once every clone has been dropped.
#[derive(Debug, Clone)]
pub struct BugsnagClient {
    config: Arc<ClientConfig>,
    queue: mpsc::UnboundedSender<Vec<u8>>,
}

impl BugsnagClient {
    /// Create a client and its delivery task from a configuration
    ///
    /// The configuration is validated first. The returned [`Delivery`] must
    /// be run (see [`Delivery::spawn`]) for reports to be sent.
    pub fn new(config: ClientConfig) -> Result<(Self, Delivery)> {
        config.validate()?;
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Self::with_client(config, http)
    }

    /// Create a client with a custom HTTP client
    ///
    /// This allows you to configure proxies, TLS settings, etc.
    pub fn with_client(config: ClientConfig, http: reqwest::Client) -> Result<(Self, Delivery)> {
        config.validate()?;

        let (queue, receiver) = mpsc::unbounded_channel();
        let delivery = Delivery::new(&config, http, receiver);

        let client = Self {
            config: Arc::new(config),
            queue,
        };
        Ok((client, delivery))
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let (client, _delivery) = BugsnagClient::new(ClientConfig::new("key")).unwrap();
        assert_eq!(client.config().endpoint, config::DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        let result = BugsnagClient::new(ClientConfig::new(""));
        assert!(matches!(result, Err(ClientError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_client_with_custom_client() {
        let config = ClientConfig::new("key").with_endpoint("http://localhost:9000");
        let (client, _delivery) =
            BugsnagClient::with_client(config, reqwest::Client::new()).unwrap();
        assert_eq!(client.config().endpoint, "http://localhost:9000");
    }
}
