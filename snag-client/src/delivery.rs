//! Report delivery
//!
//! Sends queued payloads to the notify endpoint, one request per report.
//! Failed deliveries are logged and counted, never retried.

use chrono::{SecondsFormat, Utc};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::payload::PAYLOAD_VERSION;

/// Outcome counters of a finished delivery task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryStats {
    pub sent: u64,
    pub failed: u64,
}

/// Consumer side of a [`crate::BugsnagClient`]
pub struct Delivery {
    endpoint: String,
    api_key: String,
    client: Client,
    queue: mpsc::UnboundedReceiver<Vec<u8>>,
}

impl Delivery {
    pub(crate) fn new(
        config: &ClientConfig,
        client: Client,
        queue: mpsc::UnboundedReceiver<Vec<u8>>,
    ) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            client,
            queue,
        }
    }

    /// Deliver reports until every client handle has been dropped
    pub async fn run(mut self) -> DeliveryStats {
        let mut stats = DeliveryStats::default();

        while let Some(body) = self.queue.recv().await {
            match self.send(body).await {
                Ok(()) => {
                    stats.sent += 1;
                    debug!("Report delivered to {}", self.endpoint);
                }
                Err(e) => {
                    stats.failed += 1;
                    warn!("Failed to deliver report: {}", e);
                }
            }
        }

        debug!(sent = stats.sent, failed = stats.failed, "Delivery finished");
        stats
    }

    /// Run the delivery loop on the current tokio runtime
    pub fn spawn(self) -> JoinHandle<DeliveryStats> {
        tokio::spawn(self.run())
    }

    async fn send(&self, body: Vec<u8>) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header("Bugsnag-Api-Key", &self.api_key)
            .header("Bugsnag-Payload-Version", PAYLOAD_VERSION)
            .header(
                "Bugsnag-Sent-At",
                Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            )
            .body(body)
            .send()
            .await?;

        handle_empty_response(response).await
    }

    #[cfg(test)]
    pub(crate) fn try_next(&mut self) -> Option<Vec<u8>> {
        self.queue.try_recv().ok()
    }
}

/// Check the status code of a response whose body we do not need
async fn handle_empty_response(response: reqwest::Response) -> Result<()> {
    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ClientError::api_error(status.as_u16(), error_text));
    }

    Ok(())
}
