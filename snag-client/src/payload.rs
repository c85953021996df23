//! Notify API payload (version 4)

use serde::Serialize;
use snag_core::{Metadata, Severity};

use crate::config::ClientConfig;
use crate::report::Report;

pub const PAYLOAD_VERSION: &str = "4.0";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyPayload {
    pub api_key: String,
    pub payload_version: &'static str,
    pub notifier: Notifier,
    pub events: Vec<Event>,
}

#[derive(Debug, Serialize)]
pub struct Notifier {
    pub name: &'static str,
    pub version: &'static str,
    pub url: &'static str,
}

impl Default for Notifier {
    fn default() -> Self {
        Self {
            name: "snag",
            version: env!("CARGO_PKG_VERSION"),
            url: "https://docs.bugsnag.com/api/error-reporting/",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub exceptions: Vec<EventException>,
    pub severity: Severity,
    pub severity_reason: EventSeverityReason,
    pub unhandled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub meta_data: Metadata,
    pub app: App,
    pub device: Device,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventException {
    pub error_class: String,
    pub message: String,
    pub stacktrace: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct EventSeverityReason {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    pub release_stage: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Device {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

impl NotifyPayload {
    /// Wraps a single report in a payload
    pub fn new(config: &ClientConfig, report: &Report) -> Self {
        Self {
            api_key: config.api_key.clone(),
            payload_version: PAYLOAD_VERSION,
            notifier: Notifier::default(),
            events: vec![Event::new(config, report)],
        }
    }
}

impl Event {
    fn new(config: &ClientConfig, report: &Report) -> Self {
        Self {
            exceptions: report
                .exceptions()
                .iter()
                .map(|e| EventException {
                    error_class: e.error_class.clone(),
                    message: e.message.clone(),
                    stacktrace: Vec::new(),
                })
                .collect(),
            severity: report.severity(),
            severity_reason: EventSeverityReason {
                kind: report.severity_reason().as_str(),
            },
            unhandled: report.is_unhandled(),
            context: report.context().map(String::from),
            meta_data: report.meta_data().cloned().unwrap_or_default(),
            app: App {
                release_stage: config.release_stage.clone(),
                version: config.app_version.clone(),
            },
            device: Device {
                hostname: config.hostname.clone(),
            },
        }
    }
}
