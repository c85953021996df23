//! Tracing bridge
//!
//! [`ReportingLayer`] turns `tracing` events into [`LogRecord`]s and offers
//! them to a [`HandlerStack`].

use snag_core::{ExceptionRef, Level, LogRecord, Metadata};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

use crate::stack::HandlerStack;

/// Targets skipped by default. Events from the handlers, the client and the
/// HTTP stack are emitted while a record is being reported and would
/// otherwise re-enter the layer.
const DEFAULT_IGNORED_TARGETS: &[&str] = &[
    "snag_handler",
    "snag_client",
    "reqwest",
    "hyper",
    "hyper_util",
    "h2",
    "rustls",
];

/// `tracing` layer that forwards events to a handler stack
pub struct ReportingLayer {
    channel: String,
    stack: HandlerStack,
    ignored_targets: Vec<String>,
}

impl ReportingLayer {
    /// Creates a layer emitting records on `channel`
    pub fn new(channel: impl Into<String>, stack: HandlerStack) -> Self {
        Self {
            channel: channel.into(),
            stack,
            ignored_targets: DEFAULT_IGNORED_TARGETS.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Skips events from the module path `prefix` and everything below it
    pub fn ignore_target(mut self, prefix: impl Into<String>) -> Self {
        self.ignored_targets.push(prefix.into());
        self
    }

    fn is_ignored(&self, target: &str) -> bool {
        self.ignored_targets.iter().any(|prefix| {
            target
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
        })
    }

    fn record_for(&self, event: &Event<'_>, level: Level) -> LogRecord {
        let metadata = event.metadata();

        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);

        let message = visitor.message.unwrap_or_default();
        let mut record = LogRecord::new(self.channel.as_str(), level, message)
            .with_extra_value("target", metadata.target());
        if let Some(file) = metadata.file() {
            record = record.with_extra_value("file", file);
        }
        if let Some(line) = metadata.line() {
            record = record.with_extra_value("line", line);
        }

        record.context.fields = visitor.fields;
        record.context.exception = visitor.exception;
        record
    }
}

/// Maps a tracing level onto a record level
pub fn level_from_tracing(level: &tracing::Level) -> Level {
    match *level {
        tracing::Level::TRACE | tracing::Level::DEBUG => Level::DEBUG,
        tracing::Level::INFO => Level::INFO,
        tracing::Level::WARN => Level::WARNING,
        tracing::Level::ERROR => Level::ERROR,
    }
}

impl<S: Subscriber> Layer<S> for ReportingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if self.is_ignored(metadata.target()) {
            return;
        }

        let level = level_from_tracing(metadata.level());
        if !self.stack.is_handling(level) {
            return;
        }

        if let Err(e) = self.stack.dispatch(self.record_for(event, level)) {
            // Can't log through tracing from inside the subscriber.
            eprintln!("snag: failed to report event: {}", e);
        }
    }
}

#[derive(Default)]
struct RecordVisitor {
    message: Option<String>,
    exception: Option<ExceptionRef>,
    fields: Metadata,
}

impl RecordVisitor {
    fn insert(&mut self, field: &Field, value: serde_json::Value) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for RecordVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            self.insert(field, serde_json::Value::String(format!("{:?}", value)));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.insert(field, value.into());
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, value.into());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, value.into());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, value.into());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        if self.exception.is_none() {
            self.exception = Some(ExceptionRef::capture(value));
        } else {
            self.insert(field, serde_json::Value::String(value.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::severity_mapping::SeverityMappingHandler;
    use crate::test_support::{Call, RecordingClient};
    use serde_json::json;
    use snag_core::Severity;
    use std::sync::Arc;
    use tracing_subscriber::layer::SubscriberExt;

    fn layer_for(client: &Arc<RecordingClient>, level: Level) -> ReportingLayer {
        let handler = SeverityMappingHandler::new(client.clone()).with_level(level);
        ReportingLayer::new("app", HandlerStack::new().with_handler(Arc::new(handler)))
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(level_from_tracing(&tracing::Level::TRACE), Level::DEBUG);
        assert_eq!(level_from_tracing(&tracing::Level::DEBUG), Level::DEBUG);
        assert_eq!(level_from_tracing(&tracing::Level::INFO), Level::INFO);
        assert_eq!(level_from_tracing(&tracing::Level::WARN), Level::WARNING);
        assert_eq!(level_from_tracing(&tracing::Level::ERROR), Level::ERROR);
    }

    #[test]
    fn test_warn_event_becomes_warning_report() {
        let client = Arc::new(RecordingClient::default());
        let subscriber = tracing_subscriber::registry().with(layer_for(&client, Level::WARNING));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "app::disk", "below the handler level");
            tracing::warn!(target: "app::disk", free_gb = 2, "disk low");
        });

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            Call::Error {
                name,
                message,
                report,
            } => {
                assert_eq!(name, "disk low");
                assert_eq!(message, "[app] disk low");
                assert_eq!(report.severity(), Severity::Warning);

                let meta = report.meta_data().unwrap();
                assert_eq!(meta.get("target"), Some(&json!("app::disk")));
                assert!(meta.contains_key("line"));
            }
            other => panic!("expected notify_error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_field_takes_the_exception_path() {
        let client = Arc::new(RecordingClient::default());
        let subscriber = tracing_subscriber::registry().with(layer_for(&client, Level::DEBUG));

        tracing::subscriber::with_default(subscriber, || {
            let err = std::io::Error::other("connection reset");
            tracing::error!(
                target: "app::sync",
                error = &err as &dyn std::error::Error,
                "sync failed"
            );
        });

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            Call::Exception { exception, report } => {
                assert_eq!(exception.message(), "connection reset");
                assert_eq!(report.severity(), Severity::Error);
            }
            other => panic!("expected notify_exception, got {:?}", other),
        }
    }

    #[test]
    fn test_ignored_targets_are_skipped() {
        let client = Arc::new(RecordingClient::default());
        let layer = layer_for(&client, Level::DEBUG).ignore_target("noisy");
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(target: "noisy::module", "skipped");
            tracing::error!(target: "noisy", "skipped too");
            tracing::error!(target: "snag_client::delivery", "skipped as well");
            tracing::error!(target: "snag_handler::severity_mapping", "also skipped");
            tracing::error!(target: "app::billing", "kept");
        });

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            Call::Error { name, .. } => assert_eq!(name, "kept"),
            other => panic!("expected notify_error, got {:?}", other),
        }
    }

    #[test]
    fn test_ignored_targets_match_whole_path_segments() {
        let client = Arc::new(RecordingClient::default());
        let subscriber = tracing_subscriber::registry().with(layer_for(&client, Level::DEBUG));

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(target: "h2o_app::server", "kept");
            tracing::error!(target: "snag_client_ext", "kept too");
            tracing::error!(target: "h2::codec", "skipped");
        });

        let names: Vec<String> = client
            .calls()
            .into_iter()
            .map(|call| match call {
                Call::Error { name, .. } => name,
                other => panic!("expected notify_error, got {:?}", other),
            })
            .collect();
        assert_eq!(names, vec!["kept".to_string(), "kept too".to_string()]);
    }
}
