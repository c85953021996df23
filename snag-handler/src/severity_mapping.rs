//! Severity-mapping handler
//!
//! Forwards each record to a [`ReportingClient`] as exactly one report.
//! Records carrying an exception go through `notify_exception`, everything
//! else through `notify_error` with the raw message as the error name and
//! the formatted text as the error message. The report's severity comes
//! from the level table; the record's extra, when attached, becomes the
//! report's metadata.

use std::sync::Arc;

use snag_client::{Report, ReportingClient};
use snag_core::{Formatter, Level, LevelSeverityMap, LineFormatter, LogRecord, Severity};
use tracing::trace;

use crate::error::Result;
use crate::handler::ProcessingHandler;

/// Handler that maps log levels onto report severities
pub struct SeverityMappingHandler {
    client: Arc<dyn ReportingClient>,
    level: Level,
    bubble: bool,
    severities: LevelSeverityMap,
    formatter: Box<dyn Formatter>,
    batch_formatter: Box<dyn Formatter>,
}

impl SeverityMappingHandler {
    /// Creates a handler accepting every level, with bubbling enabled
    ///
    /// # Arguments
    /// * `client` - Shared reporting client; the handler never closes it
    pub fn new(client: Arc<dyn ReportingClient>) -> Self {
        Self {
            client,
            level: Level::DEBUG,
            bubble: true,
            severities: LevelSeverityMap::standard(),
            formatter: Box::new(Self::default_formatter()),
            batch_formatter: Box::new(Self::default_batch_formatter()),
        }
    }

    /// Sets the minimum level at which this handler is triggered
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets whether handled records can bubble up the stack
    pub fn with_bubble(mut self, bubble: bool) -> Self {
        self.bubble = bubble;
        self
    }

    pub fn with_formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    pub fn with_batch_formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        self.batch_formatter = Box::new(formatter);
        self
    }

    /// `[channel] message`
    pub fn default_formatter() -> LineFormatter {
        LineFormatter::new("[%channel%] %message%")
    }

    pub fn default_batch_formatter() -> LineFormatter {
        LineFormatter::default()
    }

    pub fn severity_for(&self, level: Level) -> Severity {
        self.severities.resolve(level)
    }
}

impl ProcessingHandler for SeverityMappingHandler {
    fn level(&self) -> Level {
        self.level
    }

    fn bubble(&self) -> bool {
        self.bubble
    }

    fn formatter(&self) -> &dyn Formatter {
        self.formatter.as_ref()
    }

    fn batch_formatter(&self) -> &dyn Formatter {
        self.batch_formatter.as_ref()
    }

    fn write(&self, record: &LogRecord) -> Result<()> {
        let severity = self.severity_for(record.level);
        let apply = |report: &mut Report| {
            report.set_severity(severity);
            if let Some(extra) = &record.extra {
                report.set_meta_data(extra.clone());
            }
        };

        trace!(
            channel = %record.channel,
            level = %record.level,
            severity = %severity,
            exception = record.has_exception(),
            "Forwarding record"
        );

        match &record.context.exception {
            Some(exception) => self.client.notify_exception(exception, &apply)?,
            None => self
                .client
                .notify_error(&record.message, &record.formatted, &apply)?,
        }

        Ok(())
    }
}
