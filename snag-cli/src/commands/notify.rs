//! Notify command handler
//!
//! Builds a log record from the command line, passes it through a
//! severity-mapping handler backed by the Bugsnag client and waits until the
//! report has been delivered.

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use snag_client::{BugsnagClient, DeliveryStats};
use snag_core::{ExceptionRef, Level, LogRecord};
use snag_handler::{Handler, SeverityMappingHandler};
use std::sync::Arc;
use tracing::info;

use super::{collect_metadata, parse_key_val};
use crate::config::Config;

/// Arguments of `snag notify`
#[derive(Args)]
pub struct NotifyArgs {
    /// Log level name or ordinal
    #[arg(short, long, default_value = "error")]
    level: Level,

    /// Channel the record is logged on
    #[arg(short, long, default_value = "app")]
    channel: String,

    /// Log message
    #[arg(short, long)]
    message: String,

    /// Extra metadata as key=value pairs (e.g., free_gb=2 host=web-1)
    #[arg(short, long, value_parser = parse_key_val)]
    extra: Vec<(String, serde_json::Value)>,

    /// Attach an exception with this message
    #[arg(long)]
    exception: Option<String>,

    /// Class reported for the attached exception
    #[arg(long, default_value = "Exception", requires = "exception")]
    exception_class: String,
}

impl NotifyArgs {
    fn into_record(self) -> LogRecord {
        let mut record = LogRecord::new(self.channel, self.level, self.message);

        if let Some(extra) = collect_metadata(self.extra) {
            record = record.with_extra(extra);
        }

        if let Some(text) = self.exception {
            let error = Arc::new(std::io::Error::other(text));
            record = record.with_exception(ExceptionRef::from_arc(self.exception_class, error));
        }

        record
    }
}

/// Handle the notify command
pub async fn handle_notify_command(args: NotifyArgs, config: &Config) -> Result<()> {
    let (client, delivery) = BugsnagClient::new(config.client_config()?)
        .context("Failed to create reporting client")?;
    let delivery = delivery.spawn();

    let handler = SeverityMappingHandler::new(Arc::new(client));
    let record = args.into_record();
    let severity = handler.severity_for(record.level);

    info!(
        "Reporting {} record on channel '{}' as {}",
        record.level, record.channel, severity
    );
    handler.handle(record).context("Failed to submit report")?;

    // Dropping the handler releases the last client handle and lets the
    // delivery task finish.
    drop(handler);
    let stats = delivery.await.context("Delivery task failed")?;

    print_delivery_summary(&stats, config);
    Ok(())
}

fn print_delivery_summary(stats: &DeliveryStats, config: &Config) {
    if stats.failed > 0 {
        println!(
            "{} {} report(s) failed, see log output",
            "✗".red(),
            stats.failed
        );
    } else if stats.sent == 0 {
        println!(
            "{}",
            format!(
                "No report sent for release stage '{}'.",
                config.release_stage
            )
            .yellow()
        );
    } else {
        println!(
            "{} {} report(s) delivered to {}",
            "✓".green(),
            stats.sent,
            config.endpoint.dimmed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args() -> NotifyArgs {
        NotifyArgs {
            level: Level::WARNING,
            channel: "app".to_string(),
            message: "disk low".to_string(),
            extra: vec![("free_gb".to_string(), json!(2))],
            exception: None,
            exception_class: "Exception".to_string(),
        }
    }

    #[test]
    fn test_into_record() {
        let record = args().into_record();

        assert_eq!(record.level, Level::WARNING);
        assert_eq!(record.channel, "app");
        assert_eq!(record.message, "disk low");
        assert!(!record.has_exception());
        assert_eq!(record.extra.unwrap().get("free_gb"), Some(&json!(2)));
    }

    #[test]
    fn test_into_record_with_exception() {
        let mut args = args();
        args.extra.clear();
        args.exception = Some("quota exceeded".to_string());
        args.exception_class = "QuotaError".to_string();

        let record = args.into_record();

        assert!(record.extra.is_none());
        let exception = record.context.exception.unwrap();
        assert_eq!(exception.class(), "QuotaError");
        assert_eq!(exception.message(), "quota exceeded");
    }
}
