//! Format command handler
//!
//! Renders a record the way the handler would before reporting it.

use clap::Args;
use snag_core::{Formatter, Level, LineFormatter, LogRecord};
use snag_handler::SeverityMappingHandler;

use super::{collect_metadata, parse_key_val};

/// Arguments of `snag format`
#[derive(Args)]
pub struct FormatArgs {
    /// Log level name or ordinal
    #[arg(short, long, default_value = "info")]
    level: Level,

    /// Channel the record is logged on
    #[arg(short, long, default_value = "app")]
    channel: String,

    /// Log message
    #[arg(short, long)]
    message: String,

    /// Extra metadata as key=value pairs
    #[arg(short, long, value_parser = parse_key_val)]
    extra: Vec<(String, serde_json::Value)>,

    /// Template to use instead of the handler's default
    #[arg(short, long)]
    template: Option<String>,

    /// Use the handler's batch formatter
    #[arg(long, conflicts_with = "template")]
    batch: bool,
}

/// Handle the format command
pub fn handle_format_command(args: FormatArgs) {
    println!("{}", render(args));
}

fn render(args: FormatArgs) -> String {
    let formatter = match (&args.template, args.batch) {
        (Some(template), _) => LineFormatter::new(template.as_str()),
        (None, true) => SeverityMappingHandler::default_batch_formatter(),
        (None, false) => SeverityMappingHandler::default_formatter(),
    };

    let mut record = LogRecord::new(args.channel, args.level, args.message);
    if let Some(extra) = collect_metadata(args.extra) {
        record = record.with_extra(extra);
    }

    formatter.format(&record).trim_end_matches('\n').to_string()
}
