//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod format;
mod notify;
mod severity;

pub use format::FormatArgs;
pub use notify::NotifyArgs;

use anyhow::{Result, anyhow};
use clap::Subcommand;
use snag_core::{Level, Metadata};

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Send one log record through the severity-mapping handler
    Notify(NotifyArgs),
    /// Show which severity a level is reported with
    Severity {
        /// Level name or ordinal; all standard levels when omitted
        level: Option<Level>,
    },
    /// Render a record with the handler's formatter
    Format(FormatArgs),
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Notify(args) => notify::handle_notify_command(args, config).await,
        Commands::Severity { level } => {
            severity::handle_severity_command(level);
            Ok(())
        }
        Commands::Format(args) => {
            format::handle_format_command(args);
            Ok(())
        }
    }
}

/// Parse a single key=value pair
///
/// The value is read as JSON when it parses (`free_gb=2` gives a number),
/// and kept as a plain string otherwise.
fn parse_key_val(s: &str) -> Result<(String, serde_json::Value)> {
    let pos = s
        .find('=')
        .ok_or_else(|| anyhow!("invalid KEY=value: no `=` found in `{}`", s))?;

    let raw = &s[pos + 1..];
    let value = serde_json::from_str(raw)
        .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
    Ok((s[..pos].to_string(), value))
}

/// Collects key=value pairs into record metadata, `None` when there are none
fn collect_metadata(pairs: Vec<(String, serde_json::Value)>) -> Option<Metadata> {
    if pairs.is_empty() {
        return None;
    }
    Some(pairs.into_iter().collect())
}
