//! Snag CLI
//!
//! Command-line interface for sending test reports and inspecting the
//! level to severity mapping.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use snag_client::config::DEFAULT_ENDPOINT;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "snag")]
#[command(about = "Forward log records to Bugsnag", long_about = None)]
struct Cli {
    /// Bugsnag project API key
    #[arg(long, env = "BUGSNAG_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Notify endpoint URL
    #[arg(long, env = "BUGSNAG_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Release stage reported with each event
    #[arg(long, env = "BUGSNAG_RELEASE_STAGE", default_value = "production")]
    release_stage: String,

    /// Application version reported with each event
    #[arg(long, env = "BUGSNAG_APP_VERSION")]
    app_version: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snag_cli=info,snag_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        api_key: cli.api_key,
        endpoint: cli.endpoint,
        release_stage: cli.release_stage,
        app_version: cli.app_version,
    };

    handle_command(cli.command, &config).await
}
