//! pushrelay - push notification fan-out relay
//!
//! A local runner for the relay handler: reads a JSON event (an array of
//! notification batches) from a file or stdin, delivers every notification
//! concurrently, and prints the aggregated result as JSON on stdout.

use anyhow::{Context, Result};
use clap::Parser;
use pushrelay::{
    cli::Cli,
    config::Config,
    dispatch::Dispatcher,
    handler,
    notification::expo::ExpoPushClient,
};
use serde_json::Value;
use std::io::Read;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration by layering sources: defaults, file, environment, and CLI args.
    let config = Config::load(&cli).context("Failed to load configuration")?;

    // Initialize logging. RUST_LOG takes precedence over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("pushrelay starting up...");
    info!("Log Level: {}", config.log_level);
    info!("Push Endpoint: {}", config.push.endpoint);
    info!("Request Timeout: {}ms", config.push.timeout_ms);

    let event = read_event(&cli).await?;

    let client = Arc::new(ExpoPushClient::new(&config.push)?);
    let dispatcher = Dispatcher::new(client);

    let response = handler::handle(&dispatcher, event).await;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

/// Reads the event JSON from the file given on the command line, or from
/// stdin when no file was given.
async fn read_event(cli: &Cli) -> Result<Value> {
    let raw = match &cli.event {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read event file {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read event from stdin")?;
            buf
        }
    };

    serde_json::from_str(&raw).context("Event input is not valid JSON")
}
