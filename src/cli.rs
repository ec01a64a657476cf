//! Command-Line Interface (CLI) argument parsing.
//!
//! This module defines the command-line arguments for the local runner using
//! the `clap` crate. These arguments are parsed at startup and then merged
//! with the configuration from the `pushrelay.toml` file and environment
//! variables.

use clap::Parser;
use figment::{
    value::{Dict, Map, Tag, Value},
    Error, Metadata, Profile, Provider,
};
use std::path::PathBuf;

/// Relays batches of push notifications to the push-delivery endpoint and
/// reports aggregated delivery results.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to a JSON file with the event (an array of notification
    /// batches). Reads stdin when omitted.
    #[arg(short, long, value_name = "FILE")]
    pub event: Option<PathBuf>,

    /// The push-delivery endpoint URL.
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Timeout for a single delivery request in milliseconds.
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut push = Dict::new();

        if let Some(endpoint) = &self.endpoint {
            push.insert("endpoint".into(), Value::from(endpoint.clone()));
        }

        if let Some(timeout) = self.timeout_ms {
            push.insert("timeout_ms".into(), Value::from(timeout));
        }

        let mut dict = Dict::new();
        if !push.is_empty() {
            dict.insert("push".into(), Value::Dict(Tag::Default, push));
        }

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}
