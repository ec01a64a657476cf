//! Configuration management for pushrelay
//!
//! This module defines the main `Config` struct, responsible for holding all
//! application settings. It uses the `figment` crate to layer defaults, a
//! `pushrelay.toml` file, environment variables, and command-line arguments.

use crate::cli::Cli;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// The main configuration struct for the application.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// The logging level for the application.
    pub log_level: String,
    /// Configuration for the outbound push-delivery client.
    pub push: PushConfig,
}

/// Configuration for the outbound push-delivery client.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PushConfig {
    /// The push-delivery endpoint URL.
    pub endpoint: String,
    /// Timeout for a single delivery request, in milliseconds.
    pub timeout_ms: u64,
}

impl Config {
    /// Loads the application configuration by layering sources: defaults,
    /// the TOML file, environment variables, and CLI arguments.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_file = cli
            .config
            .clone()
            .unwrap_or_else(|| "pushrelay.toml".into());

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            // Allow overriding with environment variables, e.g.
            // PUSHRELAY_PUSH__TIMEOUT_MS=5000
            .merge(Env::prefixed("PUSHRELAY_").split("__"))
            .merge(cli.clone())
            .extract()?;
        Ok(config)
    }
}

// Provide a default implementation for tests and easy setup.
impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            push: PushConfig::default(),
        }
    }
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://exp.host/--/api/v2/push/send".to_string(),
            timeout_ms: 10_000,
        }
    }
}
