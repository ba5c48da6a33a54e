//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{load_config, ConfigError, RelayConfig};

#[derive(Debug, Parser)]
#[command(name = "api-relay", version)]
#[command(about = "Relays /<platform>/... requests to third-party API hosts", long_about = None)]
pub struct Cli {
    /// Port to listen on (overrides the config file)
    pub port: Option<u16>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host or IP to bind
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Log level used when RUST_LOG is unset
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Built-in defaults, overlaid by the config file, overlaid by flags.
    pub fn load_config(&self) -> Result<RelayConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => RelayConfig::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    pub fn apply(&self, config: &mut RelayConfig) {
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(bind) = &self.bind {
            config.listener.bind_host = bind.clone();
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
    }
}
