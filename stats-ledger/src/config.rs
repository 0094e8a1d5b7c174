//! Configuration for the statistics ledger service

use config::Environment;
use serde::{Deserialize, Serialize};
use std::env;

/// Service configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    pub server: ServerConfig,
    pub ledger: LedgerConfig,
}

/// HTTP listener configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

/// Ledger configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LedgerConfig {
    /// Trailing window for admission and statistics
    pub window_seconds: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                workers: 4,
            },
            ledger: LedgerConfig {
                window_seconds: crate::ledger::DEFAULT_WINDOW_SECONDS,
            },
        }
    }
}

impl Config {
    /// Load defaults, then `STATS_LEDGER__*` variables, then `SERVICE_PORT`
    pub fn from_env() -> crate::Result<Self> {
        let defaults = Config::default();

        let mut builder = config::Config::builder()
            // Server defaults
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("server.workers", defaults.server.workers as i64)?
            // Ledger defaults
            .set_default("ledger.window_seconds", defaults.ledger.window_seconds)?;

        builder = builder.add_source(Environment::with_prefix("STATS_LEDGER").separator("__"));

        if let Ok(port) = env::var("SERVICE_PORT") {
            builder = builder.set_override("server.port", port)?;
        }

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.ledger.window_seconds <= 0 {
            return Err(crate::Error::Config(format!(
                "ledger.window_seconds must be positive, got {}",
                self.ledger.window_seconds
            )));
        }
        if self.server.workers == 0 {
            return Err(crate::Error::Config(
                "server.workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// `host:port` pair for binding
    pub fn bind_addr(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}
