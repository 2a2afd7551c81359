//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file; the bot token comes from the
//! `TELEGRAM_BOT_TOKEN` environment variable only, never from the file.
//!
//! # Example
//!
//! ```no_run
//! use thriftwatch::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

pub mod logging;
pub mod notifier;
pub mod scheduler;
pub mod upstream;

use std::path::Path;

use serde::Deserialize;

pub use logging::LoggingConfig;
pub use notifier::NotifierConfig;
pub use scheduler::SchedulerConfig;
pub use upstream::UpstreamConfig;

use crate::error::{ConfigError, Result};

/// Main application configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database: String,

    /// Directory for downloaded listing images, cleared on daily reset.
    #[serde(default = "default_media_dir")]
    pub media_dir: String,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Upstream marketplace client settings.
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Ingestion and reset timing.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Notification timing.
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Telegram bot token, loaded from the environment only.
    #[serde(skip)]
    pub bot_token: Option<String>,
}

fn default_database_path() -> String {
    "thriftwatch.db".to_string()
}

fn default_media_dir() -> String {
    "media".to_string()
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// Loads the bot token from the `TELEGRAM_BOT_TOKEN` environment
    /// variable (never from the config file).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML content is malformed
    /// - Validation fails (e.g., zero intervals, out-of-range reset hour)
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.bot_token = std::env::var("TELEGRAM_BOT_TOKEN").ok();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// malformed, or validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.database.is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }
        if self.upstream.base_url.is_empty() {
            return Err(ConfigError::MissingField { field: "base_url" }.into());
        }
        if self.upstream.per_page == 0 {
            return Err(ConfigError::InvalidValue {
                field: "per_page",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.upstream.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_attempts",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.scheduler.ingest_interval_mins == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ingest_interval_mins",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.scheduler.reset_hour > 23 {
            return Err(ConfigError::InvalidValue {
                field: "reset_hour",
                reason: "must be between 0 and 23".to_string(),
            }
            .into());
        }
        if self.scheduler.workers == 0 {
            return Err(ConfigError::InvalidValue {
                field: "workers",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.notifier.interval_mins == 0 {
            return Err(ConfigError::InvalidValue {
                field: "interval_mins",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
