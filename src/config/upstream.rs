//! Upstream marketplace client configuration.

use serde::Deserialize;

/// Settings for the marketplace HTTP client and its retry policy.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Site root, e.g. `https://www.vinted.pl`. The auth and catalog
    /// endpoints hang off this.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Items requested per catalog page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Maximum fetch attempts per cycle, re-authenticating between attempts.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base backoff between attempts; escalates linearly with the attempt
    /// number.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    /// Request timeout. A timeout is treated like any other HTTP failure.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

fn default_base_url() -> String {
    "https://www.vinted.pl".to_string()
}

fn default_per_page() -> u32 {
    96
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    2_000
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            per_page: default_per_page(),
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}
