//! Notifier timing configuration.

use serde::Deserialize;

/// Notification cadence, decoupled from ingestion timing.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifierConfig {
    /// Minutes between notification passes.
    #[serde(default = "default_interval_mins")]
    pub interval_mins: u64,

    /// Delay between consecutive sends to one user, to stay under channel
    /// rate limits.
    #[serde(default = "default_send_delay_ms")]
    pub send_delay_ms: u64,
}

fn default_interval_mins() -> u64 {
    5
}

fn default_send_delay_ms() -> u64 {
    1_000
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            interval_mins: default_interval_mins(),
            send_delay_ms: default_send_delay_ms(),
        }
    }
}
