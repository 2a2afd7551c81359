//! Scheduler timing configuration.

use serde::Deserialize;

/// Timer intervals and the daily reset window.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Minutes between ingestion passes over the tracked categories.
    #[serde(default = "default_ingest_interval_mins")]
    pub ingest_interval_mins: u64,

    /// Local hour of day (0-23) at which the store is reset.
    #[serde(default)]
    pub reset_hour: u32,

    /// Minutes to pause ingestion and notification after a reset, while the
    /// store refills.
    #[serde(default = "default_quiet_period_mins")]
    pub quiet_period_mins: u64,

    /// Maximum concurrently running ingestion cycles.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_ingest_interval_mins() -> u64 {
    20
}

fn default_quiet_period_mins() -> u64 {
    300
}

fn default_workers() -> usize {
    4
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            ingest_interval_mins: default_ingest_interval_mins(),
            reset_hour: 0,
            quiet_period_mins: default_quiet_period_mins(),
            workers: default_workers(),
        }
    }
}
