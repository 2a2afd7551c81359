//! Timer loop driving ingestion, notification, and the daily reset.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use super::{IngestService, NotifyService};
use crate::adapter::media::MediaStore;
use crate::config::{NotifierConfig, SchedulerConfig};
use crate::error::Result;
use crate::port::{CategoryRegistry, ListingStore};

/// Drives the pipeline: periodic ingestion over all tracked categories,
/// periodic notification, and a daily store reset followed by a quiet
/// period.
///
/// Category cycles run concurrently up to the worker limit, each in its own
/// task; one category failing its fetch never touches the others. The
/// ingestion pass itself is detached from the timer loop, so notification
/// keeps its own cadence while categories are being fetched.
pub struct Scheduler {
    ingest: Arc<IngestService>,
    notify: Arc<NotifyService>,
    registry: Arc<dyn CategoryRegistry>,
    store: Arc<dyn ListingStore>,
    media: Arc<MediaStore>,
    config: SchedulerConfig,
    notify_interval: Duration,
    workers: Arc<Semaphore>,
    ingest_running: Arc<AtomicBool>,
    last_reset_day: Option<NaiveDate>,
    paused_until: Option<DateTime<Local>>,
}

impl Scheduler {
    #[must_use]
    pub fn new(
        ingest: Arc<IngestService>,
        notify: Arc<NotifyService>,
        registry: Arc<dyn CategoryRegistry>,
        store: Arc<dyn ListingStore>,
        media: Arc<MediaStore>,
        config: SchedulerConfig,
        notifier: &NotifierConfig,
    ) -> Self {
        let workers = Arc::new(Semaphore::new(config.workers));
        Self {
            ingest,
            notify,
            registry,
            store,
            media,
            notify_interval: Duration::from_secs(notifier.interval_mins * 60),
            workers,
            ingest_running: Arc::new(AtomicBool::new(false)),
            // Suppress the reset on the day the process starts inside the
            // reset hour; an operator restart must not wipe the store.
            last_reset_day: Some(Local::now().date_naive()),
            paused_until: None,
            config,
        }
    }

    /// Run the timer loop until the task is cancelled.
    ///
    /// # Errors
    /// Returns an error only when the category registry is unreadable at
    /// startup; runtime failures are logged per cycle and the loop keeps
    /// going.
    pub async fn run(mut self) -> Result<()> {
        let ingest_every = Duration::from_secs(self.config.ingest_interval_mins * 60);

        let mut ingest_timer = tokio::time::interval(ingest_every);
        let mut notify_timer = tokio::time::interval(self.notify_interval);
        let mut reset_timer = tokio::time::interval(Duration::from_secs(60));
        ingest_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        notify_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        info!(
            ingest_interval_mins = self.config.ingest_interval_mins,
            workers = self.config.workers,
            reset_hour = self.config.reset_hour,
            "scheduler started"
        );

        loop {
            tokio::select! {
                _ = ingest_timer.tick() => {
                    if self.paused(Local::now()) {
                        continue;
                    }
                    self.spawn_ingest_pass();
                }
                _ = notify_timer.tick() => {
                    if self.paused(Local::now()) {
                        continue;
                    }
                    if let Err(err) = self.notify.run_cycle().await {
                        error!(error = %err, "notification cycle failed");
                    }
                }
                _ = reset_timer.tick() => {
                    self.maybe_reset(Local::now());
                }
            }
        }
    }

    /// Dispatch an ingestion pass without blocking the timer loop.
    ///
    /// The pass runs detached so a slow upstream never delays notification
    /// ticks; a pass still in flight when the next tick fires is skipped
    /// rather than stacked.
    fn spawn_ingest_pass(&self) {
        if self.ingest_running.swap(true, Ordering::SeqCst) {
            warn!("previous ingestion pass still running, skipping this tick");
            return;
        }

        let ingest = Arc::clone(&self.ingest);
        let registry = Arc::clone(&self.registry);
        let workers = Arc::clone(&self.workers);
        let running = Arc::clone(&self.ingest_running);
        tokio::spawn(async move {
            run_ingest_pass(ingest, registry, workers).await;
            running.store(false, Ordering::SeqCst);
        });
    }

    /// Reset the store once per day at the configured hour.
    fn maybe_reset(&mut self, now: DateTime<Local>) {
        if !reset_due(self.config.reset_hour, self.last_reset_day, now) {
            return;
        }

        info!("daily reset: clearing listings, deliveries, and media");
        if let Err(err) = self.store.reset() {
            // Leave last_reset_day untouched so the next tick retries.
            error!(error = %err, "store reset failed");
            return;
        }
        if let Err(err) = self.media.clear() {
            warn!(error = %err, "media clear failed");
        }

        self.last_reset_day = Some(now.date_naive());
        if self.config.quiet_period_mins > 0 {
            let until = now + chrono::Duration::minutes(self.config.quiet_period_mins as i64);
            info!(until = %until, "quiet period started");
            self.paused_until = Some(until);
        }
    }

    fn paused(&mut self, now: DateTime<Local>) -> bool {
        match self.paused_until {
            Some(until) if now < until => true,
            Some(_) => {
                info!("quiet period over, resuming");
                self.paused_until = None;
                false
            }
            None => false,
        }
    }
}

/// Ingest every tracked category, bounded by the worker semaphore.
async fn run_ingest_pass(
    ingest: Arc<IngestService>,
    registry: Arc<dyn CategoryRegistry>,
    workers: Arc<Semaphore>,
) {
    let categories = match registry.list_categories() {
        Ok(categories) => categories,
        Err(err) => {
            error!(error = %err, "cannot list categories for ingestion");
            return;
        }
    };

    let mut tasks = JoinSet::new();
    for category in categories {
        let ingest = Arc::clone(&ingest);
        let workers = Arc::clone(&workers);
        tasks.spawn(async move {
            // Closed only on shutdown, when this task is dropped anyway.
            let Ok(_permit) = workers.acquire_owned().await else {
                return;
            };
            if let Err(err) = ingest.ingest_category(&category).await {
                error!(category = %category.name, error = %err, "ingestion cycle failed");
            }
        });
    }
    while let Some(joined) = tasks.join_next().await {
        if let Err(err) = joined {
            error!(error = %err, "ingestion task panicked");
        }
    }
}

/// Whether the daily reset should fire at `now`.
///
/// Due when the local clock is inside the reset hour and no reset has run
/// today yet.
fn reset_due(reset_hour: u32, last_reset_day: Option<NaiveDate>, now: DateTime<Local>) -> bool {
    use chrono::Timelike;
    now.hour() == reset_hour && last_reset_day != Some(now.date_naive())
}
