//! Handler for the `run` command.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tracing::{error, info, warn};

use crate::adapter::media::MediaStore;
use crate::adapter::sqlite::{
    self, SqliteCategoryRegistry, SqliteDeliveryTracker, SqliteListingStore,
};
use crate::adapter::telegram::TelegramChannel;
use crate::adapter::vinted::VintedClient;
use crate::config::Config;
use crate::error::Result;
use crate::port::{
    CategoryRegistry, DeliveryChannel, DeliveryTracker, ListingStore, MarketplaceSource,
    NullChannel,
};
use crate::service::{IngestService, NotifyService, Scheduler};

/// Execute the run command: wire the pipeline and drive it until a
/// shutdown signal arrives.
pub async fn execute(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    config.init_logging();
    info!("thriftwatch starting");

    let pool = sqlite::create_pool(&config.database, config.scheduler.workers)?;
    sqlite::run_migrations(&pool)?;

    let store: Arc<dyn ListingStore> = Arc::new(SqliteListingStore::new(pool.clone()));
    let registry: Arc<dyn CategoryRegistry> = Arc::new(SqliteCategoryRegistry::new(pool.clone()));
    let tracker: Arc<dyn DeliveryTracker> = Arc::new(SqliteDeliveryTracker::new(pool));
    let media = Arc::new(MediaStore::new(&config.media_dir)?);

    let source = VintedClient::from_config(&config.upstream)?;
    if let Err(err) = source.authenticate().await {
        // The fetch path re-authenticates on its own; startup goes on.
        warn!(error = %err, "initial session establishment failed");
    }
    let source: Arc<dyn MarketplaceSource> = Arc::new(source);

    let channel: Arc<dyn DeliveryChannel> = match config.bot_token.as_deref() {
        Some(token) => Arc::new(TelegramChannel::new(token)),
        None => {
            warn!("TELEGRAM_BOT_TOKEN not set; listings will be captured but not delivered");
            Arc::new(NullChannel)
        }
    };

    let ingest = Arc::new(IngestService::new(
        source,
        Arc::clone(&store),
        Arc::clone(&media),
    ));
    let notify = Arc::new(NotifyService::new(
        Arc::clone(&registry),
        Arc::clone(&store),
        tracker,
        channel,
        Duration::from_millis(config.notifier.send_delay_ms),
    ));
    let scheduler = Scheduler::new(
        ingest,
        notify,
        registry,
        store,
        media,
        config.scheduler.clone(),
        &config.notifier,
    );

    tokio::select! {
        result = scheduler.run() => {
            if let Err(e) = result {
                error!(error = %e, "Fatal error");
                return Err(e);
            }
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("thriftwatch stopped");
    Ok(())
}
