//! Notification cycle: drain unpublished listings to subscribers.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::RenderedListing;
use crate::error::Result;
use crate::port::{CategoryRegistry, DeliveryChannel, DeliveryTracker, ListingStore};

/// Outcome of one notification cycle across all users.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NotifyReport {
    pub delivered: usize,
    /// Deliveries the channel rejected; retried on the next cycle.
    pub failed: usize,
}

/// Delivers each captured listing at most once per subscribed user.
///
/// A delivery is recorded only after the channel confirms it, so a crash or
/// channel failure between send and record can at worst repeat a listing,
/// never lose one.
pub struct NotifyService {
    registry: Arc<dyn CategoryRegistry>,
    store: Arc<dyn ListingStore>,
    tracker: Arc<dyn DeliveryTracker>,
    channel: Arc<dyn DeliveryChannel>,
    /// Pause between consecutive sends, keeps the channel under its rate
    /// limit.
    send_delay: Duration,
}

impl NotifyService {
    #[must_use]
    pub fn new(
        registry: Arc<dyn CategoryRegistry>,
        store: Arc<dyn ListingStore>,
        tracker: Arc<dyn DeliveryTracker>,
        channel: Arc<dyn DeliveryChannel>,
        send_delay: Duration,
    ) -> Self {
        Self {
            registry,
            store,
            tracker,
            channel,
            send_delay,
        }
    }

    /// Run one full notification cycle.
    ///
    /// Channel failures are counted and skipped, never recorded as
    /// delivered; the affected listings surface again next cycle.
    ///
    /// # Errors
    /// Returns an error when the registry or store cannot be read. Per-send
    /// failures do not abort the cycle.
    pub async fn run_cycle(&self) -> Result<NotifyReport> {
        let mut report = NotifyReport::default();

        for user in self.registry.active_users()? {
            for category in self.registry.subscriptions_for(user)? {
                let pending = self.store.unpublished_for(user, &category)?;
                if pending.is_empty() {
                    continue;
                }
                debug!(user = %user, category = %category.name, pending = pending.len(), "draining listings");

                for listing in &pending {
                    let rendered = RenderedListing::from(listing);
                    match self.channel.deliver(user, &rendered).await {
                        Ok(()) => {
                            self.tracker.mark_delivered(user, listing.unique_id)?;
                            report.delivered += 1;
                        }
                        Err(err) => {
                            warn!(
                                user = %user,
                                listing_id = %listing.unique_id,
                                error = %err,
                                "delivery failed, will retry next cycle"
                            );
                            report.failed += 1;
                        }
                    }
                    tokio::time::sleep(self.send_delay).await;
                }
            }
        }

        if report.delivered > 0 || report.failed > 0 {
            info!(
                delivered = report.delivered,
                failed = report.failed,
                "notification cycle finished"
            );
        }

        Ok(report)
    }
}
