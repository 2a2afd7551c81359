//! End-to-end pipeline tests over an in-memory database, with a scripted
//! marketplace source and a recording delivery channel.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::TempDir;

use thriftwatch::adapter::media::MediaStore;
use thriftwatch::adapter::sqlite::testing::setup_test_db;
use thriftwatch::adapter::sqlite::{
    DbPool, SqliteCategoryRegistry, SqliteDeliveryTracker, SqliteListingStore,
};
use thriftwatch::domain::{Category, ListingId, RenderedListing, UserId};
use thriftwatch::error::Result;
use thriftwatch::port::registry::User;
use thriftwatch::port::{
    CategoryRegistry, DeliveryChannel, DeliveryTracker, ListingStore, MarketplaceSource, RawListing,
};
use thriftwatch::service::{IngestService, NotifyService};

/// Source that serves a fixed page per category name; categories can be
/// scripted to fail instead.
struct FakeSource {
    pages: Mutex<Vec<(String, Vec<RawListing>)>>,
    failing: Mutex<HashSet<String>>,
}

impl FakeSource {
    fn new() -> Self {
        Self {
            pages: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
        }
    }

    fn set_page(&self, category: &str, page: Vec<RawListing>) {
        let mut pages = self.pages.lock().unwrap();
        pages.retain(|(name, _)| name != category);
        pages.push((category.to_string(), page));
    }

    fn set_failing(&self, category: &str) {
        self.failing.lock().unwrap().insert(category.to_string());
    }
}

#[async_trait]
impl MarketplaceSource for FakeSource {
    async fn fetch(&self, category: &Category) -> Result<Vec<RawListing>> {
        if self.failing.lock().unwrap().contains(&category.name) {
            return Err(thriftwatch::error::UpstreamError::RetriesExhausted {
                attempts: 3,
                last_error: "upstream down".into(),
            }
            .into());
        }
        let pages = self.pages.lock().unwrap();
        Ok(pages
            .iter()
            .find(|(name, _)| *name == category.name)
            .map(|(_, page)| page.clone())
            .unwrap_or_default())
    }

    fn source_name(&self) -> &'static str {
        "fake"
    }
}

/// Channel that records deliveries and optionally fails the first N sends.
struct RecordingChannel {
    sent: Mutex<Vec<(UserId, String)>>,
    fail_first: AtomicUsize,
}

impl RecordingChannel {
    fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_first: AtomicUsize::new(0),
        }
    }

    fn fail_next(&self, count: usize) {
        self.fail_first.store(count, Ordering::SeqCst);
    }

    fn sent(&self) -> Vec<(UserId, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeliveryChannel for RecordingChannel {
    async fn deliver(&self, user: UserId, listing: &RenderedListing) -> Result<()> {
        let remaining = self.fail_first.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_first.store(remaining - 1, Ordering::SeqCst);
            return Err(thriftwatch::Error::Delivery("scripted failure".into()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((user, listing.title.clone()));
        Ok(())
    }
}

struct Pipeline {
    source: Arc<FakeSource>,
    channel: Arc<RecordingChannel>,
    registry: Arc<SqliteCategoryRegistry>,
    store: Arc<SqliteListingStore>,
    tracker: Arc<SqliteDeliveryTracker>,
    ingest: IngestService,
    notify: NotifyService,
    _media_dir: TempDir,
}

fn pipeline(pool: DbPool) -> Pipeline {
    let source = Arc::new(FakeSource::new());
    let channel = Arc::new(RecordingChannel::new());
    let registry = Arc::new(SqliteCategoryRegistry::new(pool.clone()));
    let store = Arc::new(SqliteListingStore::new(pool.clone()));
    let tracker = Arc::new(SqliteDeliveryTracker::new(pool));
    let media_dir = TempDir::new().unwrap();
    let media = Arc::new(MediaStore::new(media_dir.path()).unwrap());

    let ingest = IngestService::new(
        Arc::clone(&source) as Arc<dyn MarketplaceSource>,
        Arc::clone(&store) as Arc<dyn ListingStore>,
        media,
    );
    let notify = NotifyService::new(
        Arc::clone(&registry) as Arc<dyn CategoryRegistry>,
        Arc::clone(&store) as Arc<dyn ListingStore>,
        Arc::clone(&tracker) as Arc<dyn DeliveryTracker>,
        Arc::clone(&channel) as Arc<dyn DeliveryChannel>,
        Duration::ZERO,
    );

    Pipeline {
        source,
        channel,
        registry,
        store,
        tracker,
        ingest,
        notify,
        _media_dir: media_dir,
    }
}

fn raw(id: i64, price: Decimal) -> RawListing {
    RawListing {
        id,
        title: Some(format!("item {id}")),
        price: Some(price),
        brand: Some("Nike".into()),
        size: Some("M".into()),
        url: Some(format!("https://example.test/items/{id}")),
        image_url: None,
    }
}

fn add_user(registry: &SqliteCategoryRegistry, id: i64, active: bool) {
    registry
        .upsert_user(&User {
            id: UserId(id),
            username: format!("user{id}"),
            first_name: "Anna".into(),
            active,
        })
        .unwrap();
}

#[tokio::test]
async fn repeated_ingest_only_inserts_unseen() {
    let p = pipeline(setup_test_db());
    let category = p.registry.create_category("nike kurtki", None).unwrap();

    p.source
        .set_page("nike kurtki", vec![raw(101, dec!(50)), raw(102, dec!(30))]);
    let first = p.ingest.ingest_category(&category).await.unwrap();
    assert_eq!(first.inserted, 2);

    p.source
        .set_page("nike kurtki", vec![raw(101, dec!(50)), raw(103, dec!(40))]);
    let second = p.ingest.ingest_category(&category).await.unwrap();
    assert_eq!(second.fresh, 1);
    assert_eq!(second.inserted, 1);

    let known: HashSet<_> = p.store.known_ids().unwrap();
    assert_eq!(
        known,
        [ListingId(101), ListingId(102), ListingId(103)]
            .into_iter()
            .collect()
    );
}

#[tokio::test]
async fn dedup_is_global_across_categories() {
    let p = pipeline(setup_test_db());
    let jackets = p.registry.create_category("nike kurtki", None).unwrap();
    let shoes = p.registry.create_category("nike buty", None).unwrap();

    p.source.set_page("nike kurtki", vec![raw(101, dec!(50))]);
    p.source.set_page("nike buty", vec![raw(101, dec!(50))]);

    assert_eq!(p.ingest.ingest_category(&jackets).await.unwrap().inserted, 1);

    // Same upstream id surfacing in another category is already known.
    let report = p.ingest.ingest_category(&shoes).await.unwrap();
    assert_eq!(report.fresh, 0);
    assert_eq!(report.inserted, 0);
}

#[tokio::test]
async fn each_listing_delivered_exactly_once() {
    let p = pipeline(setup_test_db());
    let category = p.registry.create_category("nike kurtki", None).unwrap();
    add_user(&p.registry, 7, true);
    p.registry.subscribe(UserId(7), category.id).unwrap();

    p.source
        .set_page("nike kurtki", vec![raw(101, dec!(50)), raw(102, dec!(30))]);
    p.ingest.ingest_category(&category).await.unwrap();

    let report = p.notify.run_cycle().await.unwrap();
    assert_eq!(report.delivered, 2);

    // Second cycle with no new listings sends nothing.
    let report = p.notify.run_cycle().await.unwrap();
    assert_eq!(report.delivered, 0);
    assert_eq!(p.channel.sent().len(), 2);
}

#[tokio::test]
async fn failed_delivery_is_retried_next_cycle() {
    let p = pipeline(setup_test_db());
    let category = p.registry.create_category("nike kurtki", None).unwrap();
    add_user(&p.registry, 7, true);
    p.registry.subscribe(UserId(7), category.id).unwrap();

    p.source.set_page("nike kurtki", vec![raw(101, dec!(50))]);
    p.ingest.ingest_category(&category).await.unwrap();

    p.channel.fail_next(1);
    let report = p.notify.run_cycle().await.unwrap();
    assert_eq!(report.delivered, 0);
    assert_eq!(report.failed, 1);
    assert!(!p.tracker.is_delivered(UserId(7), ListingId(101)).unwrap());

    let report = p.notify.run_cycle().await.unwrap();
    assert_eq!(report.delivered, 1);
    assert!(p.tracker.is_delivered(UserId(7), ListingId(101)).unwrap());
}

#[tokio::test]
async fn deliveries_ordered_by_brand_then_price() {
    let p = pipeline(setup_test_db());
    let category = p.registry.create_category("kurtki", None).unwrap();
    add_user(&p.registry, 7, true);
    p.registry.subscribe(UserId(7), category.id).unwrap();

    let mut cheap_adidas = raw(3, dec!(20));
    cheap_adidas.brand = Some("Adidas".into());
    p.source.set_page(
        "kurtki",
        vec![raw(1, dec!(50)), raw(2, dec!(30)), cheap_adidas],
    );
    p.ingest.ingest_category(&category).await.unwrap();
    p.notify.run_cycle().await.unwrap();

    let titles: Vec<String> = p.channel.sent().into_iter().map(|(_, t)| t).collect();
    assert_eq!(titles, vec!["item 3", "item 2", "item 1"]);
}

#[tokio::test]
async fn late_subscriber_receives_backlog() {
    let p = pipeline(setup_test_db());
    let category = p.registry.create_category("nike kurtki", None).unwrap();
    add_user(&p.registry, 7, true);
    p.registry.subscribe(UserId(7), category.id).unwrap();

    p.source.set_page("nike kurtki", vec![raw(101, dec!(50))]);
    p.ingest.ingest_category(&category).await.unwrap();
    p.notify.run_cycle().await.unwrap();

    // A second user subscribing later still gets the stored listing.
    add_user(&p.registry, 8, true);
    p.registry.subscribe(UserId(8), category.id).unwrap();
    let report = p.notify.run_cycle().await.unwrap();
    assert_eq!(report.delivered, 1);

    let sent = p.channel.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].0, UserId(8));
}

#[tokio::test]
async fn inactive_users_receive_nothing() {
    let p = pipeline(setup_test_db());
    let category = p.registry.create_category("nike kurtki", None).unwrap();
    add_user(&p.registry, 7, false);
    p.registry.subscribe(UserId(7), category.id).unwrap();

    p.source.set_page("nike kurtki", vec![raw(101, dec!(50))]);
    p.ingest.ingest_category(&category).await.unwrap();

    let report = p.notify.run_cycle().await.unwrap();
    assert_eq!(report.delivered, 0);
    assert!(p.channel.sent().is_empty());
}

#[tokio::test]
async fn unsubscribed_user_stops_receiving() {
    let p = pipeline(setup_test_db());
    let category = p.registry.create_category("nike kurtki", None).unwrap();
    add_user(&p.registry, 7, true);
    add_user(&p.registry, 8, true);
    p.registry.subscribe(UserId(7), category.id).unwrap();
    p.registry.subscribe(UserId(8), category.id).unwrap();

    p.registry.unsubscribe(UserId(7), category.id).unwrap();

    p.source.set_page("nike kurtki", vec![raw(101, dec!(50))]);
    p.ingest.ingest_category(&category).await.unwrap();
    p.notify.run_cycle().await.unwrap();

    let sent = p.channel.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, UserId(8));
}

#[tokio::test]
async fn reset_makes_relisted_items_deliverable_again() {
    let p = pipeline(setup_test_db());
    let category = p.registry.create_category("nike kurtki", None).unwrap();
    add_user(&p.registry, 7, true);
    p.registry.subscribe(UserId(7), category.id).unwrap();

    p.source.set_page("nike kurtki", vec![raw(101, dec!(50))]);
    p.ingest.ingest_category(&category).await.unwrap();
    p.notify.run_cycle().await.unwrap();
    assert_eq!(p.channel.sent().len(), 1);

    p.store.reset().unwrap();
    assert!(p.store.known_ids().unwrap().is_empty());

    p.ingest.ingest_category(&category).await.unwrap();
    let report = p.notify.run_cycle().await.unwrap();
    assert_eq!(report.delivered, 1);
    assert_eq!(p.channel.sent().len(), 2);
}

#[tokio::test]
async fn failing_category_does_not_affect_the_others() {
    let p = pipeline(setup_test_db());
    let bad = p.registry.create_category("nike kurtki", None).unwrap();
    let good = p.registry.create_category("polo", None).unwrap();
    add_user(&p.registry, 7, true);
    p.registry.subscribe(UserId(7), bad.id).unwrap();
    p.registry.subscribe(UserId(7), good.id).unwrap();

    p.source.set_failing("nike kurtki");
    p.source.set_page("polo", vec![raw(201, dec!(80))]);

    assert!(p.ingest.ingest_category(&bad).await.is_err());
    let report = p.ingest.ingest_category(&good).await.unwrap();
    assert_eq!(report.inserted, 1);

    // Delivery for the healthy category proceeds as usual.
    let report = p.notify.run_cycle().await.unwrap();
    assert_eq!(report.delivered, 1);
    assert_eq!(p.channel.sent()[0].1, "item 201");
}

#[tokio::test]
async fn malformed_records_skipped_without_aborting_batch() {
    let p = pipeline(setup_test_db());
    let category = p.registry.create_category("nike kurtki", None).unwrap();

    let mut broken = raw(102, dec!(30));
    broken.price = None;
    p.source
        .set_page("nike kurtki", vec![raw(101, dec!(50)), broken]);

    let report = p.ingest.ingest_category(&category).await.unwrap();
    assert_eq!(report.fetched, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.inserted, 1);
}
