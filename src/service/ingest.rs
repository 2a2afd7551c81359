//! Catalog ingestion: fetch, normalize, deduplicate, persist.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::adapter::media::MediaStore;
use crate::domain::{Category, Listing, ListingId};
use crate::error::Result;
use crate::port::{ListingStore, MarketplaceSource, RawListing};

/// Outcome of one category ingestion cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    /// Raw records the upstream returned.
    pub fetched: usize,
    /// Records dropped during normalization.
    pub skipped: usize,
    /// Records not seen before, after global dedup.
    pub fresh: usize,
    /// Rows the store actually accepted.
    pub inserted: usize,
}

/// Runs the fetch-normalize-dedup-persist cycle for one category at a time.
pub struct IngestService {
    source: Arc<dyn MarketplaceSource>,
    store: Arc<dyn ListingStore>,
    media: Arc<MediaStore>,
}

impl IngestService {
    #[must_use]
    pub fn new(
        source: Arc<dyn MarketplaceSource>,
        store: Arc<dyn ListingStore>,
        media: Arc<MediaStore>,
    ) -> Self {
        Self {
            source,
            store,
            media,
        }
    }

    /// Ingest the current catalog page for a category.
    ///
    /// Images are fetched only for records that survive dedup, so a listing
    /// already known from another category costs no download.
    ///
    /// # Errors
    /// Returns an error when the upstream fetch fails past its retry budget
    /// or the store rejects the batch. Failures are scoped to this category
    /// and cycle.
    pub async fn ingest_category(&self, category: &Category) -> Result<IngestReport> {
        let raw = self.source.fetch(category).await?;
        let known = self.store.known_ids()?;

        let mut report = IngestReport {
            fetched: raw.len(),
            ..IngestReport::default()
        };

        let mut fresh = Vec::new();
        for record in raw {
            let id = ListingId(record.id);
            if known.contains(&id) {
                continue;
            }
            match normalize(record, category) {
                Some((listing, image_url)) => fresh.push((listing, image_url)),
                None => report.skipped += 1,
            }
        }
        report.fresh = fresh.len();

        let mut batch = Vec::with_capacity(fresh.len());
        for (mut listing, image_url) in fresh {
            if let Some(url) = image_url {
                listing.image_path = self
                    .media
                    .fetch(&category.name, listing.unique_id, &url)
                    .await;
            }
            batch.push(listing);
        }

        report.inserted = self.store.insert_new(&batch)?;

        if report.inserted > 0 {
            info!(
                source = self.source.source_name(),
                category = %category.name,
                fetched = report.fetched,
                fresh = report.fresh,
                inserted = report.inserted,
                "ingested new listings"
            );
        } else {
            debug!(
                source = self.source.source_name(),
                category = %category.name,
                fetched = report.fetched,
                "no new listings"
            );
        }

        Ok(report)
    }
}

/// Shape a raw record into a domain listing, or reject it.
///
/// Title, price, and url are required; a record missing any of them cannot
/// be rendered and is dropped with a warning. Brand and size fall back to a
/// placeholder since the upstream omits them for some item types.
fn normalize(record: RawListing, category: &Category) -> Option<(Listing, Option<String>)> {
    let id = ListingId(record.id);

    let (Some(title), Some(price), Some(url)) = (record.title, record.price, record.url) else {
        warn!(listing_id = %id, category = %category.name, "record missing required fields");
        return None;
    };

    let listing = Listing {
        unique_id: id,
        title,
        price,
        brand_name: record.brand.unwrap_or_else(|| "-".into()),
        size: record.size.unwrap_or_else(|| "-".into()),
        url,
        image_path: None,
        category_id: category.id,
        discovered_at: Utc::now(),
    };

    Some((listing, record.image_url))
}
