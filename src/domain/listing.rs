//! Captured marketplace listings.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::id::{CategoryId, ListingId};

/// A single marketplace item captured during ingestion.
///
/// Immutable once captured: re-fetching the same `unique_id` is a no-op,
/// never an update. Purged wholesale by the daily reset.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    /// Upstream-assigned identifier, the global dedup key.
    pub unique_id: ListingId,
    pub title: String,
    pub price: Decimal,
    pub brand_name: String,
    pub size: String,
    /// Link to the listing on the upstream site.
    pub url: String,
    /// Local path of the downloaded image, when the best-effort fetch
    /// succeeded.
    pub image_path: Option<String>,
    /// Category whose fetch cycle first discovered this listing.
    pub category_id: CategoryId,
    pub discovered_at: DateTime<Utc>,
}

/// Listing shaped for the delivery channel boundary.
///
/// Carries everything a channel needs to render a message; no storage or
/// upstream concerns leak through.
#[derive(Debug, Clone)]
pub struct RenderedListing {
    pub title: String,
    pub brand_name: String,
    pub size: String,
    pub price: Decimal,
    pub url: String,
    pub image_path: Option<String>,
}

impl From<&Listing> for RenderedListing {
    fn from(listing: &Listing) -> Self {
        Self {
            title: listing.title.clone(),
            brand_name: listing.brand_name.clone(),
            size: listing.size.clone(),
            price: listing.price,
            url: listing.url.clone(),
            image_path: listing.image_path.clone(),
        }
    }
}
