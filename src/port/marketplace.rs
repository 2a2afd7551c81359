//! Upstream marketplace port.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::Category;
use crate::error::Result;

/// One raw catalog record as the upstream returned it.
///
/// Fields the upstream may omit stay optional here; normalization into a
/// [`crate::domain::Listing`] decides what is required and skips records
/// that fall short.
#[derive(Debug, Clone)]
pub struct RawListing {
    /// Upstream-assigned identifier.
    pub id: i64,
    pub title: Option<String>,
    pub price: Option<Decimal>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub url: Option<String>,
    /// Remote image URL, downloaded best-effort during ingestion.
    pub image_url: Option<String>,
}

/// A marketplace capable of serving catalog searches.
///
/// One implementation per marketplace, selected at configuration time. The
/// implementation owns its session lifecycle: an expired session is
/// refreshed and the request retried internally, bounded by the configured
/// attempt count. Callers only ever see the final outcome.
#[async_trait]
pub trait MarketplaceSource: Send + Sync {
    /// Fetch the current raw catalog page for a category.
    ///
    /// # Errors
    /// Returns [`crate::error::UpstreamError::RetriesExhausted`] once the
    /// bounded re-auth/retry policy gives up; the failure is fatal for this
    /// fetch cycle only.
    async fn fetch(&self, category: &Category) -> Result<Vec<RawListing>>;

    /// Marketplace name for logging.
    fn source_name(&self) -> &'static str;
}
