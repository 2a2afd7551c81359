//! Wire-format DTOs for the Vinted catalog API.

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::warn;

use crate::port::RawListing;

/// Top-level catalog search response.
///
/// Items are kept as raw JSON values so one malformed record never aborts
/// decoding of the whole page; each is decoded individually by
/// [`decode_items`].
#[derive(Debug, Deserialize)]
pub struct CatalogResponse {
    #[serde(default)]
    pub items: Vec<serde_json::Value>,
}

/// One catalog item as the API returns it.
///
/// Everything except the id is optional at the wire level; normalization
/// decides what a usable listing requires.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogItem {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub brand_title: Option<String>,
    #[serde(default)]
    pub size_title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub photo: Option<CatalogPhoto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogPhoto {
    #[serde(default)]
    pub url: Option<String>,
}

impl From<CatalogItem> for RawListing {
    fn from(item: CatalogItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            price: item.price,
            brand: item.brand_title,
            size: item.size_title,
            url: item.url,
            image_url: item.photo.and_then(|p| p.url),
        }
    }
}

/// Decode raw catalog records, skipping the undecodable ones with a warning.
pub fn decode_items(values: Vec<serde_json::Value>) -> Vec<RawListing> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<CatalogItem>(value) {
            Ok(item) => Some(RawListing::from(item)),
            Err(err) => {
                warn!(error = %err, "skipping undecodable catalog record");
                None
            }
        })
        .collect()
}
