//! Catalog search URL construction.

use url::Url;

use crate::domain::Category;
use crate::error::Result;

/// Path of the catalog search endpoint under the site root.
pub const CATALOG_ENDPOINT: &str = "/api/v2/catalog/items";

/// Path of the session/token refresh endpoint.
pub const AUTH_ENDPOINT: &str = "/auth/token_refresh";

/// Build the catalog search URL for one category.
///
/// The search text is the category name; the brand filter becomes the
/// `brand_ids` parameter when present. Only the first page is requested:
/// the fixed ingestion cadence keeps up with the listing flow.
///
/// # Errors
/// Returns an error if the base URL is not parseable.
pub fn search_url(base_url: &str, category: &Category, per_page: u32) -> Result<Url> {
    let mut url = Url::parse(base_url)?.join(CATALOG_ENDPOINT)?;
    url.query_pairs_mut()
        .append_pair("search_text", category.name.trim())
        .append_pair("brand_ids", category.brand_id.as_deref().unwrap_or(""))
        .append_pair("page", "1")
        .append_pair("per_page", &per_page.to_string());
    Ok(url)
}

/// Build the token-refresh URL for the configured site root.
///
/// # Errors
/// Returns an error if the base URL is not parseable.
pub fn auth_url(base_url: &str) -> Result<Url> {
    Ok(Url::parse(base_url)?.join(AUTH_ENDPOINT)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CategoryId;

    fn category(name: &str) -> Category {
        Category::new(CategoryId(1), name)
    }

    #[test]
    fn search_url_encodes_spaces() {
        let url = search_url("https://www.vinted.pl", &category("nike kurtki"), 96).unwrap();
        assert_eq!(url.host_str(), Some("www.vinted.pl"));
        assert_eq!(url.path(), "/api/v2/catalog/items");
        assert!(url.query().unwrap().contains("search_text=nike+kurtki"));
        assert!(url.query().unwrap().contains("per_page=96"));
    }

    #[test]
    fn search_url_includes_brand_filter() {
        let cat = category("polo").with_brand("88");
        let url = search_url("https://www.vinted.pl", &cat, 24).unwrap();
        assert!(url.query().unwrap().contains("brand_ids=88"));
    }

    #[test]
    fn search_url_empty_brand_when_unset() {
        let url = search_url("https://www.vinted.pl", &category("polo"), 24).unwrap();
        assert!(url.query().unwrap().contains("brand_ids=&"));
    }

    #[test]
    fn search_url_trims_category_name() {
        let url = search_url("https://www.vinted.pl", &category("  polo  "), 24).unwrap();
        assert!(url.query().unwrap().contains("search_text=polo&"));
    }

    #[test]
    fn auth_url_points_at_token_refresh() {
        let url = auth_url("https://www.vinted.pl").unwrap();
        assert_eq!(url.as_str(), "https://www.vinted.pl/auth/token_refresh");
    }

    #[test]
    fn invalid_base_url_rejected() {
        assert!(search_url("not a url", &category("polo"), 24).is_err());
    }
}
