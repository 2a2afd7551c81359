//! Vinted HTTP client with session lifecycle and bounded retry.
//!
//! The client holds one authenticated session: reqwest's cookie store keeps
//! the cookies the token-refresh endpoint sets, and every re-authentication
//! replaces them wholesale. A failed catalog fetch triggers re-auth and a
//! retry with escalating backoff, bounded by the configured attempt count;
//! exhaustion is fatal for that fetch cycle only.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client as HttpClient;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::catalog::{auth_url, search_url};
use super::dto::{decode_items, CatalogResponse};
use crate::config::UpstreamConfig;
use crate::domain::Category;
use crate::error::{Result, UpstreamError};
use crate::port::{MarketplaceSource, RawListing};

/// Browser-like user agent; the API rejects the reqwest default.
const VINTED_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101";

/// HTTP client for the Vinted catalog API.
pub struct VintedClient {
    http: HttpClient,
    base_url: String,
    per_page: u32,
    max_attempts: u32,
    backoff_ms: u64,
}

impl VintedClient {
    /// Create a client from upstream configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(VINTED_USER_AGENT));

        let http = HttpClient::builder()
            .cookie_store(true)
            .default_headers(headers)
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            per_page: config.per_page,
            max_attempts: config.max_attempts.max(1),
            backoff_ms: config.backoff_ms,
        })
    }

    /// Establish the initial session.
    ///
    /// Optional: a fetch that hits an expired session re-authenticates on
    /// its own, so a failure here is logged by the caller and not fatal.
    ///
    /// # Errors
    /// Returns [`UpstreamError::AuthFailed`] if the refresh endpoint
    /// rejects the request.
    pub async fn authenticate(&self) -> Result<()> {
        self.refresh_session().await
    }

    async fn refresh_session(&self) -> Result<()> {
        let url = auth_url(&self.base_url)?;
        let response = self
            .http
            .post(url)
            .send()
            .await
            .map_err(|e| UpstreamError::AuthFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(UpstreamError::AuthFailed(format!(
                "token refresh returned status {}",
                response.status()
            ))
            .into());
        }

        info!("upstream session refreshed");
        Ok(())
    }

    async fn fetch_page(&self, url: &url::Url) -> Result<Vec<serde_json::Value>> {
        let response = self.http.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(UpstreamError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            }
            .into());
        }

        let body: CatalogResponse = response.json().await?;
        Ok(body.items)
    }
}

/// Drive an attempt loop with session recovery and escalating backoff.
///
/// `recover` runs between attempts; its own failure is logged and does not
/// consume an attempt. Exhaustion yields
/// [`UpstreamError::RetriesExhausted`] carrying the last error seen.
async fn with_retries<T, F, Fut, R, RFut>(
    max_attempts: u32,
    backoff_ms: u64,
    context: &str,
    mut attempt: F,
    mut recover: R,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
    R: FnMut() -> RFut,
    RFut: std::future::Future<Output = Result<()>>,
{
    let mut last_error = String::new();

    for n in 1..=max_attempts {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                warn!(
                    context,
                    attempt = n,
                    max_attempts,
                    error = %err,
                    "fetch attempt failed"
                );
                last_error = err.to_string();

                if n == max_attempts {
                    break;
                }
                // Expired cookies are the usual culprit; refresh before the
                // next attempt and keep going even if that fails.
                if let Err(recover_err) = recover().await {
                    warn!(error = %recover_err, "session refresh failed");
                }
                sleep(Duration::from_millis(backoff_ms * u64::from(n))).await;
            }
        }
    }

    Err(UpstreamError::RetriesExhausted {
        attempts: max_attempts,
        last_error,
    }
    .into())
}

#[async_trait]
impl MarketplaceSource for VintedClient {
    async fn fetch(&self, category: &Category) -> Result<Vec<RawListing>> {
        let url = search_url(&self.base_url, category, self.per_page)?;

        let values = with_retries(
            self.max_attempts,
            self.backoff_ms,
            &category.name,
            || self.fetch_page(&url),
            || self.refresh_session(),
        )
        .await?;

        let listings = decode_items(values);
        debug!(
            category = %category.name,
            count = listings.len(),
            "catalog page fetched"
        );
        Ok(listings)
    }

    fn source_name(&self) -> &'static str {
        "Vinted"
    }
}
