//! HTTP client for paginated collection endpoints.

use crate::types::{CollectionPage, RawProduct};
use anyhow::{Context, Result};
use std::time::Duration;

const USER_AGENT: &str = concat!("cdp-ingest/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Issues one GET per page against a source's collection endpoint.
///
/// The client is cheap to clone and reused for a whole harvest. It does not
/// pace requests; the harvester owns the courtesy delay between pages.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    page_size: u32,
}

impl CatalogClient {
    /// Build a client requesting `page_size` products per page.
    pub fn new(page_size: u32) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, page_size })
    }

    /// Fetch one page of a collection.
    ///
    /// An empty vec is the termination signal, not an error; the endpoint
    /// returns an absent or empty `products` array past the last page.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures, non-2xx statuses, and
    /// undecodable bodies. The harvester treats any of these as the end of
    /// that harvest (fail-open), never as a retryable condition.
    pub async fn fetch_page(&self, collection_url: &str, page: u32) -> Result<Vec<RawProduct>> {
        let response = self
            .http
            .get(collection_url)
            .query(&[("page", page.to_string()), ("limit", self.page_size.to_string())])
            .send()
            .await
            .with_context(|| format!("Request failed for page {page} of {collection_url}"))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("{collection_url} returned {status} for page {page}");
        }

        let body: CollectionPage = response
            .json()
            .await
            .with_context(|| format!("Undecodable body for page {page} of {collection_url}"))?;

        Ok(body.products)
    }
}
