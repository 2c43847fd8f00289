//! The per-source harvest loop.
//!
//! Pagination is an explicit little state machine: the harvester is
//! `Fetching` until it either sees an empty page (`Exhausted`), hits a fetch
//! error (`Failed`, fail-open: everything gathered so far is kept), or runs
//! into the safety page cap. Progress is reported through [`HarvestEvent`]s
//! so the caller decides between logging, progress bars, or silence.

use crate::client::CatalogClient;
use crate::normalize::normalize;
use crate::source::SourceProfile;
use anyhow::Result;
use cdp_common::types::CanonicalProduct;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Where the pagination loop currently is, or how it ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarvestState {
    /// Still requesting pages
    Fetching,
    /// Terminated by an empty page or the page cap
    Exhausted,
    /// Terminated by a transport or decode failure
    Failed,
}

/// Structured progress notification emitted during a harvest.
#[derive(Debug, Clone)]
pub enum HarvestEvent {
    /// A non-empty page was fetched and normalized
    PageFetched { page: u32, products: usize },
    /// A page request failed; the harvest stops after this event
    PageFailed { page: u32, error: String },
    /// One record was rejected by the normalizer and skipped
    RecordSkipped { product_id: String, reason: String },
    /// The harvest reached a terminal state
    Finished { state: HarvestState, pages: u32, records: usize },
}

/// Receives [`HarvestEvent`]s as the harvest progresses.
pub trait HarvestObserver {
    fn on_event(&mut self, event: &HarvestEvent);
}

/// Observer that discards all events.
pub struct NoopObserver;

impl HarvestObserver for NoopObserver {
    fn on_event(&mut self, _event: &HarvestEvent) {}
}

/// Outcome of one complete harvest pass.
#[derive(Debug)]
pub struct HarvestReport {
    pub records: Vec<CanonicalProduct>,
    /// Non-empty pages fetched
    pub pages: u32,
    /// Records rejected by the normalizer
    pub skipped: usize,
    /// Terminal state, never `Fetching`
    pub state: HarvestState,
}

/// Drives the page loop for one source.
pub struct Harvester {
    client: CatalogClient,
    profile: SourceProfile,
}

impl Harvester {
    pub fn new(profile: SourceProfile) -> Result<Self> {
        let client = CatalogClient::new(profile.page_size)?;
        Ok(Self { client, profile })
    }

    pub fn profile(&self) -> &SourceProfile {
        &self.profile
    }

    /// Harvest one collection to completion.
    ///
    /// Never fails: transport errors end the pagination early (fail-open)
    /// and whatever was gathered before the failure is returned. Each
    /// non-empty page is followed by the profile's courtesy delay.
    pub async fn harvest(
        &self,
        collection_handle: &str,
        observer: &mut dyn HarvestObserver,
    ) -> HarvestReport {
        let endpoint = self.profile.collection_endpoint(collection_handle);
        info!(
            source = %self.profile.key,
            collection = %collection_handle,
            "starting harvest"
        );

        let mut records = Vec::new();
        let mut skipped = 0usize;
        let mut pages = 0u32;
        let mut cursor = 1u32;
        let mut state = HarvestState::Fetching;

        while state == HarvestState::Fetching {
            if cursor > self.profile.max_pages {
                warn!(
                    source = %self.profile.key,
                    max_pages = self.profile.max_pages,
                    "page cap reached before endpoint signalled exhaustion"
                );
                state = HarvestState::Exhausted;
                break;
            }

            match self.client.fetch_page(&endpoint, cursor).await {
                Err(err) => {
                    warn!(page = cursor, error = %err, "page fetch failed, ending harvest");
                    observer.on_event(&HarvestEvent::PageFailed {
                        page: cursor,
                        error: err.to_string(),
                    });
                    state = HarvestState::Failed;
                }
                Ok(products) if products.is_empty() => {
                    debug!(page = cursor, "empty page, catalog exhausted");
                    state = HarvestState::Exhausted;
                }
                Ok(products) => {
                    let fetched = products.len();
                    for product in &products {
                        match normalize(product, &self.profile) {
                            Ok(record) => records.push(record),
                            Err(err) => {
                                skipped += 1;
                                warn!(product_id = product.id, error = %err, "record skipped");
                                observer.on_event(&HarvestEvent::RecordSkipped {
                                    product_id: product.id.to_string(),
                                    reason: err.to_string(),
                                });
                            }
                        }
                    }
                    observer.on_event(&HarvestEvent::PageFetched {
                        page: cursor,
                        products: fetched,
                    });
                    pages += 1;
                    cursor += 1;

                    // Courtesy pause after every non-empty page.
                    if self.profile.delay_ms > 0 {
                        tokio::time::sleep(Duration::from_millis(self.profile.delay_ms)).await;
                    }
                }
            }
        }

        info!(
            source = %self.profile.key,
            pages,
            records = records.len(),
            skipped,
            state = ?state,
            "harvest finished"
        );
        observer.on_event(&HarvestEvent::Finished {
            state,
            pages,
            records: records.len(),
        });

        HarvestReport {
            records,
            pages,
            skipped,
            state,
        }
    }
}
