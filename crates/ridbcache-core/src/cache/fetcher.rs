//! Paginated campsite aggregation.
//!
//! RIDB only exposes a facility's campsites in pages. `PaginatedFetcher`
//! requests them one page at a time and merges each page into a
//! `CampsiteIndex` until the collection reaches the total the catalog
//! reports, or until the page ceiling is hit.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use super::{CampsiteIndex, CatalogError};
use crate::api::{ApiError, CampsitePage, RemoteCatalog};
use crate::config::DEFAULT_RECGOV_BASE_URL;
use crate::models::{Campsite, CampsiteRecord};

/// Campsites requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Most pages requested for one facility, first page included.
/// Facilities with more than `DEFAULT_PAGE_SIZE * DEFAULT_MAX_PAGES`
/// campsites come back truncated.
pub const DEFAULT_MAX_PAGES: usize = 5;

/// Upper bound on any single catalog call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct PaginatedFetcher {
    page_size: usize,
    max_pages: usize,
    call_timeout: Duration,
    display_base_url: String,
}

impl Default for PaginatedFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_RECGOV_BASE_URL)
    }
}

impl PaginatedFetcher {
    /// Create a fetcher whose campsites link to pages under
    /// `display_base_url`.
    pub fn new(display_base_url: impl Into<String>) -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            display_base_url: display_base_url.into(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Attach the display URL to a catalog record.
    pub fn produce_campsite(&self, record: CampsiteRecord) -> Campsite {
        Campsite::from_record(record, &self.display_base_url)
    }

    /// Await a catalog call, failing it once `call_timeout` elapses.
    pub(crate) async fn call<T, F>(&self, operation: &'static str, request: F) -> Result<T, CatalogError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        match tokio::time::timeout(self.call_timeout, request).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(CatalogError::Timeout {
                operation,
                after: self.call_timeout,
            }),
        }
    }

    async fn fetch_page<C>(
        &self,
        catalog: &C,
        facility_id: &str,
        offset: usize,
        query: Option<&str>,
    ) -> Result<CampsitePage, CatalogError>
    where
        C: RemoteCatalog + ?Sized,
    {
        debug!(facility_id, offset, limit = self.page_size, "Fetching campsite page");
        self.call(
            "fetch_campsite_page",
            catalog.fetch_campsite_page(facility_id, offset, self.page_size, query),
        )
        .await
    }

    /// Fetch every campsite of `facility_id`, optionally filtered by `query`.
    ///
    /// A reported total of zero yields an empty collection after a single
    /// request. Any failing page aborts the whole aggregation.
    pub async fn fetch_all<C>(
        &self,
        catalog: &C,
        facility_id: &str,
        query: Option<&str>,
    ) -> Result<CampsiteIndex, CatalogError>
    where
        C: RemoteCatalog + ?Sized,
    {
        let first = self.fetch_page(catalog, facility_id, 0, query).await?;
        let total = first.total_count;
        if total == 0 {
            debug!(facility_id, "Catalog reports no campsites");
            return Ok(CampsiteIndex::new());
        }

        let mut campsites =
            CampsiteIndex::with_items(first.items.into_iter().map(|r| self.produce_campsite(r)));

        let mut pages = 1;
        while campsites.len() < total && pages < self.max_pages {
            let offset = pages * self.page_size;
            let page = self.fetch_page(catalog, facility_id, offset, query).await?;
            pages += 1;

            if page.current_count == 0 || page.items.is_empty() {
                debug!(facility_id, offset, "Empty campsite page, skipping");
                continue;
            }
            campsites.add_many(page.items.into_iter().map(|r| self.produce_campsite(r)));
        }

        if campsites.len() < total {
            warn!(
                facility_id,
                fetched = campsites.len(),
                total,
                pages,
                "Campsite collection incomplete"
            );
        } else {
            debug!(facility_id, total, pages, "Fetched all campsites");
        }

        Ok(campsites)
    }
}
