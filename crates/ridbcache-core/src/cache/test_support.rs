//! In-memory `RemoteCatalog` used by the cache tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::api::{ApiError, CampsitePage, RemoteCatalog};
use crate::models::{CampsiteRecord, FacilityRecord};

pub(crate) fn facility_record(id: &str, name: &str) -> FacilityRecord {
    FacilityRecord {
        id: id.to_string(),
        name: name.to_string(),
        ..Default::default()
    }
}

pub(crate) fn campsite_record(id: &str, name: &str) -> CampsiteRecord {
    CampsiteRecord {
        id: id.to_string(),
        name: name.to_string(),
        type_of_use: "Overnight".to_string(),
        ..Default::default()
    }
}

/// `count` campsites with ids `start..start + count`.
pub(crate) fn numbered_campsites(start: usize, count: usize) -> Vec<CampsiteRecord> {
    (start..start + count)
        .map(|n| campsite_record(&n.to_string(), &format!("Site {:03}", n)))
        .collect()
}

/// Campsites served for one facility, split into pages as the catalog
/// would return them.
#[derive(Debug, Clone, Default)]
pub(crate) struct Listing {
    pub total: usize,
    pub pages: Vec<Vec<CampsiteRecord>>,
}

impl Listing {
    pub fn new(total: usize, pages: Vec<Vec<CampsiteRecord>>) -> Self {
        Self { total, pages }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PageRequest {
    pub facility_id: String,
    pub offset: usize,
    pub limit: usize,
    pub query: Option<String>,
}

#[derive(Default)]
pub(crate) struct StubCatalog {
    facilities: Mutex<HashMap<String, FacilityRecord>>,
    facility_aliases: Mutex<HashMap<String, String>>,
    listings: Mutex<HashMap<String, Listing>>,
    campsites: Mutex<HashMap<String, CampsiteRecord>>,
    page_requests: Mutex<Vec<PageRequest>>,
    failing_page: Mutex<Option<usize>>,
    delay: Mutex<Option<Duration>>,
    facility_calls: AtomicUsize,
    page_calls: AtomicUsize,
    campsite_calls: AtomicUsize,
}

impl StubCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_facility(self, record: FacilityRecord, listing: Listing) -> Self {
        self.set_facility(record, listing);
        self
    }

    /// Serve the facility stored under `facility_id` when `requested` is asked for.
    pub fn with_facility_alias(self, requested: &str, facility_id: &str) -> Self {
        self.facility_aliases
            .lock()
            .unwrap()
            .insert(requested.to_string(), facility_id.to_string());
        self
    }

    pub fn with_campsite(self, record: CampsiteRecord) -> Self {
        self.set_campsite(record);
        self
    }

    pub fn set_facility(&self, record: FacilityRecord, listing: Listing) {
        self.listings
            .lock()
            .unwrap()
            .insert(record.id.clone(), listing);
        self.facilities
            .lock()
            .unwrap()
            .insert(record.id.clone(), record);
    }

    pub fn set_campsite(&self, record: CampsiteRecord) {
        self.campsites
            .lock()
            .unwrap()
            .insert(record.id.clone(), record);
    }

    pub fn set_listing(&self, facility_id: &str, listing: Listing) {
        self.listings
            .lock()
            .unwrap()
            .insert(facility_id.to_string(), listing);
    }

    /// Make the page at `page_index` fail with a server error.
    pub fn fail_page(&self, page_index: Option<usize>) {
        *self.failing_page.lock().unwrap() = page_index;
    }

    /// Delay every response by `delay`.
    pub fn delay_responses(&self, delay: Option<Duration>) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn facility_calls(&self) -> usize {
        self.facility_calls.load(Ordering::SeqCst)
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn campsite_calls(&self) -> usize {
        self.campsite_calls.load(Ordering::SeqCst)
    }

    pub fn page_requests(&self) -> Vec<PageRequest> {
        self.page_requests.lock().unwrap().clone()
    }

    async fn maybe_wait(&self) {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl RemoteCatalog for StubCatalog {
    async fn fetch_facility(&self, facility_id: &str) -> Result<FacilityRecord, ApiError> {
        self.facility_calls.fetch_add(1, Ordering::SeqCst);
        self.maybe_wait().await;

        let facility_id = self
            .facility_aliases
            .lock()
            .unwrap()
            .get(facility_id)
            .cloned()
            .unwrap_or_else(|| facility_id.to_string());
        let record = self.facilities.lock().unwrap().get(&facility_id).cloned();
        record.ok_or_else(|| ApiError::NotFound(format!("facility {}", facility_id)))
    }

    async fn fetch_campsite_page(
        &self,
        facility_id: &str,
        offset: usize,
        limit: usize,
        query: Option<&str>,
    ) -> Result<CampsitePage, ApiError> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        self.page_requests.lock().unwrap().push(PageRequest {
            facility_id: facility_id.to_string(),
            offset,
            limit,
            query: query.map(str::to_string),
        });
        self.maybe_wait().await;

        let page_index = offset / limit.max(1);
        let failing = *self.failing_page.lock().unwrap();
        if failing == Some(page_index) {
            return Err(ApiError::ServerError(format!("page {} unavailable", page_index)));
        }

        let listing = self
            .listings
            .lock()
            .unwrap()
            .get(facility_id)
            .cloned()
            .unwrap_or_default();
        let items = listing.pages.get(page_index).cloned().unwrap_or_default();

        Ok(CampsitePage {
            total_count: listing.total,
            current_count: items.len(),
            items,
        })
    }

    async fn fetch_campsite(
        &self,
        campsite_id: &str,
        _query: Option<&str>,
    ) -> Result<CampsiteRecord, ApiError> {
        self.campsite_calls.fetch_add(1, Ordering::SeqCst);
        self.maybe_wait().await;

        let record = self.campsites.lock().unwrap().get(campsite_id).cloned();
        record.ok_or_else(|| ApiError::NotFound(format!("campsite {}", campsite_id)))
    }
}
