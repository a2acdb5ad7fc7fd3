use async_trait::async_trait;

use super::ApiError;
use crate::models::{CampsiteRecord, FacilityRecord};

/// One page of a facility's campsites.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampsitePage {
    /// Number of campsites the catalog reports for the whole query.
    pub total_count: usize,
    /// Number of campsites the catalog reports on this page.
    pub current_count: usize,
    pub items: Vec<CampsiteRecord>,
}

/// Read access to the remote facility catalog.
///
/// Implementations report failures as `ApiError`; a missing entity should
/// be `ApiError::NotFound` so the cache can treat it as absent data.
#[async_trait]
pub trait RemoteCatalog: Send + Sync {
    /// Fetch a facility's base record, always requesting the full response.
    async fn fetch_facility(&self, facility_id: &str) -> Result<FacilityRecord, ApiError>;

    /// Fetch one page of campsites for a facility.
    async fn fetch_campsite_page(
        &self,
        facility_id: &str,
        offset: usize,
        limit: usize,
        query: Option<&str>,
    ) -> Result<CampsitePage, ApiError>;

    /// Fetch a single campsite by id.
    async fn fetch_campsite(
        &self,
        campsite_id: &str,
        query: Option<&str>,
    ) -> Result<CampsiteRecord, ApiError>;
}
