use std::collections::HashMap;

use tracing::{debug, info, warn};

use super::{CampsiteIndex, CatalogError, FacilityIndex, LookupType, PaginatedFetcher};
use crate::api::{RemoteCatalog, RidbClient};
use crate::config::Config;
use crate::models::{Campsite, Facility};

/// Process-local cache in front of a `RemoteCatalog`.
///
/// Create one per process and pass it to whatever issues requests. Entries
/// never expire; a stale entry is replaced only when the caller asks for a
/// refresh. Mutating calls take `&mut self`, so fetch-and-store cycles never
/// interleave.
pub struct CatalogCache<C> {
    catalog: C,
    fetcher: PaginatedFetcher,
    facilities: FacilityIndex,
    campsites: CampsiteIndex,
    /// Requested facility id -> id the catalog returned, when they differ
    facility_aliases: HashMap<String, String>,
}

impl CatalogCache<RidbClient> {
    /// Build a cache backed by the RIDB HTTP client.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = RidbClient::from_config(config)?;
        Ok(Self::new(client, config.fetcher()))
    }
}

impl<C: RemoteCatalog> CatalogCache<C> {
    pub fn new(catalog: C, fetcher: PaginatedFetcher) -> Self {
        Self {
            catalog,
            fetcher,
            facilities: FacilityIndex::new(),
            campsites: CampsiteIndex::new(),
            facility_aliases: HashMap::new(),
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn facilities(&self) -> &FacilityIndex {
        &self.facilities
    }

    pub fn campsites(&self) -> &CampsiteIndex {
        &self.campsites
    }

    /// Return the facility, fetching it and all its campsites on a miss or
    /// when `refresh` is set.
    ///
    /// `Ok(None)` means the catalog has no such facility. On failure the
    /// cache is left exactly as it was.
    pub async fn get_facility(
        &mut self,
        facility_id: &str,
        refresh: bool,
    ) -> Result<Option<&Facility>, CatalogError> {
        let cached_id = self
            .facility_aliases
            .get(facility_id)
            .map(String::as_str)
            .unwrap_or(facility_id);
        if !refresh && self.facilities.contains(cached_id, LookupType::Id) {
            debug!(facility_id, "Facility served from cache");
            return Ok(self.facilities.get(cached_id, LookupType::Id));
        }

        let Some(facility) = self.fetch_facility(facility_id).await? else {
            debug!(facility_id, "Facility not found in catalog");
            return Ok(None);
        };

        if facility.id() != facility_id {
            warn!(
                facility_id,
                returned_id = facility.id(),
                "Catalog returned a different facility id"
            );
            self.facility_aliases
                .insert(facility_id.to_owned(), facility.id().to_owned());
        }

        for campsite in facility.campsites.iter() {
            self.campsites.add(campsite.clone());
        }
        info!(
            facility_id,
            name = facility.name(),
            campsites = facility.campsites.len(),
            refresh,
            "Facility stored"
        );
        Ok(Some(self.facilities.add(facility)))
    }

    /// Return the campsite, fetching it on a miss or when `refresh` is set.
    pub async fn get_campsite(
        &mut self,
        campsite_id: &str,
        refresh: bool,
    ) -> Result<Option<&Campsite>, CatalogError> {
        if !refresh && self.campsites.contains(campsite_id, LookupType::Id) {
            debug!(campsite_id, "Campsite served from cache");
            return Ok(self.campsites.get(campsite_id, LookupType::Id));
        }

        let result = self
            .fetcher
            .call("fetch_campsite", self.catalog.fetch_campsite(campsite_id, None))
            .await;
        let record = match result {
            Ok(record) if record.id.is_empty() => return Ok(None),
            Ok(record) => record,
            Err(err) if err.is_not_found() => {
                debug!(campsite_id, "Campsite not found in catalog");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        let campsite = self.fetcher.produce_campsite(record);
        info!(campsite_id, name = campsite.name(), refresh, "Campsite stored");
        Ok(Some(self.campsites.add(campsite)))
    }

    /// Resolve the facility (fetching it if needed) and return its campsites.
    pub async fn get_all_campsites(
        &mut self,
        facility_id: &str,
    ) -> Result<Option<&CampsiteIndex>, CatalogError> {
        Ok(self
            .get_facility(facility_id, false)
            .await?
            .map(|facility| &facility.campsites))
    }

    /// Fetch the facility's campsites matching `query`.
    ///
    /// Matches are merged into the campsite index; the facility entry, if
    /// any, is not touched.
    pub async fn search_campsites(
        &mut self,
        facility_id: &str,
        query: &str,
    ) -> Result<CampsiteIndex, CatalogError> {
        let found = self
            .fetcher
            .fetch_all(&self.catalog, facility_id, Some(query))
            .await?;

        self.campsites.add_many(found.iter().cloned());
        debug!(facility_id, query, matches = found.len(), "Campsite search stored");
        Ok(found)
    }

    /// Look up a cached facility by name without touching the network.
    pub fn facility_by_name(&self, name: &str) -> Option<&Facility> {
        self.facilities.get(name, LookupType::Name)
    }

    /// Look up a cached campsite by name without touching the network.
    pub fn campsite_by_name(&self, name: &str) -> Option<&Campsite> {
        self.campsites.get(name, LookupType::Name)
    }

    async fn fetch_facility(&self, facility_id: &str) -> Result<Option<Facility>, CatalogError> {
        let result = self
            .fetcher
            .call("fetch_facility", self.catalog.fetch_facility(facility_id))
            .await;
        let record = match result {
            Ok(record) if record.id.is_empty() => return Ok(None),
            Ok(record) => record,
            Err(err) if err.is_not_found() => return Ok(None),
            Err(err) => return Err(err),
        };

        let campsites = self
            .fetcher
            .fetch_all(&self.catalog, facility_id, None)
            .await?;
        Ok(Some(Facility::new(record, campsites)))
    }
}

// ============================================================================
// Tests
// ============================================================================
