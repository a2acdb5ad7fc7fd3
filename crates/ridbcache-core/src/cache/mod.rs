//! Process-local caching of RIDB facilities and campsites.
//!
//! This module provides:
//! - `DualIndexStore`: an in-memory collection indexed by id and by name,
//!   instantiated as `FacilityIndex` and `CampsiteIndex`
//! - `PaginatedFetcher`: assembles a facility's campsites across pages
//! - `CatalogCache`: the cache-or-fetch façade over a `RemoteCatalog`
//!
//! Nothing is persisted and nothing expires; entries are replaced only by
//! an explicit refresh.

pub mod error;
pub mod fetcher;
pub mod index;
pub mod manager;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::CatalogError;
pub use fetcher::{PaginatedFetcher, DEFAULT_CALL_TIMEOUT, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE};
pub use index::{CampsiteIndex, DualIndexStore, FacilityIndex, KeyFn, LookupType};
pub use manager::CatalogCache;
