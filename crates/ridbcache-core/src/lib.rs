//! Core library for ridbcache.
//!
//! Fetches facilities and their campsites from the RIDB catalog and keeps
//! them in a process-local cache indexed by id and by name.
//!
//! ```no_run
//! use ridbcache_core::{CatalogCache, Config};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let mut cache = CatalogCache::from_config(&config)?;
//!
//! if let Some(campsites) = cache.get_all_campsites("232450").await? {
//!     println!("{} campsites", campsites.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod models;

pub use api::{ApiError, CampsitePage, RemoteCatalog, RidbClient};
pub use cache::{
    CampsiteIndex, CatalogCache, CatalogError, DualIndexStore, FacilityIndex, LookupType,
    PaginatedFetcher,
};
pub use config::Config;
pub use models::{Campsite, CampsiteRecord, Facility, FacilityRecord};
