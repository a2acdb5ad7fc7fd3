//! Data models for RIDB entities.
//!
//! This module contains the records returned by the RIDB catalog and the
//! cache-side shapes built from them:
//!
//! - `FacilityRecord`, `Facility`: recreation areas and their campsites
//! - `CampsiteRecord`, `Campsite`: individual sites with equipment and
//!   attribute metadata

pub mod campsite;
pub mod facility;

pub use campsite::{campsite_display_url, Attribute, Campsite, CampsiteRecord, PermittedEquipment};
pub use facility::{Facility, FacilityRecord};

use serde::{Deserialize, Deserializer};

/// RIDB sends `null` for fields it has no value for; treat those like
/// missing fields.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
