//! Campsite records and the cached campsite shape.

use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A campsite as returned by RIDB, either standalone or inside a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampsiteRecord {
    #[serde(rename = "CampsiteID", default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "CampsiteName", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "FacilityID", default, skip_serializing_if = "Option::is_none")]
    pub facility_id: Option<String>,
    #[serde(rename = "CampsiteType", default, skip_serializing_if = "Option::is_none")]
    pub campsite_type: Option<String>,
    #[serde(rename = "Loop", default, skip_serializing_if = "Option::is_none")]
    pub loop_name: Option<String>,
    #[serde(rename = "CampsiteLatitude", default, deserialize_with = "null_as_default")]
    pub latitude: f64,
    #[serde(rename = "CampsiteLongitude", default, deserialize_with = "null_as_default")]
    pub longitude: f64,
    #[serde(rename = "CampsiteReservable", default, deserialize_with = "null_as_default")]
    pub reservable: bool,
    #[serde(rename = "TypeOfUse", default, deserialize_with = "null_as_default")]
    pub type_of_use: String,
    #[serde(rename = "PERMITTEDEQUIPMENT", default, deserialize_with = "null_as_default")]
    pub permitted_equipment: Vec<PermittedEquipment>,
    #[serde(rename = "ATTRIBUTES", default, deserialize_with = "null_as_default")]
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermittedEquipment {
    #[serde(rename = "EquipmentName", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "MaxLength", default, deserialize_with = "null_as_default")]
    pub max_length: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(rename = "AttributeName", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "AttributeValue", default, deserialize_with = "null_as_default")]
    pub value: String,
}

/// A campsite record plus the recreation.gov page it is shown on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Campsite {
    #[serde(flatten)]
    pub record: CampsiteRecord,
    #[serde(rename = "CampsiteURL")]
    pub url: String,
}

impl Campsite {
    pub fn from_record(record: CampsiteRecord, display_base_url: &str) -> Self {
        let url = campsite_display_url(display_base_url, &record.id);
        Self { record, url }
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// Look up an attribute value by name, ignoring case.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.record
            .attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Longest permitted equipment length, if RIDB reported any.
    pub fn max_equipment_length(&self) -> Option<f64> {
        self.record
            .permitted_equipment
            .iter()
            .map(|e| e.max_length)
            .filter(|len| *len > 0.0)
            .fold(None, |acc, len| Some(acc.map_or(len, |a: f64| a.max(len))))
    }
}

/// Build the recreation.gov page URL for a campsite.
pub fn campsite_display_url(display_base_url: &str, campsite_id: &str) -> String {
    format!(
        "{}/camping/campsites/{}",
        display_base_url.trim_end_matches('/'),
        campsite_id
    )
}
