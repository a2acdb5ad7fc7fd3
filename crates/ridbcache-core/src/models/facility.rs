//! Facility records and the cached facility shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::null_as_default;
use crate::cache::CampsiteIndex;

/// A facility as returned by `GET /facilities/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    #[serde(rename = "FacilityID", default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "FacilityName", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "FacilityDescription", default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "FacilityPhone", default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(rename = "FacilityEmail", default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(rename = "FacilityReservationURL", default, deserialize_with = "null_as_default")]
    pub reservation_url: String,
    #[serde(rename = "FacilityMapURL", default, deserialize_with = "null_as_default")]
    pub map_url: String,
    #[serde(rename = "FacilityLongitude", default, deserialize_with = "null_as_default")]
    pub longitude: f64,
    #[serde(rename = "FacilityLatitude", default, deserialize_with = "null_as_default")]
    pub latitude: f64,
    #[serde(rename = "StayLimit", default, deserialize_with = "null_as_default")]
    pub stay_limit: String,
    #[serde(rename = "Reservable", default, deserialize_with = "null_as_default")]
    pub reservable: bool,
}

/// A facility together with every campsite fetched for it.
///
/// Identifier and name come from the base record and never change; a
/// refresh replaces the whole value.
#[derive(Debug, Clone, Serialize)]
pub struct Facility {
    #[serde(flatten)]
    pub record: FacilityRecord,
    #[serde(rename = "Campsites")]
    pub campsites: CampsiteIndex,
    #[serde(rename = "FetchedAt")]
    pub fetched_at: DateTime<Utc>,
}

impl Facility {
    pub fn new(record: FacilityRecord, campsites: CampsiteIndex) -> Self {
        Self {
            record,
            campsites,
            fetched_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.fetched_at).num_minutes()
    }

    /// Human-readable age of the fetch that produced this value.
    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Covers clock skew as well
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            if minutes % 60 >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            if (minutes % 1440) / 60 >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }

    /// Format the coordinates as `lat, lon`, or None when RIDB had none.
    pub fn coordinates(&self) -> Option<String> {
        if self.record.latitude == 0.0 && self.record.longitude == 0.0 {
            None
        } else {
            Some(format!(
                "{:.5}, {:.5}",
                self.record.latitude, self.record.longitude
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn facility() -> Facility {
        let record = FacilityRecord {
            id: "232831".to_string(),
            name: "Lower Pines".to_string(),
            ..Default::default()
        };
        Facility::new(record, CampsiteIndex::new())
    }

    #[test]
    fn test_parse_facility_record() {
        let json = r#"{"FacilityID":"232450","FacilityName":"LOWER PINES","FacilityDescription":"<p>Valley floor</p>","FacilityPhone":"209-372-8502","FacilityEmail":"","FacilityReservationURL":"","FacilityMapURL":null,"FacilityLongitude":-119.5657,"FacilityLatitude":37.7405,"StayLimit":"7 nights","Reservable":true,"LastUpdatedDate":"2024-01-01"}"#;

        let record: FacilityRecord = serde_json::from_str(json).expect("facility should parse");
        assert_eq!(record.id, "232450");
        assert_eq!(record.name, "LOWER PINES");
        assert_eq!(record.map_url, "");
        assert_eq!(record.stay_limit, "7 nights");
        assert!(record.reservable);
        assert!((record.latitude - 37.7405).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_empty_facility_record() {
        // RIDB answers unknown ids with an empty object
        let record: FacilityRecord = serde_json::from_str("{}").expect("empty object parses");
        assert!(record.id.is_empty());
        assert!(!record.reservable);
    }

    #[test]
    fn test_age_display_just_now() {
        assert_eq!(facility().age_display(), "just now");
    }

    #[test]
    fn test_age_display_rounding() {
        let mut f = facility();
        f.fetched_at = Utc::now() - Duration::minutes(5);
        assert_eq!(f.age_display(), "5m ago");

        f.fetched_at = Utc::now() - Duration::minutes(95);
        assert_eq!(f.age_display(), "2h ago");

        f.fetched_at = Utc::now() - Duration::hours(26);
        assert_eq!(f.age_display(), "1d ago");
    }

    #[test]
    fn test_coordinates() {
        let mut f = facility();
        assert_eq!(f.coordinates(), None);

        f.record.latitude = 37.74;
        f.record.longitude = -119.56;
        assert_eq!(f.coordinates().as_deref(), Some("37.74000, -119.56000"));
    }

    #[test]
    fn test_serialize_includes_campsites() {
        let json = serde_json::to_value(facility()).expect("serializes");
        assert_eq!(json["FacilityID"], "232831");
        assert!(json["Campsites"].as_array().is_some_and(|a| a.is_empty()));
    }
}
