//! Plain-text views of cached records.

use std::fmt::Write;

use ridbcache_core::{Campsite, CampsiteIndex, Facility};

use crate::utils::{format_length, format_phone, strip_html, truncate_string, yes_no};

/// Width of the campsite name column in listings
const NAME_WIDTH: usize = 24;

/// Width of the type-of-use column in listings
const USE_WIDTH: usize = 12;

/// Facility summary page: contact details, description and a campsite listing.
pub fn facility_page(facility: &Facility) -> String {
    let record = &facility.record;
    let mut out = String::new();

    let _ = writeln!(out, "{} ({})", record.name, record.id);
    let _ = writeln!(out, "Fetched:     {}", facility.age_display());
    if !record.phone.is_empty() {
        let _ = writeln!(out, "Phone:       {}", format_phone(&record.phone));
    }
    if !record.email.is_empty() {
        let _ = writeln!(out, "Email:       {}", record.email);
    }
    if let Some(coords) = facility.coordinates() {
        let _ = writeln!(out, "Location:    {}", coords);
    }
    if !record.stay_limit.is_empty() {
        let _ = writeln!(out, "Stay limit:  {}", record.stay_limit);
    }
    let _ = writeln!(out, "Reservable:  {}", yes_no(record.reservable));
    if !record.reservation_url.is_empty() {
        let _ = writeln!(out, "Reserve at:  {}", record.reservation_url);
    }

    let description = strip_html(&record.description);
    if !description.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", description);
    }

    let _ = writeln!(out);
    out.push_str(&campsite_list(&facility.campsites));
    out
}

/// One line per campsite, ordered by identifier.
pub fn campsite_list(campsites: &CampsiteIndex) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Campsites: {}", campsites.len());

    for site in campsites.sorted_by_id() {
        let max_length = site
            .max_equipment_length()
            .map(format_length)
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  {:>8}  {:<name_w$}  {:<use_w$}  {}",
            site.id(),
            truncate_string(site.name(), NAME_WIDTH),
            truncate_string(&site.record.type_of_use, USE_WIDTH),
            max_length,
            name_w = NAME_WIDTH,
            use_w = USE_WIDTH,
        );
    }
    out
}

/// Detail view of a single campsite.
pub fn campsite_detail(campsite: &Campsite) -> String {
    let record = &campsite.record;
    let mut out = String::new();

    let _ = writeln!(out, "{} ({})", record.name, record.id);
    if let Some(facility_id) = &record.facility_id {
        let _ = writeln!(out, "Facility:    {}", facility_id);
    }
    if let Some(loop_name) = &record.loop_name {
        let _ = writeln!(out, "Loop:        {}", loop_name);
    }
    if let Some(kind) = &record.campsite_type {
        let _ = writeln!(out, "Type:        {}", kind);
    }
    if !record.type_of_use.is_empty() {
        let _ = writeln!(out, "Use:         {}", record.type_of_use);
    }
    let _ = writeln!(out, "Reservable:  {}", yes_no(record.reservable));
    let _ = writeln!(out, "Page:        {}", campsite.url);

    if !record.permitted_equipment.is_empty() {
        let _ = writeln!(out, "Equipment:");
        for equipment in &record.permitted_equipment {
            let _ = writeln!(
                out,
                "  {:<20} {}",
                equipment.name,
                format_length(equipment.max_length)
            );
        }
    }

    if !record.attributes.is_empty() {
        let _ = writeln!(out, "Attributes:");
        let mut attributes: Vec<_> = record.attributes.iter().collect();
        attributes.sort_by(|a, b| a.name.cmp(&b.name));
        for attribute in attributes {
            let _ = writeln!(out, "  {:<20} {}", attribute.name, attribute.value);
        }
    }
    out
}
