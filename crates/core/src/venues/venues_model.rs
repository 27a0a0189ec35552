//! Venue profile domain models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::taxonomies::VenueType;

/// Where a venue is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub region_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Location {
    pub fn region(region_code: impl Into<String>) -> Self {
        Self {
            region_code: region_code.into(),
            ..Default::default()
        }
    }
}

/// A tagged venue record, as written by the ingestion side.
///
/// `assigned_node_ids` is an unordered set: a venue tagged to several
/// subcategories holds each with equal standing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueProfile {
    pub venue_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub assigned_node_ids: BTreeSet<String>,
    #[serde(default)]
    pub amenity_tags: BTreeSet<String>,
    pub capacity: u32,
    #[serde(default)]
    pub location: Location,
    pub venue_type: VenueType,
}

impl VenueProfile {
    pub fn new(venue_id: impl Into<String>, capacity: u32, venue_type: VenueType) -> Self {
        Self {
            venue_id: venue_id.into(),
            name: String::new(),
            assigned_node_ids: BTreeSet::new(),
            amenity_tags: BTreeSet::new(),
            capacity,
            location: Location::default(),
            venue_type,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_nodes<I, S>(mut self, node_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assigned_node_ids = node_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_amenities<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.amenity_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }
}
