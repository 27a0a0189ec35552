//! Database models for venues.

use diesel::prelude::*;
use std::collections::BTreeSet;

use venuemap_core::taxonomies::VenueType;
use venuemap_core::venues::{Location, VenueProfile};

use crate::errors::StorageError;

/// Database model for venues
#[derive(Queryable, Identifiable, Selectable, Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::venues)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct VenueDB {
    pub id: String,
    pub name: String,
    pub capacity: i64,
    pub venue_type: String,
    pub region_code: String,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub amenity_tags: String, // JSON array
    pub created_at: String,   // RFC3339
    pub updated_at: String,   // RFC3339
}

/// Columns rewritten on upsert. `created_at` is kept from the first insert.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::venues)]
#[diesel(treat_none_as_null = true)]
pub struct VenueChangesetDB {
    pub name: String,
    pub capacity: i64,
    pub venue_type: String,
    pub region_code: String,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub amenity_tags: String,
    pub updated_at: String,
}

#[derive(Queryable, Selectable, Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::venue_node_assignments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct VenueNodeAssignmentDB {
    pub venue_id: String,
    pub node_id: String,
}

impl VenueDB {
    pub fn from_profile(venue: &VenueProfile, now: &str) -> Result<Self, StorageError> {
        Ok(Self {
            id: venue.venue_id.clone(),
            name: venue.name.clone(),
            capacity: i64::from(venue.capacity),
            venue_type: venue.venue_type.as_str().to_string(),
            region_code: venue.location.region_code.clone(),
            city: venue.location.city.clone(),
            latitude: venue.location.latitude,
            longitude: venue.location.longitude,
            amenity_tags: serde_json::to_string(&venue.amenity_tags)?,
            created_at: now.to_string(),
            updated_at: now.to_string(),
        })
    }

    pub fn changeset(&self) -> VenueChangesetDB {
        VenueChangesetDB {
            name: self.name.clone(),
            capacity: self.capacity,
            venue_type: self.venue_type.clone(),
            region_code: self.region_code.clone(),
            city: self.city.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            amenity_tags: self.amenity_tags.clone(),
            updated_at: self.updated_at.clone(),
        }
    }

    /// Rebuilds the domain profile from a row and its node assignments.
    pub fn into_profile(
        self,
        assigned_node_ids: BTreeSet<String>,
    ) -> Result<VenueProfile, StorageError> {
        let capacity = u32::try_from(self.capacity).map_err(|_| {
            StorageError::SerializationError(format!(
                "venue '{}' has out-of-range capacity {}",
                self.id, self.capacity
            ))
        })?;
        let venue_type: VenueType = self
            .venue_type
            .parse()
            .map_err(|e| StorageError::SerializationError(format!("venue '{}': {}", self.id, e)))?;
        let amenity_tags: BTreeSet<String> = serde_json::from_str(&self.amenity_tags)?;

        Ok(VenueProfile {
            venue_id: self.id,
            name: self.name,
            assigned_node_ids,
            amenity_tags,
            capacity,
            location: Location {
                region_code: self.region_code,
                city: self.city,
                latitude: self.latitude,
                longitude: self.longitude,
            },
            venue_type,
        })
    }
}

pub fn assignments_for(venue: &VenueProfile) -> Vec<VenueNodeAssignmentDB> {
    venue
        .assigned_node_ids
        .iter()
        .map(|node_id| VenueNodeAssignmentDB {
            venue_id: venue.venue_id.clone(),
            node_id: node_id.clone(),
        })
        .collect()
}
