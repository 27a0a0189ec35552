//! Concurrent in-memory venue store.

use async_trait::async_trait;
use dashmap::DashMap;
use log::info;
use std::path::Path;

use crate::errors::{Error, Result};

use super::{VenueProfile, VenueProfileStore, VenueStream, VenueWriterTrait};

/// Venue store backed by a concurrent map. Used for file-seeded deployments
/// and tests.
#[derive(Debug, Default)]
pub struct InMemoryVenueStore {
    venues: DashMap<String, VenueProfile>,
}

impl InMemoryVenueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_venues(venues: impl IntoIterator<Item = VenueProfile>) -> Self {
        let store = Self::new();
        for venue in venues {
            store.insert(venue);
        }
        store
    }

    /// Loads a JSON array of venue profiles.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigIO(format!("{}: {}", path.display(), e)))?;
        let venues: Vec<VenueProfile> = serde_json::from_str(&json)?;
        let store = Self::from_venues(venues);
        info!(
            "Loaded {} venues from {}",
            store.venues.len(),
            path.display()
        );
        Ok(store)
    }

    /// Inserts or replaces a venue, returning the previous record.
    pub fn insert(&self, venue: VenueProfile) -> Option<VenueProfile> {
        self.venues.insert(venue.venue_id.clone(), venue)
    }

    fn sorted(&self, filter: impl Fn(&VenueProfile) -> bool) -> Vec<VenueProfile> {
        let mut venues: Vec<VenueProfile> = self
            .venues
            .iter()
            .filter(|entry| filter(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        venues.sort_by(|a, b| a.venue_id.cmp(&b.venue_id));
        venues
    }
}

impl VenueProfileStore for InMemoryVenueStore {
    fn get_venue(&self, venue_id: &str) -> Result<Option<VenueProfile>> {
        Ok(self.venues.get(venue_id).map(|entry| entry.value().clone()))
    }

    fn get_venues_by_node(&self, node_id: &str) -> Result<Vec<VenueProfile>> {
        Ok(self.sorted(|venue| venue.assigned_node_ids.contains(node_id)))
    }

    fn stream_all_venues(&self) -> Result<VenueStream<'_>> {
        // Copy out first so no shard lock is held while the caller iterates.
        Ok(Box::new(self.sorted(|_| true).into_iter().map(Ok)))
    }

    fn count_venues(&self) -> Result<usize> {
        Ok(self.venues.len())
    }
}

#[async_trait]
impl VenueWriterTrait for InMemoryVenueStore {
    async fn upsert_venue(&self, venue: VenueProfile) -> Result<VenueProfile> {
        self.insert(venue.clone());
        Ok(venue)
    }

    async fn delete_venue(&self, venue_id: &str) -> Result<usize> {
        Ok(self.venues.remove(venue_id).map_or(0, |_| 1))
    }
}
