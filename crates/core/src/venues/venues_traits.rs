//! Traits for venue profile storage.

use async_trait::async_trait;

use crate::Result;

use super::VenueProfile;

/// Pull-based sequence of venues. Items are fetched lazily; dropping the
/// iterator stops the underlying reads.
pub type VenueStream<'a> = Box<dyn Iterator<Item = Result<VenueProfile>> + Send + 'a>;

/// Read path over persisted venue profiles.
pub trait VenueProfileStore: Send + Sync {
    fn get_venue(&self, venue_id: &str) -> Result<Option<VenueProfile>>;
    /// Venues assigned to `node_id`, ordered by venue id.
    fn get_venues_by_node(&self, node_id: &str) -> Result<Vec<VenueProfile>>;
    /// Every venue, ordered by venue id.
    fn stream_all_venues(&self) -> Result<VenueStream<'_>>;
    fn count_venues(&self) -> Result<usize>;
}

/// Write path used by the ingestion side and by tests.
#[async_trait]
pub trait VenueWriterTrait: Send + Sync {
    async fn upsert_venue(&self, venue: VenueProfile) -> Result<VenueProfile>;
    async fn delete_venue(&self, venue_id: &str) -> Result<usize>;
}
