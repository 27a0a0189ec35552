//! Repository implementation for venue profiles.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use venuemap_core::errors::{Error, Result};
use venuemap_core::venues::{VenueProfile, VenueProfileStore, VenueStream, VenueWriterTrait};

use super::model::{assignments_for, VenueDB, VenueNodeAssignmentDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{venue_node_assignments, venues};

/// Rows fetched per page by `stream_all_venues`, and ids per `IN (...)` lookup.
const PAGE_SIZE: i64 = 500;

pub struct VenueRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl VenueRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

/// Attaches node assignments to venue rows, keeping row order.
fn hydrate(conn: &mut SqliteConnection, rows: Vec<VenueDB>) -> Result<Vec<VenueProfile>> {
    let mut nodes_by_venue: HashMap<String, BTreeSet<String>> = HashMap::new();
    for chunk in rows.chunks(PAGE_SIZE as usize) {
        let ids: Vec<&str> = chunk.iter().map(|row| row.id.as_str()).collect();
        let assignments = venue_node_assignments::table
            .filter(venue_node_assignments::venue_id.eq_any(ids))
            .load::<VenueNodeAssignmentDB>(conn)
            .into_core()?;
        for assignment in assignments {
            nodes_by_venue
                .entry(assignment.venue_id)
                .or_default()
                .insert(assignment.node_id);
        }
    }

    rows.into_iter()
        .map(|row| {
            let nodes = nodes_by_venue.remove(&row.id).unwrap_or_default();
            row.into_profile(nodes).map_err(Error::from)
        })
        .collect()
}

/// Keyset-paginated scan over `venues`, ordered by id.
struct VenuePages {
    pool: Arc<DbPool>,
    after: Option<String>,
    buffer: std::vec::IntoIter<VenueProfile>,
    exhausted: bool,
}

impl VenuePages {
    fn new(pool: Arc<DbPool>) -> Self {
        Self {
            pool,
            after: None,
            buffer: Vec::new().into_iter(),
            exhausted: false,
        }
    }

    fn fetch_page(&self) -> Result<Vec<VenueProfile>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = venues::table
            .select(VenueDB::as_select())
            .order(venues::id.asc())
            .limit(PAGE_SIZE)
            .into_boxed();
        if let Some(after) = &self.after {
            query = query.filter(venues::id.gt(after.clone()));
        }
        let rows = query.load::<VenueDB>(&mut conn).into_core()?;
        hydrate(&mut conn, rows)
    }
}

impl Iterator for VenuePages {
    type Item = Result<VenueProfile>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(venue) = self.buffer.next() {
                return Some(Ok(venue));
            }
            if self.exhausted {
                return None;
            }
            match self.fetch_page() {
                Ok(page) => {
                    if page.len() < PAGE_SIZE as usize {
                        self.exhausted = true;
                    }
                    if let Some(last) = page.last() {
                        self.after = Some(last.venue_id.clone());
                    }
                    self.buffer = page.into_iter();
                }
                Err(e) => {
                    self.exhausted = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl VenueProfileStore for VenueRepository {
    fn get_venue(&self, venue_id: &str) -> Result<Option<VenueProfile>> {
        let mut conn = get_connection(&self.pool)?;
        let row = venues::table
            .find(venue_id)
            .select(VenueDB::as_select())
            .first::<VenueDB>(&mut conn)
            .optional()
            .into_core()?;
        match row {
            Some(row) => Ok(hydrate(&mut conn, vec![row])?.pop()),
            None => Ok(None),
        }
    }

    fn get_venues_by_node(&self, node_id: &str) -> Result<Vec<VenueProfile>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = venues::table
            .inner_join(venue_node_assignments::table)
            .filter(venue_node_assignments::node_id.eq(node_id))
            .select(VenueDB::as_select())
            .order(venues::id.asc())
            .load::<VenueDB>(&mut conn)
            .into_core()?;
        debug!("Loaded {} venues for node '{}'", rows.len(), node_id);
        hydrate(&mut conn, rows)
    }

    fn stream_all_venues(&self) -> Result<VenueStream<'_>> {
        Ok(Box::new(VenuePages::new(Arc::clone(&self.pool))))
    }

    fn count_venues(&self) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        let count = venues::table
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

#[async_trait]
impl VenueWriterTrait for VenueRepository {
    async fn upsert_venue(&self, venue: VenueProfile) -> Result<VenueProfile> {
        let now = chrono::Utc::now().to_rfc3339();
        let row = VenueDB::from_profile(&venue, &now)?;
        let assignments = assignments_for(&venue);

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<VenueProfile> {
                let changeset = row.changeset();
                diesel::insert_into(venues::table)
                    .values(&row)
                    .on_conflict(venues::id)
                    .do_update()
                    .set(&changeset)
                    .execute(conn)
                    .into_core()?;

                diesel::delete(
                    venue_node_assignments::table
                        .filter(venue_node_assignments::venue_id.eq(&venue.venue_id)),
                )
                .execute(conn)
                .into_core()?;

                if !assignments.is_empty() {
                    diesel::insert_into(venue_node_assignments::table)
                        .values(&assignments)
                        .execute(conn)
                        .into_core()?;
                }

                Ok(venue)
            })
            .await
    }

    async fn delete_venue(&self, venue_id: &str) -> Result<usize> {
        let venue_id = venue_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(
                    venue_node_assignments::table
                        .filter(venue_node_assignments::venue_id.eq(&venue_id)),
                )
                .execute(conn)
                .into_core()?;
                diesel::delete(venues::table.find(&venue_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{open, spawn_writer};
    use tempfile::TempDir;
    use venuemap_core::taxonomies::VenueType;
    use venuemap_core::venues::Location;

    fn repository(dir: &TempDir) -> VenueRepository {
        let db_path = dir.path().join("venues.db");
        let pool = open(db_path.to_str().unwrap()).unwrap();
        let writer = spawn_writer(Arc::clone(&pool));
        VenueRepository::new(pool, writer)
    }

    fn venue(id: &str, nodes: &[&str]) -> VenueProfile {
        VenueProfile::new(id, 250, VenueType::Hybrid)
            .with_name(format!("Venue {}", id))
            .with_nodes(nodes.iter().copied())
            .with_amenities(["catering.in_house", "parking.valet"])
            .with_location(Location {
                region_code: "US".to_string(),
                city: Some("Austin".to_string()),
                latitude: Some(30.27),
                longitude: Some(-97.74),
            })
    }

    #[tokio::test]
    async fn test_upsert_and_read_back() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir);

        let stored = venue("v-1", &["barn", "vineyard"]);
        repo.upsert_venue(stored.clone()).await.unwrap();

        assert_eq!(repo.get_venue("v-1").unwrap(), Some(stored));
        assert_eq!(repo.get_venue("v-2").unwrap(), None);
    }

    #[tokio::test]
    async fn test_upsert_replaces_assignments() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir);

        repo.upsert_venue(venue("v-1", &["barn"])).await.unwrap();
        let mut updated = venue("v-1", &["ranch"]);
        updated.capacity = 900;
        repo.upsert_venue(updated).await.unwrap();

        assert!(repo.get_venues_by_node("barn").unwrap().is_empty());
        let ranch = repo.get_venues_by_node("ranch").unwrap();
        assert_eq!(ranch.len(), 1);
        assert_eq!(ranch[0].capacity, 900);
        assert_eq!(repo.count_venues().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_venues_by_node_keeps_all_assignments() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir);

        repo.upsert_venue(venue("v-2", &["barn", "marquee_tent"])).await.unwrap();
        repo.upsert_venue(venue("v-1", &["barn"])).await.unwrap();
        repo.upsert_venue(venue("v-3", &["ranch"])).await.unwrap();

        let barn = repo.get_venues_by_node("barn").unwrap();
        let ids: Vec<&str> = barn.iter().map(|v| v.venue_id.as_str()).collect();
        assert_eq!(ids, vec!["v-1", "v-2"]);
        assert!(barn[1].assigned_node_ids.contains("marquee_tent"));
    }

    #[tokio::test]
    async fn test_stream_all_venues_pages_in_id_order() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir);

        let total = PAGE_SIZE as usize + 7;
        for i in 0..total {
            repo.upsert_venue(venue(&format!("v-{:04}", i), &["barn"]))
                .await
                .unwrap();
        }

        let streamed: Vec<String> = repo
            .stream_all_venues()
            .unwrap()
            .map(|v| v.unwrap().venue_id)
            .collect();
        assert_eq!(streamed.len(), total);
        assert!(streamed.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_delete_venue() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir);

        repo.upsert_venue(venue("v-1", &["barn"])).await.unwrap();
        assert_eq!(repo.delete_venue("v-1").await.unwrap(), 1);
        assert_eq!(repo.delete_venue("v-1").await.unwrap(), 0);
        assert!(repo.get_venues_by_node("barn").unwrap().is_empty());
    }
}
