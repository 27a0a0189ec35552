//! Traits for the taxonomy service.

use std::sync::Arc;

use crate::Result;

use super::{SnapshotSummary, TaxonomyNode, TaxonomyRegistry, TaxonomySnapshot};

/// Service trait for taxonomy lookups and snapshot publishing.
pub trait TaxonomyServiceTrait: Send + Sync {
    /// The registry active right now; hold it for the length of a request.
    fn current(&self) -> Arc<TaxonomyRegistry>;
    fn summary(&self) -> SnapshotSummary;

    // Lookups against the active snapshot
    fn get_node(&self, node_id: &str) -> Result<TaxonomyNode>;
    fn descendants_of(&self, category_id: &str) -> Result<Vec<TaxonomyNode>>;
    fn categories(&self) -> Vec<TaxonomyNode>;

    // Publishing
    fn load_taxonomy_snapshot(
        &self,
        version: &str,
        snapshot: TaxonomySnapshot,
    ) -> Result<SnapshotSummary>;
    fn load_taxonomy_json(&self, version: &str, json: &str) -> Result<SnapshotSummary>;

    // Export
    fn export_snapshot(&self) -> TaxonomySnapshot;
    fn export_snapshot_json(&self) -> Result<String>;
}
