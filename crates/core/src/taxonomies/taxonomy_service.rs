//! Taxonomy service implementation.

use log::{info, warn};
use std::sync::Arc;

use crate::settings::SnapshotPolicy;
use crate::Result;

use super::{
    RegistryHandle, SnapshotSummary, TaxonomyNode, TaxonomyRegistry, TaxonomyServiceTrait,
    TaxonomySnapshot,
};

pub struct TaxonomyService {
    registry: Arc<RegistryHandle>,
    policy: SnapshotPolicy,
}

impl TaxonomyService {
    pub fn new(registry: Arc<RegistryHandle>, policy: SnapshotPolicy) -> Self {
        Self { registry, policy }
    }

    pub fn handle(&self) -> Arc<RegistryHandle> {
        Arc::clone(&self.registry)
    }

    /// Publishes a validated registry, or leaves the active one untouched.
    fn publish(&self, loaded: Result<TaxonomyRegistry>, version: &str) -> Result<SnapshotSummary> {
        let registry = match loaded {
            Ok(registry) => registry,
            Err(e) => {
                warn!(
                    "Rejected taxonomy snapshot '{}': {}. Keeping '{}' active",
                    version,
                    e,
                    self.registry.snapshot().version()
                );
                return Err(e);
            }
        };

        let summary = registry.summary();
        let previous = self.registry.publish(registry);
        info!(
            "Published taxonomy snapshot '{}' ({} categories, {} subcategories, {} synonyms), replacing '{}'",
            summary.version,
            summary.category_count,
            summary.subcategory_count,
            summary.synonym_count,
            previous.version()
        );
        Ok(summary)
    }
}

impl TaxonomyServiceTrait for TaxonomyService {
    fn current(&self) -> Arc<TaxonomyRegistry> {
        self.registry.snapshot()
    }

    fn summary(&self) -> SnapshotSummary {
        self.registry.snapshot().summary()
    }

    fn get_node(&self, node_id: &str) -> Result<TaxonomyNode> {
        self.registry.snapshot().resolve(node_id).cloned()
    }

    fn descendants_of(&self, category_id: &str) -> Result<Vec<TaxonomyNode>> {
        let registry = self.registry.snapshot();
        let descendants = registry.descendants_of(category_id)?;
        Ok(descendants.into_iter().cloned().collect())
    }

    fn categories(&self) -> Vec<TaxonomyNode> {
        self.registry
            .snapshot()
            .categories()
            .into_iter()
            .cloned()
            .collect()
    }

    fn load_taxonomy_snapshot(
        &self,
        version: &str,
        snapshot: TaxonomySnapshot,
    ) -> Result<SnapshotSummary> {
        let loaded = TaxonomyRegistry::load_snapshot(version, snapshot, &self.policy);
        self.publish(loaded, version)
    }

    fn load_taxonomy_json(&self, version: &str, json: &str) -> Result<SnapshotSummary> {
        let loaded = TaxonomyRegistry::from_json(version, json, &self.policy);
        self.publish(loaded, version)
    }

    fn export_snapshot(&self) -> TaxonomySnapshot {
        self.registry.snapshot().to_snapshot()
    }

    fn export_snapshot_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export_snapshot())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::taxonomies::{SchemaError, TaxonomyError, VenueType};

    fn service() -> TaxonomyService {
        TaxonomyService::new(
            Arc::new(RegistryHandle::default()),
            SnapshotPolicy {
                subcategories_per_category: Some(1),
            },
        )
    }

    fn snapshot() -> TaxonomySnapshot {
        TaxonomySnapshot {
            nodes: vec![
                TaxonomyNode::category("rustic_farm", "Rustic & Farm", VenueType::Hybrid),
                TaxonomyNode::subcategory("barn", "rustic_farm", "Barn", VenueType::Hybrid),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_load_publishes() {
        let service = service();
        let summary = service.load_taxonomy_snapshot("v1", snapshot()).unwrap();
        assert_eq!(summary.version, "v1");
        assert_eq!(service.current().version(), "v1");
        assert_eq!(service.get_node("barn").unwrap().name, "Barn");
    }

    #[test]
    fn test_failed_reload_keeps_previous_snapshot() {
        let service = service();
        service.load_taxonomy_snapshot("v1", snapshot()).unwrap();

        let mut broken = snapshot();
        broken.nodes.push(TaxonomyNode::subcategory(
            "silo",
            "rustic_farm",
            "Silo",
            VenueType::Outdoor,
        ));
        let err = service.load_taxonomy_snapshot("v2", broken).unwrap_err();

        assert!(matches!(
            err,
            Error::Taxonomy(TaxonomyError::Schema(SchemaError::SubcategoryCount { .. }))
        ));
        assert_eq!(service.current().version(), "v1");
        assert!(service.get_node("silo").is_err());
    }

    #[test]
    fn test_export_json_reloads() {
        let service = service();
        service.load_taxonomy_snapshot("v1", snapshot()).unwrap();
        let json = service.export_snapshot_json().unwrap();
        let summary = service.load_taxonomy_json("v2", &json).unwrap();
        assert_eq!(summary.subcategory_count, 1);
        assert_eq!(service.export_snapshot(), snapshot());
    }
}
