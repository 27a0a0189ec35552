//! Region-scoped resolution of local venue terms against the active snapshot.

use std::sync::Arc;

use log::debug;

use super::synonym_model::{SynonymEntry, TermResolution};
use crate::errors::Result;
use crate::taxonomies::RegistryHandle;

/// Resolves regional terms through whichever snapshot is active at call time.
pub struct SynonymResolver {
    registry: Arc<RegistryHandle>,
}

impl SynonymResolver {
    pub fn new(registry: Arc<RegistryHandle>) -> Self {
        Self { registry }
    }

    /// Canonical node id for `local_term` in `region_code`, or `UnknownTerm`.
    pub fn resolve(&self, region_code: &str, local_term: &str) -> Result<String> {
        let registry = self.registry.snapshot();
        let node_id = registry.synonyms().resolve(region_code, local_term)?;
        debug!(
            "Resolved '{}' ({}) to '{}' in snapshot '{}'",
            local_term,
            region_code,
            node_id,
            registry.version()
        );
        Ok(node_id.to_string())
    }

    pub fn resolve_all<S: AsRef<str>>(&self, region_code: &str, terms: &[S]) -> TermResolution {
        self.registry
            .snapshot()
            .synonyms()
            .resolve_all(region_code, terms)
    }

    /// Every regional term that maps to `node_id`.
    pub fn terms_for(&self, node_id: &str) -> Vec<SynonymEntry> {
        self.registry
            .snapshot()
            .synonyms()
            .terms_for(node_id)
            .into_iter()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::settings::SnapshotPolicy;
    use crate::taxonomies::{
        TaxonomyError, TaxonomyNode, TaxonomyRegistry, TaxonomySnapshot, VenueType,
    };

    fn registry(version: &str, synonyms: Vec<SynonymEntry>) -> TaxonomyRegistry {
        let snapshot = TaxonomySnapshot {
            nodes: vec![
                TaxonomyNode::category("tent_marquee", "Tents & Marquees", VenueType::Outdoor),
                TaxonomyNode::subcategory(
                    "marquee_tent",
                    "tent_marquee",
                    "Marquee Tent",
                    VenueType::Outdoor,
                ),
            ],
            synonyms,
            ..Default::default()
        };
        TaxonomyRegistry::load_snapshot(version, snapshot, &SnapshotPolicy::unrestricted())
            .unwrap()
    }

    #[test]
    fn test_unknown_region_is_surfaced() {
        let handle = Arc::new(RegistryHandle::new(registry(
            "v1",
            vec![SynonymEntry::new("IN", "Shamiana", "marquee_tent")],
        )));
        let resolver = SynonymResolver::new(handle);

        assert_eq!(resolver.resolve("IN", "Shamiana").unwrap(), "marquee_tent");
        let err = resolver.resolve("US", "Shamiana").unwrap_err();
        assert!(matches!(
            err,
            Error::Taxonomy(TaxonomyError::UnknownTerm { .. })
        ));
    }

    #[test]
    fn test_resolution_survives_reload_that_keeps_entry() {
        let entry = SynonymEntry::new("IN", "Shamiana", "marquee_tent");
        let handle = Arc::new(RegistryHandle::new(registry("v1", vec![entry.clone()])));
        let resolver = SynonymResolver::new(Arc::clone(&handle));
        let before = resolver.resolve("IN", "shamiana").unwrap();

        handle.publish(registry(
            "v2",
            vec![entry, SynonymEntry::new("GB", "Marquee", "marquee_tent")],
        ));

        assert_eq!(resolver.resolve("IN", "shamiana").unwrap(), before);
        assert_eq!(resolver.terms_for("marquee_tent").len(), 2);
    }
}
