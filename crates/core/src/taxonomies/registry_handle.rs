//! Atomically swappable holder of the active taxonomy snapshot.

use std::sync::Arc;

use arc_swap::ArcSwap;

use super::taxonomy_registry::TaxonomyRegistry;

/// Shared pointer to the active [`TaxonomyRegistry`].
///
/// Readers take a snapshot guard for the duration of a request; publishers
/// replace the whole registry in one swap. A request that started against
/// one snapshot finishes against it even if a new one is published meanwhile.
#[derive(Debug)]
pub struct RegistryHandle {
    current: ArcSwap<TaxonomyRegistry>,
}

impl RegistryHandle {
    pub fn new(registry: TaxonomyRegistry) -> Self {
        Self {
            current: ArcSwap::from_pointee(registry),
        }
    }

    /// The registry active at the time of the call.
    pub fn snapshot(&self) -> Arc<TaxonomyRegistry> {
        self.current.load_full()
    }

    /// Publishes a new registry and returns the one it replaced.
    pub fn publish(&self, registry: TaxonomyRegistry) -> Arc<TaxonomyRegistry> {
        self.current.swap(Arc::new(registry))
    }
}

impl Default for RegistryHandle {
    fn default() -> Self {
        Self::new(TaxonomyRegistry::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SnapshotPolicy;
    use crate::taxonomies::{TaxonomyNode, TaxonomySnapshot, VenueType};

    fn registry(version: &str) -> TaxonomyRegistry {
        let snapshot = TaxonomySnapshot {
            nodes: vec![TaxonomyNode::category("stadium", "Stadium", VenueType::Outdoor)],
            ..Default::default()
        };
        TaxonomyRegistry::load_snapshot(version, snapshot, &SnapshotPolicy::unrestricted())
            .unwrap()
    }

    #[test]
    fn test_in_flight_reader_keeps_its_snapshot() {
        let handle = RegistryHandle::new(registry("v1"));
        let in_flight = handle.snapshot();

        let previous = handle.publish(registry("v2"));

        assert_eq!(previous.version(), "v1");
        assert_eq!(in_flight.version(), "v1");
        assert_eq!(handle.snapshot().version(), "v2");
    }

    #[test]
    fn test_default_is_empty() {
        let handle = RegistryHandle::default();
        assert!(handle.snapshot().nodes().is_empty());
    }
}
