//! Immutable, versioned in-memory taxonomy.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use log::debug;

use super::taxonomy_errors::{SchemaError, TaxonomyError};
use super::taxonomy_model::{AmenityTag, NodeKind, SnapshotSummary, TaxonomyNode, TaxonomySnapshot};
use crate::errors::Result;
use crate::settings::SnapshotPolicy;
use crate::synonyms::SynonymTable;
use crate::validation::check_snapshot;

/// A loaded taxonomy snapshot.
///
/// Built once by [`TaxonomyRegistry::load_snapshot`] and never mutated. Node
/// order is the snapshot's declaration order.
#[derive(Debug, Clone)]
pub struct TaxonomyRegistry {
    version: String,
    published_at: DateTime<Utc>,
    nodes: Vec<TaxonomyNode>,
    index: HashMap<String, usize>,
    children: HashMap<String, Vec<usize>>,
    amenity_tags: BTreeMap<String, AmenityTag>,
    synonyms: SynonymTable,
}

impl TaxonomyRegistry {
    /// Validates and indexes a snapshot document.
    pub fn load_snapshot(
        version: impl Into<String>,
        snapshot: TaxonomySnapshot,
        policy: &SnapshotPolicy,
    ) -> Result<Self> {
        let version = version.into();
        if version.trim().is_empty() {
            return Err(TaxonomyError::from(SchemaError::EmptyField {
                field: "version",
                context: "snapshot".to_string(),
            })
            .into());
        }

        check_snapshot(&snapshot, policy).map_err(TaxonomyError::from)?;

        let TaxonomySnapshot {
            amenity_tags,
            nodes,
            synonyms,
        } = snapshot;

        let synonyms = SynonymTable::build(synonyms).map_err(TaxonomyError::from)?;

        let mut index = HashMap::with_capacity(nodes.len());
        let mut children: HashMap<String, Vec<usize>> = HashMap::new();
        for (position, node) in nodes.iter().enumerate() {
            index.insert(node.id.clone(), position);
            if let Some(parent_id) = &node.parent_id {
                children.entry(parent_id.clone()).or_default().push(position);
            }
        }

        let amenity_tags = amenity_tags
            .into_iter()
            .map(|tag| (tag.id.clone(), tag))
            .collect();

        debug!(
            "Indexed taxonomy snapshot '{}' with {} nodes",
            version,
            nodes.len()
        );

        Ok(Self {
            version,
            published_at: Utc::now(),
            nodes,
            index,
            children,
            amenity_tags,
            synonyms,
        })
    }

    /// Parses a JSON snapshot document and loads it.
    pub fn from_json(version: impl Into<String>, json: &str, policy: &SnapshotPolicy) -> Result<Self> {
        let snapshot: TaxonomySnapshot = serde_json::from_str(json)
            .map_err(|e| TaxonomyError::from(SchemaError::Malformed(e.to_string())))?;
        Self::load_snapshot(version, snapshot, policy)
    }

    /// A registry with no nodes, used before the first snapshot is published.
    pub fn empty() -> Self {
        Self {
            version: String::new(),
            published_at: Utc::now(),
            nodes: Vec::new(),
            index: HashMap::new(),
            children: HashMap::new(),
            amenity_tags: BTreeMap::new(),
            synonyms: SynonymTable::default(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }

    /// Looks up a node by id. Retired nodes still resolve.
    pub fn resolve(&self, node_id: &str) -> Result<&TaxonomyNode> {
        self.get(node_id)
            .ok_or_else(|| TaxonomyError::NodeNotFound(node_id.to_string()).into())
    }

    pub fn get(&self, node_id: &str) -> Option<&TaxonomyNode> {
        self.index.get(node_id).map(|&position| &self.nodes[position])
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.index.contains_key(node_id)
    }

    /// Subcategories of a category, in declaration order.
    pub fn descendants_of(&self, category_id: &str) -> Result<Vec<&TaxonomyNode>> {
        let category = self.resolve(category_id)?;
        if category.kind != NodeKind::Category {
            return Err(TaxonomyError::NotACategory(category_id.to_string()).into());
        }
        Ok(self.children_of(category_id))
    }

    fn children_of(&self, category_id: &str) -> Vec<&TaxonomyNode> {
        self.children
            .get(category_id)
            .map(|positions| positions.iter().map(|&p| &self.nodes[p]).collect())
            .unwrap_or_default()
    }

    /// Categories, in declaration order.
    pub fn categories(&self) -> Vec<&TaxonomyNode> {
        self.nodes.iter().filter(|node| node.is_category()).collect()
    }

    pub fn nodes(&self) -> &[TaxonomyNode] {
        &self.nodes
    }

    /// Declaration position of a node, the final tie-breaker for node ordering.
    pub fn position_of(&self, node_id: &str) -> Option<usize> {
        self.index.get(node_id).copied()
    }

    /// The owning category id of a subcategory, or the id itself for a category.
    pub fn family_of(&self, node_id: &str) -> Result<&str> {
        let node = self.resolve(node_id)?;
        Ok(match node.kind {
            NodeKind::Category => node.id.as_str(),
            // Parent presence is guaranteed by the load checks.
            NodeKind::Subcategory => node.parent_id.as_deref().unwrap_or(node.id.as_str()),
        })
    }

    /// Every node of the family a node belongs to: the category first, then
    /// its subcategories in declaration order.
    pub fn family_members(&self, node_id: &str) -> Result<Vec<&TaxonomyNode>> {
        let family_id = self.family_of(node_id)?;
        let category = self.resolve(family_id)?;
        let mut members = vec![category];
        members.extend(self.children_of(family_id));
        Ok(members)
    }

    pub fn amenity_tag(&self, tag_id: &str) -> Option<&AmenityTag> {
        self.amenity_tags.get(tag_id)
    }

    pub fn amenity_tags(&self) -> impl Iterator<Item = &AmenityTag> {
        self.amenity_tags.values()
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    /// Rebuilds the snapshot document this registry was loaded from.
    ///
    /// Amenity tags come back sorted by id.
    pub fn to_snapshot(&self) -> TaxonomySnapshot {
        TaxonomySnapshot {
            amenity_tags: self.amenity_tags.values().cloned().collect(),
            nodes: self.nodes.clone(),
            synonyms: self.synonyms.entries().to_vec(),
        }
    }

    pub fn summary(&self) -> SnapshotSummary {
        let category_count = self.nodes.iter().filter(|n| n.is_category()).count();
        SnapshotSummary {
            version: self.version.clone(),
            published_at: self.published_at,
            category_count,
            subcategory_count: self.nodes.len() - category_count,
            retired_node_count: self.nodes.iter().filter(|n| n.retired).count(),
            amenity_tag_count: self.amenity_tags.len(),
            synonym_count: self.synonyms.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::synonyms::SynonymEntry;
    use crate::taxonomies::VenueType;

    fn snapshot() -> TaxonomySnapshot {
        TaxonomySnapshot {
            amenity_tags: vec![AmenityTag::new("space.exhibit_floor")],
            nodes: vec![
                TaxonomyNode::category("convention_exhibition", "Convention", VenueType::Indoor),
                TaxonomyNode::subcategory(
                    "convention_center",
                    "convention_exhibition",
                    "Convention Center",
                    VenueType::Indoor,
                ),
                TaxonomyNode::category("rustic_farm", "Rustic & Farm", VenueType::Hybrid),
                TaxonomyNode::subcategory("barn", "rustic_farm", "Barn", VenueType::Hybrid),
                TaxonomyNode::subcategory(
                    "expo_hall",
                    "convention_exhibition",
                    "Expo Hall",
                    VenueType::Indoor,
                ),
            ],
            synonyms: vec![SynonymEntry::new("US", "Barn", "barn")],
        }
    }

    fn registry() -> TaxonomyRegistry {
        TaxonomyRegistry::load_snapshot("2024.1", snapshot(), &SnapshotPolicy::unrestricted())
            .unwrap()
    }

    #[test]
    fn test_resolve() {
        let registry = registry();
        assert_eq!(registry.resolve("barn").unwrap().name, "Barn");
        let err = registry.resolve("ballroom").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_descendants_in_declaration_order() {
        let registry = registry();
        let ids: Vec<&str> = registry
            .descendants_of("convention_exhibition")
            .unwrap()
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(ids, vec!["convention_center", "expo_hall"]);
    }

    #[test]
    fn test_descendants_of_subcategory_fails() {
        let err = registry().descendants_of("barn").unwrap_err();
        assert!(matches!(
            err,
            Error::Taxonomy(TaxonomyError::NotACategory(ref id)) if id == "barn"
        ));
    }

    #[test]
    fn test_family_of() {
        let registry = registry();
        assert_eq!(registry.family_of("expo_hall").unwrap(), "convention_exhibition");
        assert_eq!(registry.family_of("rustic_farm").unwrap(), "rustic_farm");
        let family: Vec<&str> = registry
            .family_members("convention_center")
            .unwrap()
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(
            family,
            vec!["convention_exhibition", "convention_center", "expo_hall"]
        );
    }

    #[test]
    fn test_categories_and_summary() {
        let registry = registry();
        let categories: Vec<&str> = registry.categories().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(categories, vec!["convention_exhibition", "rustic_farm"]);

        let summary = registry.summary();
        assert_eq!(summary.version, "2024.1");
        assert_eq!(summary.category_count, 2);
        assert_eq!(summary.subcategory_count, 3);
        assert_eq!(summary.synonym_count, 1);
        assert_eq!(summary.amenity_tag_count, 1);
    }

    #[test]
    fn test_empty_version_rejected() {
        let err =
            TaxonomyRegistry::load_snapshot("  ", snapshot(), &SnapshotPolicy::unrestricted())
                .unwrap_err();
        assert!(matches!(
            err,
            Error::Taxonomy(TaxonomyError::Schema(SchemaError::EmptyField {
                field: "version",
                ..
            }))
        ));
    }

    #[test]
    fn test_malformed_json_is_schema_error() {
        let err = TaxonomyRegistry::from_json("v1", "{ nodes: ", &SnapshotPolicy::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Taxonomy(TaxonomyError::Schema(SchemaError::Malformed(_)))
        ));
    }

    #[test]
    fn test_export_round_trip() {
        let registry = registry();
        let exported = serde_json::to_string(&registry.to_snapshot()).unwrap();
        let reloaded =
            TaxonomyRegistry::from_json("2024.2", &exported, &SnapshotPolicy::unrestricted())
                .unwrap();
        assert_eq!(reloaded.nodes(), registry.nodes());
        assert_eq!(reloaded.synonyms().entries(), registry.synonyms().entries());
    }
}
