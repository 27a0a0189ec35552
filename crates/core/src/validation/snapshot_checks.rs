//! Structural checks run on every snapshot before it can be published.
//!
//! Each check returns the first violation it finds. A snapshot that fails any
//! check is never visible to readers.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::settings::SnapshotPolicy;
use crate::taxonomies::{NodeKind, SchemaError, TaxonomyNode, TaxonomySnapshot};

/// Validates referential integrity of a snapshot document.
pub fn check_snapshot(
    snapshot: &TaxonomySnapshot,
    policy: &SnapshotPolicy,
) -> Result<(), SchemaError> {
    let declared_tags = check_amenity_vocabulary(snapshot)?;
    let nodes = check_node_identity(&snapshot.nodes)?;
    check_hierarchy(&snapshot.nodes, &nodes)?;
    check_required_tags(&snapshot.nodes, &declared_tags)?;
    if let Some(expected) = policy.subcategories_per_category {
        check_subcategory_counts(&snapshot.nodes, expected)?;
    }
    check_synonym_targets(snapshot, &nodes)?;

    debug!(
        "Snapshot passed structural checks: {} nodes, {} tags, {} synonyms",
        snapshot.nodes.len(),
        declared_tags.len(),
        snapshot.synonyms.len()
    );
    Ok(())
}

fn check_amenity_vocabulary(snapshot: &TaxonomySnapshot) -> Result<HashSet<&str>, SchemaError> {
    let mut declared = HashSet::with_capacity(snapshot.amenity_tags.len());
    for tag in &snapshot.amenity_tags {
        if tag.id.trim().is_empty() {
            return Err(SchemaError::EmptyField {
                field: "amenityTags.id",
                context: "amenity vocabulary".to_string(),
            });
        }
        if !declared.insert(tag.id.as_str()) {
            return Err(SchemaError::DuplicateAmenityTag(tag.id.clone()));
        }
    }
    Ok(declared)
}

fn check_node_identity(nodes: &[TaxonomyNode]) -> Result<HashMap<&str, &TaxonomyNode>, SchemaError> {
    let mut by_id = HashMap::with_capacity(nodes.len());
    for node in nodes {
        if node.id.trim().is_empty() {
            return Err(SchemaError::EmptyField {
                field: "id",
                context: format!("node named '{}'", node.name),
            });
        }
        if node.name.trim().is_empty() {
            return Err(SchemaError::EmptyField {
                field: "name",
                context: format!("node '{}'", node.id),
            });
        }
        if by_id.insert(node.id.as_str(), node).is_some() {
            return Err(SchemaError::DuplicateNodeId(node.id.clone()));
        }
    }
    Ok(by_id)
}

fn check_hierarchy(
    nodes: &[TaxonomyNode],
    by_id: &HashMap<&str, &TaxonomyNode>,
) -> Result<(), SchemaError> {
    for node in nodes {
        match node.kind {
            NodeKind::Category => {
                if node.parent_id.is_some() {
                    return Err(SchemaError::CategoryWithParent(node.id.clone()));
                }
            }
            NodeKind::Subcategory => {
                let parent_id = match node.parent_id.as_deref() {
                    Some(parent_id) if !parent_id.trim().is_empty() => parent_id,
                    _ => return Err(SchemaError::MissingParent(node.id.clone())),
                };
                match by_id.get(parent_id) {
                    None => {
                        return Err(SchemaError::OrphanSubcategory {
                            node_id: node.id.clone(),
                            parent_id: parent_id.to_string(),
                        })
                    }
                    Some(parent) if !parent.is_category() => {
                        return Err(SchemaError::NestedSubcategory {
                            node_id: node.id.clone(),
                            parent_id: parent_id.to_string(),
                        })
                    }
                    Some(_) => {}
                }
            }
        }
    }
    Ok(())
}

fn check_required_tags(
    nodes: &[TaxonomyNode],
    declared_tags: &HashSet<&str>,
) -> Result<(), SchemaError> {
    for node in nodes {
        if let Some(tag) = node
            .required_amenity_tags
            .iter()
            .find(|tag| !declared_tags.contains(tag.as_str()))
        {
            return Err(SchemaError::UnknownAmenityTag {
                node_id: node.id.clone(),
                tag: tag.clone(),
            });
        }
    }
    Ok(())
}

/// Only active nodes count: a retired subcategory may be replaced without
/// breaking the closed set, and retired categories are not checked.
fn check_subcategory_counts(nodes: &[TaxonomyNode], expected: usize) -> Result<(), SchemaError> {
    let mut counts: HashMap<&str, usize> = nodes
        .iter()
        .filter(|node| node.is_category() && !node.retired)
        .map(|node| (node.id.as_str(), 0))
        .collect();

    for node in nodes.iter().filter(|node| !node.is_category() && !node.retired) {
        if let Some(count) = node.parent_id.as_deref().and_then(|p| counts.get_mut(p)) {
            *count += 1;
        }
    }

    // Declaration order keeps the reported category deterministic.
    for node in nodes.iter().filter(|node| node.is_category() && !node.retired) {
        let actual = counts.get(node.id.as_str()).copied().unwrap_or_default();
        if actual != expected {
            return Err(SchemaError::SubcategoryCount {
                category_id: node.id.clone(),
                expected,
                actual,
            });
        }
    }
    Ok(())
}

fn check_synonym_targets(
    snapshot: &TaxonomySnapshot,
    by_id: &HashMap<&str, &TaxonomyNode>,
) -> Result<(), SchemaError> {
    for entry in &snapshot.synonyms {
        match by_id.get(entry.canonical_node_id.as_str()) {
            None => {
                return Err(SchemaError::SynonymTargetMissing {
                    region_code: entry.region_code.clone(),
                    local_term: entry.local_term.clone(),
                    node_id: entry.canonical_node_id.clone(),
                })
            }
            Some(node) if node.retired => {
                return Err(SchemaError::SynonymTargetRetired {
                    region_code: entry.region_code.clone(),
                    local_term: entry.local_term.clone(),
                    node_id: entry.canonical_node_id.clone(),
                })
            }
            Some(_) => {}
        }
    }
    Ok(())
}
