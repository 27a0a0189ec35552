//! Family-aware expansion of the desired node set.

use std::collections::BTreeSet;

use crate::errors::Result;
use crate::taxonomies::{NodeKind, TaxonomyRegistry};

/// How an assigned node relates to the desired set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeHit {
    /// The node was asked for, or is a subcategory of a requested category.
    Exact,
    /// Same family as a requested subcategory, but not that subcategory.
    Family,
}

/// Desired node ids expanded against a registry.
///
/// A desired subcategory admits itself exactly, and its parent category and
/// sibling subcategories as family hits. A desired category admits itself and
/// all of its subcategories exactly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesiredSet {
    exact: BTreeSet<String>,
    family: BTreeSet<String>,
}

impl DesiredSet {
    /// Fails with `NodeNotFound` for any id the registry does not know.
    /// Retired nodes are accepted.
    pub fn expand<'a, I>(registry: &TaxonomyRegistry, desired_node_ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut set = DesiredSet::default();

        for node_id in desired_node_ids {
            let node = registry.resolve(node_id)?;
            match node.kind {
                NodeKind::Category => {
                    set.exact.insert(node.id.clone());
                    for child in registry.descendants_of(&node.id)? {
                        set.exact.insert(child.id.clone());
                    }
                }
                NodeKind::Subcategory => {
                    set.exact.insert(node.id.clone());
                    for member in registry.family_members(&node.id)? {
                        set.family.insert(member.id.clone());
                    }
                }
            }
        }

        let DesiredSet { exact, family } = set;
        let family = family.difference(&exact).cloned().collect();
        Ok(DesiredSet { exact, family })
    }

    pub fn hit(&self, node_id: &str) -> Option<NodeHit> {
        if self.exact.contains(node_id) {
            Some(NodeHit::Exact)
        } else if self.family.contains(node_id) {
            Some(NodeHit::Family)
        } else {
            None
        }
    }

    /// Every node id a candidate may be assigned to, ascending.
    pub fn candidate_node_ids(&self) -> impl Iterator<Item = &String> {
        let mut ids: Vec<&String> = self.exact.iter().chain(self.family.iter()).collect();
        ids.sort();
        ids.into_iter()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }
}
