//! Versioned, region-scoped synonym table.

use std::collections::HashMap;

use super::synonym_model::{SynonymEntry, SynonymKey, TermResolution};
use crate::errors::Result;
use crate::taxonomies::{SchemaError, TaxonomyError};

/// Exact-match lookup from `(region, local term)` to a canonical node id.
///
/// Built once per snapshot and immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    entries: Vec<SynonymEntry>,
    index: HashMap<SynonymKey, usize>,
}

impl SynonymTable {
    /// Builds the table, rejecting empty fields and duplicate normalized keys.
    ///
    /// Target node existence is checked by the snapshot validator, which has
    /// the node set at hand.
    pub fn build(entries: Vec<SynonymEntry>) -> std::result::Result<Self, SchemaError> {
        let mut index = HashMap::with_capacity(entries.len());

        for (position, entry) in entries.iter().enumerate() {
            let key = entry.key();
            if key.region_code.is_empty() {
                return Err(SchemaError::EmptyField {
                    field: "regionCode",
                    context: format!("synonym '{}'", entry.local_term),
                });
            }
            if key.term.is_empty() {
                return Err(SchemaError::EmptyField {
                    field: "localTerm",
                    context: format!("synonym for region '{}'", entry.region_code),
                });
            }
            if index.insert(key, position).is_some() {
                return Err(SchemaError::DuplicateSynonym {
                    region_code: entry.region_code.clone(),
                    local_term: entry.local_term.clone(),
                });
            }
        }

        Ok(Self { entries, index })
    }

    /// Resolves a term within a region. Case-insensitive, trimmed, exact.
    pub fn resolve(&self, region_code: &str, local_term: &str) -> Result<&str> {
        self.index
            .get(&SynonymKey::new(region_code, local_term))
            .map(|&position| self.entries[position].canonical_node_id.as_str())
            .ok_or_else(|| {
                TaxonomyError::UnknownTerm {
                    region_code: region_code.trim().to_string(),
                    term: local_term.trim().to_string(),
                }
                .into()
            })
    }

    /// Resolves a batch, partitioning into node ids and unresolved terms.
    pub fn resolve_all<S: AsRef<str>>(&self, region_code: &str, terms: &[S]) -> TermResolution {
        let mut resolution = TermResolution::default();
        for term in terms {
            match self.resolve(region_code, term.as_ref()) {
                Ok(node_id) => {
                    if !resolution.node_ids.iter().any(|id| id == node_id) {
                        resolution.node_ids.push(node_id.to_string());
                    }
                }
                Err(_) => resolution.unresolved.push(term.as_ref().to_string()),
            }
        }
        resolution
    }

    /// Every entry that maps to `node_id`, in declaration order.
    pub fn terms_for(&self, node_id: &str) -> Vec<&SynonymEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.canonical_node_id == node_id)
            .collect()
    }

    pub fn entries(&self) -> &[SynonymEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
