//! Regional synonym entries and term normalization.

use serde::{Deserialize, Serialize};

/// A region-scoped mapping from a colloquial venue term to a canonical node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynonymEntry {
    pub region_code: String,
    pub local_term: String,
    pub canonical_node_id: String,
}

impl SynonymEntry {
    pub fn new(
        region_code: impl Into<String>,
        local_term: impl Into<String>,
        canonical_node_id: impl Into<String>,
    ) -> Self {
        Self {
            region_code: region_code.into(),
            local_term: local_term.into(),
            canonical_node_id: canonical_node_id.into(),
        }
    }

    pub(crate) fn key(&self) -> SynonymKey {
        SynonymKey::new(&self.region_code, &self.local_term)
    }
}

/// Normalized lookup key: `(REGION, lower-cased term)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct SynonymKey {
    pub region_code: String,
    pub term: String,
}

impl SynonymKey {
    pub fn new(region_code: &str, term: &str) -> Self {
        Self {
            region_code: normalize_region(region_code),
            term: normalize_term(term),
        }
    }
}

/// Trims, upper-cases.
pub fn normalize_region(region_code: &str) -> String {
    region_code.trim().to_uppercase()
}

/// Trims, collapses inner whitespace runs, lower-cases. No other folding.
pub fn normalize_term(term: &str) -> String {
    term.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Outcome of resolving a batch of local terms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermResolution {
    /// Canonical node ids, deduplicated, in order of first appearance.
    pub node_ids: Vec<String>,
    /// Terms that did not resolve, as supplied by the caller.
    pub unresolved: Vec<String>,
}
