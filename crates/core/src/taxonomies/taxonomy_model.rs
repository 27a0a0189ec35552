//! Domain models for the venue taxonomy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::synonyms::SynonymEntry;

/// Position of a node in the two-level hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Category,
    Subcategory,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Category => "CATEGORY",
            NodeKind::Subcategory => "SUBCATEGORY",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Physical setting of a venue or taxonomy node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VenueType {
    Indoor,
    Outdoor,
    Hybrid,
}

impl VenueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VenueType::Indoor => "INDOOR",
            VenueType::Outdoor => "OUTDOOR",
            VenueType::Hybrid => "HYBRID",
        }
    }

    /// Loose compatibility used by the tagging validator: a hybrid side is
    /// compatible with anything.
    pub fn is_compatible_with(&self, other: VenueType) -> bool {
        *self == other || *self == VenueType::Hybrid || other == VenueType::Hybrid
    }
}

impl fmt::Display for VenueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VenueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INDOOR" => Ok(VenueType::Indoor),
            "OUTDOOR" => Ok(VenueType::Outdoor),
            "HYBRID" => Ok(VenueType::Hybrid),
            other => Err(format!("unknown venue type '{}'", other)),
        }
    }
}

/// A canonical amenity identifier declared in the snapshot vocabulary
/// (e.g. `av.simultaneous_interpretation`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmenityTag {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Retired tags stay declared so venues still carrying them get flagged.
    #[serde(default)]
    pub retired: bool,
}

impl AmenityTag {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            retired: false,
        }
    }

    pub fn retired(id: impl Into<String>) -> Self {
        Self {
            retired: true,
            ..Self::new(id)
        }
    }
}

/// A Category or Subcategory entry of the classification hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyNode {
    pub id: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub required_amenity_tags: BTreeSet<String>,
    pub venue_type: VenueType,
    #[serde(default)]
    pub retired: bool,
}

impl TaxonomyNode {
    pub fn category(id: impl Into<String>, name: impl Into<String>, venue_type: VenueType) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Category,
            parent_id: None,
            name: name.into(),
            required_amenity_tags: BTreeSet::new(),
            venue_type,
            retired: false,
        }
    }

    pub fn subcategory(
        id: impl Into<String>,
        parent_id: impl Into<String>,
        name: impl Into<String>,
        venue_type: VenueType,
    ) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Subcategory,
            parent_id: Some(parent_id.into()),
            name: name.into(),
            required_amenity_tags: BTreeSet::new(),
            venue_type,
            retired: false,
        }
    }

    pub fn with_required_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_amenity_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_category(&self) -> bool {
        self.kind == NodeKind::Category
    }
}

/// Machine-readable taxonomy snapshot, the input of a registry load.
///
/// Node order in `nodes` is the declaration order used for tie-breaking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomySnapshot {
    #[serde(default)]
    pub amenity_tags: Vec<AmenityTag>,
    pub nodes: Vec<TaxonomyNode>,
    #[serde(default)]
    pub synonyms: Vec<SynonymEntry>,
}

/// Summary of the published snapshot, returned by loads and status queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotSummary {
    pub version: String,
    pub published_at: DateTime<Utc>,
    pub category_count: usize,
    pub subcategory_count: usize,
    pub retired_node_count: usize,
    pub amenity_tag_count: usize,
    pub synonym_count: usize,
}
