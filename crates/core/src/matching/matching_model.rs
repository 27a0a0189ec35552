//! Request and response models for venue matching.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::MatchingError;
use crate::taxonomies::VenueType;

/// What an event needs from a venue. Built per request, discarded after scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventRequirement {
    /// Canonical node ids, OR-matched.
    pub desired_node_ids: BTreeSet<String>,
    /// Regional terms resolved with `region_code` and merged into the desired set.
    pub desired_terms: Vec<String>,
    /// Hard filter: every tag must be present on the venue.
    pub required_amenity_tags: BTreeSet<String>,
    /// Soft: coverage is scored.
    pub preferred_amenity_tags: BTreeSet<String>,
    pub min_capacity: Option<u32>,
    /// `None` means unbounded.
    pub max_capacity: Option<u32>,
    pub venue_type_preference: Option<VenueType>,
    pub region_code: String,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl EventRequirement {
    pub fn for_nodes<I, S>(node_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            desired_node_ids: node_ids.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Rejects requirements no venue could ever satisfy by construction.
    pub fn validate(&self) -> Result<(), MatchingError> {
        if let (Some(min), Some(max)) = (self.min_capacity, self.max_capacity) {
            if min > max {
                return Err(MatchingError::InvalidRequirement(format!(
                    "minCapacity ({}) exceeds maxCapacity ({})",
                    min, max
                )));
            }
        }
        if self.limit == Some(0) {
            return Err(MatchingError::InvalidRequirement(
                "limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Per-result score components, each in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscores {
    pub category_match: f64,
    pub amenity_coverage: f64,
    pub capacity_fit: f64,
}

/// A venue that passed every hard filter, with its explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredVenue {
    pub venue_id: String,
    pub score: f64,
    pub subscores: Subscores,
    /// Assigned node ids that satisfied the desired set, ascending.
    pub matched_node_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    /// Version of the taxonomy snapshot the ranking was computed against.
    pub snapshot_version: String,
    pub results: Vec<ScoredVenue>,
    pub unresolved_terms: Vec<String>,
    /// Matches before `offset`/`limit` were applied.
    pub total_matches: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirement_defaults_from_json() {
        let json = r#"{"desiredNodeIds": ["convention_center"], "minCapacity": 3000}"#;
        let requirement: EventRequirement = serde_json::from_str(json).unwrap();
        assert_eq!(requirement.min_capacity, Some(3000));
        assert_eq!(requirement.max_capacity, None);
        assert!(requirement.desired_terms.is_empty());
        assert_eq!(requirement.offset, 0);
        assert!(requirement.validate().is_ok());
    }

    #[test]
    fn test_inverted_capacity_rejected() {
        let requirement = EventRequirement {
            min_capacity: Some(500),
            max_capacity: Some(100),
            ..EventRequirement::for_nodes(["barn"])
        };
        assert!(matches!(
            requirement.validate(),
            Err(MatchingError::InvalidRequirement(_))
        ));
    }
}
