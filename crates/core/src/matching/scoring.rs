//! Hard filters and the weighted soft score.

use std::collections::BTreeSet;

use super::desired_set::{DesiredSet, NodeHit};
use super::{EventRequirement, ScoredVenue, Subscores};
use crate::errors::Result;
use crate::settings::MatchWeights;
use crate::taxonomies::{TaxonomyRegistry, VenueType};
use crate::venues::VenueProfile;

/// A requirement compiled against one registry snapshot.
#[derive(Debug, Clone)]
pub struct MatchCriteria {
    desired: DesiredSet,
    required_tags: BTreeSet<String>,
    preferred_tags: BTreeSet<String>,
    min_capacity: u32,
    max_capacity: Option<u32>,
    venue_type: Option<VenueType>,
    weights: MatchWeights,
}

impl MatchCriteria {
    /// Compiles `requirement` with an already-resolved desired node set.
    ///
    /// `desiredTerms` are not looked at here; callers resolve them first.
    pub fn compile<'a, I>(
        requirement: &EventRequirement,
        desired_node_ids: I,
        registry: &TaxonomyRegistry,
        weights: MatchWeights,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = &'a String>,
    {
        requirement.validate()?;
        Ok(Self {
            desired: DesiredSet::expand(registry, desired_node_ids)?,
            required_tags: requirement.required_amenity_tags.clone(),
            preferred_tags: requirement.preferred_amenity_tags.clone(),
            min_capacity: requirement.min_capacity.unwrap_or(0),
            max_capacity: requirement.max_capacity,
            venue_type: requirement.venue_type_preference,
            weights,
        })
    }

    pub fn desired(&self) -> &DesiredSet {
        &self.desired
    }

    /// Scores a venue, or returns `None` if any hard filter rejects it.
    pub fn evaluate(&self, venue: &VenueProfile) -> Option<ScoredVenue> {
        let mut matched_node_ids = Vec::new();
        let mut exact = false;
        for node_id in &venue.assigned_node_ids {
            match self.desired.hit(node_id) {
                Some(NodeHit::Exact) => {
                    exact = true;
                    matched_node_ids.push(node_id.clone());
                }
                Some(NodeHit::Family) => matched_node_ids.push(node_id.clone()),
                None => {}
            }
        }
        if matched_node_ids.is_empty() {
            return None;
        }

        if !self.required_tags.is_subset(&venue.amenity_tags) {
            return None;
        }

        if venue.capacity < self.min_capacity
            || self.max_capacity.is_some_and(|max| venue.capacity > max)
        {
            return None;
        }

        if self.venue_type.is_some_and(|preferred| preferred != venue.venue_type) {
            return None;
        }

        let subscores = Subscores {
            category_match: if exact {
                1.0
            } else {
                self.weights.family_match_credit
            },
            amenity_coverage: self.amenity_coverage(venue),
            capacity_fit: self.capacity_fit(venue.capacity),
        };

        Some(ScoredVenue {
            venue_id: venue.venue_id.clone(),
            score: self.weighted(&subscores),
            subscores,
            matched_node_ids,
        })
    }

    fn amenity_coverage(&self, venue: &VenueProfile) -> f64 {
        let covered = self.preferred_tags.intersection(&venue.amenity_tags).count();
        covered as f64 / self.preferred_tags.len().max(1) as f64
    }

    /// 1.0 at the midpoint of `[min, max]`, falling linearly with distance.
    /// An unbounded or zero-width range has no meaningful midpoint and fits fully.
    fn capacity_fit(&self, capacity: u32) -> f64 {
        let Some(max) = self.max_capacity else {
            return 1.0;
        };
        let range = f64::from(max - self.min_capacity);
        if range == 0.0 {
            return 1.0;
        }
        let midpoint = (f64::from(self.min_capacity) + f64::from(max)) / 2.0;
        (1.0 - (f64::from(capacity) - midpoint).abs() / range).clamp(0.0, 1.0)
    }

    fn weighted(&self, subscores: &Subscores) -> f64 {
        self.weights.category_match * subscores.category_match
            + self.weights.amenity_coverage * subscores.amenity_coverage
            + self.weights.capacity_fit * subscores.capacity_fit
    }
}
