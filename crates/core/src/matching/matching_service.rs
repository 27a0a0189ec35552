//! Matching service: resolves terms, gathers candidates and ranks them.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use log::debug;
use tokio_util::sync::CancellationToken;

use super::scoring::MatchCriteria;
use super::{EventRequirement, MatchResponse, MatchingEngine, MatchingError, ScoredVenue};
use crate::errors::Result;
use crate::settings::EngineSettings;
use crate::synonyms::TermResolution;
use crate::taxonomies::RegistryHandle;
use crate::venues::{VenueProfile, VenueProfileStore};

/// Service trait for venue matching.
pub trait MatchingServiceTrait: Send + Sync {
    /// Runs a requirement against the active snapshot and the venue store.
    ///
    /// Synchronous and CPU bound; async callers should run it on a blocking
    /// thread and cancel `cancel` when the request is abandoned.
    fn match_venues(
        &self,
        requirement: &EventRequirement,
        cancel: &CancellationToken,
    ) -> Result<MatchResponse>;
}

pub struct MatchingService {
    registry: Arc<RegistryHandle>,
    store: Arc<dyn VenueProfileStore>,
    engine: MatchingEngine,
    parallel_threshold: usize,
}

impl MatchingService {
    pub fn new(
        registry: Arc<RegistryHandle>,
        store: Arc<dyn VenueProfileStore>,
        settings: &EngineSettings,
    ) -> Self {
        Self {
            registry,
            store,
            engine: MatchingEngine::new(settings.match_weights),
            parallel_threshold: settings.parallel_threshold,
        }
    }

    /// Venues assigned to any candidate node, deduplicated by venue id.
    /// Stops before the next store read once `cancel` fires.
    fn gather_candidates(
        &self,
        criteria: &MatchCriteria,
        cancel: &CancellationToken,
    ) -> Result<Vec<VenueProfile>> {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for node_id in criteria.desired().candidate_node_ids() {
            if cancel.is_cancelled() {
                debug!("Match cancelled while reading candidates for '{}'", node_id);
                return Err(MatchingError::Cancelled.into());
            }
            for venue in self.store.get_venues_by_node(node_id)? {
                if seen.insert(venue.venue_id.clone()) {
                    candidates.push(venue);
                }
            }
        }
        Ok(candidates)
    }

    fn rank(
        &self,
        criteria: &MatchCriteria,
        candidates: Vec<VenueProfile>,
        cancel: &CancellationToken,
    ) -> Result<Vec<ScoredVenue>> {
        if candidates.len() >= self.parallel_threshold {
            self.engine.match_parallel(criteria, candidates, cancel)
        } else {
            self.engine.match_candidates(criteria, candidates, cancel)
        }
    }
}

impl MatchingServiceTrait for MatchingService {
    fn match_venues(
        &self,
        requirement: &EventRequirement,
        cancel: &CancellationToken,
    ) -> Result<MatchResponse> {
        requirement.validate()?;
        let registry = self.registry.snapshot();

        let TermResolution {
            node_ids: term_node_ids,
            unresolved: unresolved_terms,
        } = registry
            .synonyms()
            .resolve_all(&requirement.region_code, &requirement.desired_terms);

        let desired: BTreeSet<String> = requirement
            .desired_node_ids
            .iter()
            .cloned()
            .chain(term_node_ids)
            .collect();

        if desired.is_empty() {
            debug!(
                "Empty desired set after resolution ({} unresolved terms)",
                unresolved_terms.len()
            );
            return Ok(MatchResponse {
                snapshot_version: registry.version().to_string(),
                results: Vec::new(),
                unresolved_terms,
                total_matches: 0,
            });
        }

        let criteria =
            MatchCriteria::compile(requirement, &desired, &registry, self.engine.weights())?;
        let candidates = self.gather_candidates(&criteria, cancel)?;
        let candidate_count = candidates.len();
        let ranked = self.rank(&criteria, candidates, cancel)?;

        let total_matches = ranked.len();
        let results: Vec<ScoredVenue> = ranked
            .into_iter()
            .skip(requirement.offset)
            .take(requirement.limit.unwrap_or(usize::MAX))
            .collect();

        debug!(
            "Matched {} of {} candidates against snapshot '{}' (returning {})",
            total_matches,
            candidate_count,
            registry.version(),
            results.len()
        );

        Ok(MatchResponse {
            snapshot_version: registry.version().to_string(),
            results,
            unresolved_terms,
            total_matches,
        })
    }
}
