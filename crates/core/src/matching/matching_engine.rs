//! Single-pass and partitioned matching over a candidate pool.

use log::debug;
use rayon::prelude::*;
use tokio_util::sync::CancellationToken;

use super::ranking::{keep_best_per_venue, merge_ranked, sort_ranked};
use super::scoring::MatchCriteria;
use super::{EventRequirement, MatchingError, ScoredVenue};
use crate::errors::{Error, Result};
use crate::settings::MatchWeights;
use crate::taxonomies::TaxonomyRegistry;
use crate::venues::VenueProfile;

/// Stateless scorer. Holds only the configured weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchingEngine {
    weights: MatchWeights,
}

impl MatchingEngine {
    pub fn new(weights: MatchWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> MatchWeights {
        self.weights
    }

    /// Compiles a requirement against a registry using its `desired_node_ids`.
    pub fn criteria(
        &self,
        requirement: &EventRequirement,
        registry: &TaxonomyRegistry,
    ) -> Result<MatchCriteria> {
        MatchCriteria::compile(
            requirement,
            &requirement.desired_node_ids,
            registry,
            self.weights,
        )
    }

    /// Ranks every venue of `pool` that passes the hard filters.
    pub fn match_requirement<I>(
        &self,
        registry: &TaxonomyRegistry,
        requirement: &EventRequirement,
        pool: I,
        cancel: &CancellationToken,
    ) -> Result<Vec<ScoredVenue>>
    where
        I: IntoIterator<Item = VenueProfile>,
    {
        let criteria = self.criteria(requirement, registry)?;
        self.match_candidates(&criteria, pool, cancel)
    }

    /// Single pass over an infallible pool.
    pub fn match_candidates<I>(
        &self,
        criteria: &MatchCriteria,
        pool: I,
        cancel: &CancellationToken,
    ) -> Result<Vec<ScoredVenue>>
    where
        I: IntoIterator<Item = VenueProfile>,
    {
        self.try_match_candidates(criteria, pool.into_iter().map(Ok), cancel)
    }

    /// Single pass over a fallible pool, such as a store stream. The first
    /// read error aborts the match. Records sharing a venue id collapse to
    /// their best-ranked entry, whatever order they arrive in.
    pub fn try_match_candidates<I>(
        &self,
        criteria: &MatchCriteria,
        pool: I,
        cancel: &CancellationToken,
    ) -> Result<Vec<ScoredVenue>>
    where
        I: IntoIterator<Item = Result<VenueProfile>>,
    {
        let mut pool = pool.into_iter();
        let mut results = Vec::new();
        let mut pulled = 0usize;

        loop {
            if cancel.is_cancelled() {
                debug!("Match cancelled after {} candidates", pulled);
                return Err(MatchingError::Cancelled.into());
            }
            let Some(venue) = pool.next() else {
                break;
            };
            let venue = venue?;
            pulled += 1;

            if let Some(scored) = criteria.evaluate(&venue) {
                results.push(scored);
            }
        }

        let results = keep_best_per_venue(results);
        debug!("Scored {} of {} candidates", results.len(), pulled);
        Ok(results)
    }

    /// Scores a materialized pool on the rayon worker pool. Each partition is
    /// ranked on its own and the partitions are k-way merged, giving the same
    /// output as [`MatchingEngine::match_candidates`].
    pub fn match_parallel(
        &self,
        criteria: &MatchCriteria,
        pool: Vec<VenueProfile>,
        cancel: &CancellationToken,
    ) -> Result<Vec<ScoredVenue>> {
        if pool.is_empty() {
            return Ok(Vec::new());
        }

        let chunk_size = pool.len().div_ceil(rayon::current_num_threads()).max(1);
        let partitions = pool
            .par_chunks(chunk_size)
            .map(|chunk| {
                let mut ranked = Vec::new();
                for venue in chunk {
                    if cancel.is_cancelled() {
                        return Err(Error::from(MatchingError::Cancelled));
                    }
                    if let Some(scored) = criteria.evaluate(venue) {
                        ranked.push(scored);
                    }
                }
                sort_ranked(&mut ranked);
                Ok(ranked)
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Scored {} candidates across {} partitions",
            pool.len(),
            partitions.len()
        );
        Ok(keep_best_per_venue(merge_ranked(partitions)))
    }
}
