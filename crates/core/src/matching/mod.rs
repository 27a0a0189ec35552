//! Matching module - hard filters, explainable scoring and deterministic ranking.

mod desired_set;
mod matching_engine;
mod matching_errors;
mod matching_model;
mod matching_service;
mod ranking;
mod scoring;

pub use desired_set::{DesiredSet, NodeHit};
pub use matching_engine::MatchingEngine;
pub use matching_errors::MatchingError;
pub use matching_model::{EventRequirement, MatchResponse, ScoredVenue, Subscores};
pub use matching_service::{MatchingService, MatchingServiceTrait};
pub use ranking::{keep_best_per_venue, merge_ranked, rank_order, sort_ranked};
pub use scoring::MatchCriteria;
