//! Matching error types.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchingError {
    /// The requirement is self-contradictory (e.g. `minCapacity > maxCapacity`).
    #[error("Invalid event requirement: {0}")]
    InvalidRequirement(String),

    /// The caller abandoned the request before the pool was drained.
    #[error("Matching was cancelled before the candidate pool was drained")]
    Cancelled,
}
