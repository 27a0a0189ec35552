//! Traits for the venue tagging validator.

use crate::venues::VenueProfile;
use crate::Result;

use super::{ValidationFinding, ValidationReport};

/// Service trait for venue tagging validation.
pub trait ValidationServiceTrait: Send + Sync {
    /// Validates an in-memory profile, typically right before it is written.
    fn validate_venue(&self, venue: &VenueProfile) -> Vec<ValidationFinding>;

    /// Loads a venue from the store and validates it.
    fn validate_venue_tagging(&self, venue_id: &str) -> Result<Vec<ValidationFinding>>;

    /// Validates every stored venue against the active snapshot.
    fn validate_all(&self) -> Result<ValidationReport>;
}
