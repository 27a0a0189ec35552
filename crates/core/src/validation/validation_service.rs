//! Validation service implementation.

use log::{debug, info, warn};
use std::sync::Arc;

use crate::errors::{DatabaseError, Result};
use crate::taxonomies::RegistryHandle;
use crate::venues::{VenueProfile, VenueProfileStore};

use super::tagging_check::TaggingCheck;
use super::{Severity, ValidationFinding, ValidationReport, ValidationServiceTrait};

pub struct ValidationService {
    registry: Arc<RegistryHandle>,
    store: Arc<dyn VenueProfileStore>,
}

impl ValidationService {
    pub fn new(registry: Arc<RegistryHandle>, store: Arc<dyn VenueProfileStore>) -> Self {
        Self { registry, store }
    }
}

impl ValidationServiceTrait for ValidationService {
    fn validate_venue(&self, venue: &VenueProfile) -> Vec<ValidationFinding> {
        let registry = self.registry.snapshot();
        let mut findings = TaggingCheck::analyze(venue, &registry);
        findings.sort_by(ValidationFinding::report_order);
        if !findings.is_empty() {
            debug!(
                "Venue '{}' has {} tagging findings against '{}'",
                venue.venue_id,
                findings.len(),
                registry.version()
            );
        }
        findings
    }

    fn validate_venue_tagging(&self, venue_id: &str) -> Result<Vec<ValidationFinding>> {
        let venue = self
            .store
            .get_venue(venue_id)?
            .ok_or_else(|| DatabaseError::NotFound(format!("venue '{}'", venue_id)))?;
        Ok(self.validate_venue(&venue))
    }

    fn validate_all(&self) -> Result<ValidationReport> {
        let registry = self.registry.snapshot();
        let mut findings = Vec::new();
        let mut venues_checked = 0;

        for venue in self.store.stream_all_venues()? {
            let venue = venue?;
            venues_checked += 1;
            findings.extend(TaggingCheck::analyze(&venue, &registry));
        }

        let report = ValidationReport::from_findings(registry.version(), venues_checked, findings);
        if report.highest_severity == Some(Severity::Error) {
            warn!(
                "Tagging validation found {} errors across {} venues",
                report.count(Severity::Error),
                venues_checked
            );
        } else {
            info!(
                "Tagging validation checked {} venues: {} findings",
                venues_checked,
                report.findings.len()
            );
        }
        Ok(report)
    }
}
