//! Venue tagging validation models.
//!
//! Findings are data-quality reports. They never block matching and are
//! accumulated, sorted and summarized into a [`ValidationReport`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

// =============================================================================
// Severity
// =============================================================================

/// Severity of a finding. Ordered Info < Warning < Error.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Finding kind
// =============================================================================

/// What is wrong with a venue's tagging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingKind {
    /// Assigned node id absent from the active snapshot.
    UnknownNode,
    /// Assigned node is retired in the active snapshot.
    RetiredNode,
    /// Amenity tag absent from the snapshot vocabulary.
    UnknownAmenityTag,
    /// Amenity tag retired in the snapshot vocabulary.
    RetiredAmenityTag,
    /// The venue has no assigned node at all.
    NoAssignedNodes,
    /// The venue lacks a tag one of its assigned nodes requires.
    MissingRequiredAmenity,
    /// No assigned node has a venue type compatible with the venue's.
    VenueTypeMismatch,
}

impl FindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::UnknownNode => "UNKNOWN_NODE",
            FindingKind::RetiredNode => "RETIRED_NODE",
            FindingKind::UnknownAmenityTag => "UNKNOWN_AMENITY_TAG",
            FindingKind::RetiredAmenityTag => "RETIRED_AMENITY_TAG",
            FindingKind::NoAssignedNodes => "NO_ASSIGNED_NODES",
            FindingKind::MissingRequiredAmenity => "MISSING_REQUIRED_AMENITY",
            FindingKind::VenueTypeMismatch => "VENUE_TYPE_MISMATCH",
        }
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            FindingKind::UnknownNode | FindingKind::NoAssignedNodes => Severity::Error,
            FindingKind::RetiredNode
            | FindingKind::UnknownAmenityTag
            | FindingKind::MissingRequiredAmenity => Severity::Warning,
            FindingKind::RetiredAmenityTag | FindingKind::VenueTypeMismatch => Severity::Info,
        }
    }
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Finding
// =============================================================================

/// One data-quality issue on one venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFinding {
    pub venue_id: String,
    pub kind: FindingKind,
    pub severity: Severity,
    /// Offending node id or amenity tag, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
}

impl ValidationFinding {
    /// Creates a finding with the kind's default severity.
    pub fn new(venue_id: impl Into<String>, kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            venue_id: venue_id.into(),
            kind,
            severity: kind.default_severity(),
            subject: None,
            message: message.into(),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Deterministic report order: venue id, kind, subject.
    pub fn report_order(a: &Self, b: &Self) -> Ordering {
        a.venue_id
            .cmp(&b.venue_id)
            .then(a.kind.cmp(&b.kind))
            .then_with(|| a.subject.cmp(&b.subject))
    }
}

// =============================================================================
// Report
// =============================================================================

/// Aggregated findings over a set of venues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub snapshot_version: String,
    pub venues_checked: usize,
    pub findings: Vec<ValidationFinding>,
    pub counts: BTreeMap<Severity, usize>,
    pub highest_severity: Option<Severity>,
    pub checked_at: DateTime<Utc>,
}

impl ValidationReport {
    /// Builds a report, sorting findings and counting them by severity.
    pub fn from_findings(
        snapshot_version: impl Into<String>,
        venues_checked: usize,
        mut findings: Vec<ValidationFinding>,
    ) -> Self {
        findings.sort_by(ValidationFinding::report_order);

        let mut counts = BTreeMap::new();
        for finding in &findings {
            *counts.entry(finding.severity).or_insert(0) += 1;
        }
        let highest_severity = findings.iter().map(|f| f.severity).max();

        Self {
            snapshot_version: snapshot_version.into(),
            venues_checked,
            findings,
            counts,
            highest_severity,
            checked_at: Utc::now(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.counts.get(&severity).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn test_report_sorts_and_counts() {
        let findings = vec![
            ValidationFinding::new("v-2", FindingKind::RetiredAmenityTag, "retired")
                .with_subject("av.vhs"),
            ValidationFinding::new("v-1", FindingKind::RetiredNode, "retired node")
                .with_subject("b"),
            ValidationFinding::new("v-1", FindingKind::UnknownNode, "unknown").with_subject("z"),
            ValidationFinding::new("v-1", FindingKind::UnknownNode, "unknown").with_subject("a"),
        ];
        let report = ValidationReport::from_findings("v1", 2, findings);

        let order: Vec<(&str, FindingKind, Option<&str>)> = report
            .findings
            .iter()
            .map(|f| (f.venue_id.as_str(), f.kind, f.subject.as_deref()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("v-1", FindingKind::UnknownNode, Some("a")),
                ("v-1", FindingKind::UnknownNode, Some("z")),
                ("v-1", FindingKind::RetiredNode, Some("b")),
                ("v-2", FindingKind::RetiredAmenityTag, Some("av.vhs")),
            ]
        );
        assert_eq!(report.count(Severity::Error), 2);
        assert_eq!(report.count(Severity::Warning), 1);
        assert_eq!(report.count(Severity::Info), 1);
        assert_eq!(report.highest_severity, Some(Severity::Error));
    }

    #[test]
    fn test_empty_report() {
        let report = ValidationReport::from_findings("v1", 5, Vec::new());
        assert!(report.is_clean());
        assert_eq!(report.highest_severity, None);
    }

    #[test]
    fn test_finding_json_shape() {
        let finding = ValidationFinding::new("v-1", FindingKind::UnknownAmenityTag, "unknown tag")
            .with_subject("av.hologram");
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["kind"], "UNKNOWN_AMENITY_TAG");
        assert_eq!(json["severity"], "WARNING");
        assert_eq!(json["venueId"], "v-1");
    }
}
