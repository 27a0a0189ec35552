//! Venue tagging check against a taxonomy snapshot.
//!
//! Flags assignments and amenity tags the snapshot does not recognize instead
//! of dropping them, so taxonomy versions can evolve under existing data.

use crate::taxonomies::{TaxonomyNode, TaxonomyRegistry};
use crate::venues::VenueProfile;

use super::validation_model::{FindingKind, ValidationFinding};

pub struct TaggingCheck;

impl TaggingCheck {
    /// Runs every tagging rule on one venue. Findings are unsorted.
    pub fn analyze(venue: &VenueProfile, registry: &TaxonomyRegistry) -> Vec<ValidationFinding> {
        let mut findings = Vec::new();

        if venue.assigned_node_ids.is_empty() {
            findings.push(ValidationFinding::new(
                &venue.venue_id,
                FindingKind::NoAssignedNodes,
                "Venue is not assigned to any taxonomy node",
            ));
        }

        let mut known_nodes: Vec<&TaxonomyNode> = Vec::new();
        for node_id in &venue.assigned_node_ids {
            match registry.get(node_id) {
                None => findings.push(
                    ValidationFinding::new(
                        &venue.venue_id,
                        FindingKind::UnknownNode,
                        format!(
                            "Assigned node '{}' does not exist in taxonomy '{}'",
                            node_id,
                            registry.version()
                        ),
                    )
                    .with_subject(node_id),
                ),
                Some(node) => {
                    if node.retired {
                        findings.push(
                            ValidationFinding::new(
                                &venue.venue_id,
                                FindingKind::RetiredNode,
                                format!("Assigned node '{}' is retired", node_id),
                            )
                            .with_subject(node_id),
                        );
                    }
                    known_nodes.push(node);
                }
            }
        }

        for tag in &venue.amenity_tags {
            match registry.amenity_tag(tag) {
                None => findings.push(
                    ValidationFinding::new(
                        &venue.venue_id,
                        FindingKind::UnknownAmenityTag,
                        format!(
                            "Amenity tag '{}' is not in the vocabulary of taxonomy '{}'",
                            tag,
                            registry.version()
                        ),
                    )
                    .with_subject(tag),
                ),
                Some(declared) if declared.retired => findings.push(
                    ValidationFinding::new(
                        &venue.venue_id,
                        FindingKind::RetiredAmenityTag,
                        format!("Amenity tag '{}' is retired", tag),
                    )
                    .with_subject(tag),
                ),
                Some(_) => {}
            }
        }

        for node in &known_nodes {
            for required in node
                .required_amenity_tags
                .iter()
                .filter(|tag| !venue.amenity_tags.contains(*tag))
            {
                findings.push(
                    ValidationFinding::new(
                        &venue.venue_id,
                        FindingKind::MissingRequiredAmenity,
                        format!(
                            "Node '{}' requires amenity '{}' which the venue lacks",
                            node.id, required
                        ),
                    )
                    .with_subject(format!("{}:{}", node.id, required)),
                );
            }
        }

        if !known_nodes.is_empty()
            && !known_nodes
                .iter()
                .any(|node| node.venue_type.is_compatible_with(venue.venue_type))
        {
            findings.push(ValidationFinding::new(
                &venue.venue_id,
                FindingKind::VenueTypeMismatch,
                format!(
                    "Venue type {} matches none of its assigned nodes",
                    venue.venue_type
                ),
            ));
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SnapshotPolicy;
    use crate::taxonomies::{AmenityTag, TaxonomySnapshot, VenueType};
    use crate::validation::Severity;

    fn registry() -> TaxonomyRegistry {
        let mut retired = TaxonomyNode::subcategory(
            "drive_in",
            "outdoor_cinema",
            "Drive-in",
            VenueType::Outdoor,
        );
        retired.retired = true;
        let snapshot = TaxonomySnapshot {
            amenity_tags: vec![
                AmenityTag::new("av.broadcast_studio"),
                AmenityTag::new("power.generator"),
                AmenityTag::retired("av.vhs_player"),
            ],
            nodes: vec![
                TaxonomyNode::category("outdoor_cinema", "Outdoor Cinema", VenueType::Outdoor),
                TaxonomyNode::subcategory(
                    "rooftop_screen",
                    "outdoor_cinema",
                    "Rooftop Screen",
                    VenueType::Outdoor,
                )
                .with_required_tags(["power.generator"]),
                retired,
            ],
            ..Default::default()
        };
        TaxonomyRegistry::load_snapshot("v3", snapshot, &SnapshotPolicy::unrestricted()).unwrap()
    }

    fn kinds(findings: &[ValidationFinding]) -> Vec<FindingKind> {
        let mut kinds: Vec<FindingKind> = findings.iter().map(|f| f.kind).collect();
        kinds.sort();
        kinds
    }

    #[test]
    fn test_clean_venue() {
        let venue = VenueProfile::new("v-1", 120, VenueType::Outdoor)
            .with_nodes(["rooftop_screen"])
            .with_amenities(["power.generator"]);
        assert!(TaggingCheck::analyze(&venue, &registry()).is_empty());
    }

    #[test]
    fn test_unknown_and_retired_are_flagged() {
        let venue = VenueProfile::new("v-2", 120, VenueType::Outdoor)
            .with_nodes(["drive_in", "ghost_node"])
            .with_amenities(["av.vhs_player", "av.hologram"]);
        let findings = TaggingCheck::analyze(&venue, &registry());

        assert_eq!(
            kinds(&findings),
            vec![
                FindingKind::UnknownNode,
                FindingKind::RetiredNode,
                FindingKind::UnknownAmenityTag,
                FindingKind::RetiredAmenityTag,
            ]
        );
        let unknown = findings
            .iter()
            .find(|f| f.kind == FindingKind::UnknownNode)
            .unwrap();
        assert_eq!(unknown.subject.as_deref(), Some("ghost_node"));
        assert_eq!(unknown.severity, Severity::Error);
    }

    #[test]
    fn test_missing_required_amenity() {
        let venue = VenueProfile::new("v-3", 120, VenueType::Outdoor).with_nodes(["rooftop_screen"]);
        let findings = TaggingCheck::analyze(&venue, &registry());
        assert_eq!(kinds(&findings), vec![FindingKind::MissingRequiredAmenity]);
        assert_eq!(
            findings[0].subject.as_deref(),
            Some("rooftop_screen:power.generator")
        );
    }

    #[test]
    fn test_no_assigned_nodes() {
        let venue = VenueProfile::new("v-4", 120, VenueType::Indoor);
        let findings = TaggingCheck::analyze(&venue, &registry());
        assert_eq!(kinds(&findings), vec![FindingKind::NoAssignedNodes]);
    }

    #[test]
    fn test_venue_type_mismatch_and_hybrid() {
        let indoor = VenueProfile::new("v-5", 120, VenueType::Indoor)
            .with_nodes(["outdoor_cinema"]);
        assert_eq!(
            kinds(&TaggingCheck::analyze(&indoor, &registry())),
            vec![FindingKind::VenueTypeMismatch]
        );

        let hybrid = VenueProfile::new("v-6", 120, VenueType::Hybrid)
            .with_nodes(["outdoor_cinema"]);
        assert!(TaggingCheck::analyze(&hybrid, &registry()).is_empty());
    }
}
