//! Shared fixtures for the core integration tests.
#![allow(dead_code)]

use venuemap_core::settings::SnapshotPolicy;
use venuemap_core::synonyms::SynonymEntry;
use venuemap_core::taxonomies::{
    AmenityTag, TaxonomyNode, TaxonomyRegistry, TaxonomySnapshot, VenueType,
};
use venuemap_core::venues::VenueProfile;

pub const ALL_NODES: &[&str] = &[
    "convention_exhibition",
    "convention_center",
    "expo_hall",
    "trade_mart",
    "tent_marquee",
    "marquee_tent",
    "mandap_pavilion",
    "stretch_tent",
    "rustic_farm",
    "barn",
    "vineyard",
    "ranch",
];

pub const ALL_TAGS: &[&str] = &[
    "av.broadcast_studio",
    "av.simultaneous_interpretation",
    "catering.in_house",
    "parking.valet",
    "power.generator",
    "space.exhibit_floor",
];

/// Three categories with three subcategories each.
pub fn snapshot() -> TaxonomySnapshot {
    TaxonomySnapshot {
        amenity_tags: ALL_TAGS.iter().map(|t| AmenityTag::new(*t)).collect(),
        nodes: vec![
            TaxonomyNode::category(
                "convention_exhibition",
                "Convention & Exhibition Complexes",
                VenueType::Indoor,
            ),
            TaxonomyNode::subcategory(
                "convention_center",
                "convention_exhibition",
                "Convention Center",
                VenueType::Indoor,
            )
            .with_required_tags(["space.exhibit_floor"]),
            TaxonomyNode::subcategory(
                "expo_hall",
                "convention_exhibition",
                "Expo Hall",
                VenueType::Indoor,
            ),
            TaxonomyNode::subcategory(
                "trade_mart",
                "convention_exhibition",
                "Trade Mart",
                VenueType::Indoor,
            ),
            TaxonomyNode::category("tent_marquee", "Tents & Marquees", VenueType::Outdoor),
            TaxonomyNode::subcategory(
                "marquee_tent",
                "tent_marquee",
                "Marquee Tent",
                VenueType::Outdoor,
            ),
            TaxonomyNode::subcategory(
                "mandap_pavilion",
                "tent_marquee",
                "Mandap Pavilion",
                VenueType::Outdoor,
            ),
            TaxonomyNode::subcategory(
                "stretch_tent",
                "tent_marquee",
                "Stretch Tent",
                VenueType::Outdoor,
            ),
            TaxonomyNode::category("rustic_farm", "Rustic & Farm Venues", VenueType::Hybrid),
            TaxonomyNode::subcategory("barn", "rustic_farm", "Barn", VenueType::Hybrid),
            TaxonomyNode::subcategory("vineyard", "rustic_farm", "Vineyard", VenueType::Outdoor),
            TaxonomyNode::subcategory("ranch", "rustic_farm", "Ranch", VenueType::Outdoor),
        ],
        synonyms: vec![
            SynonymEntry::new("IN", "Shamiana", "marquee_tent"),
            SynonymEntry::new("IN", "Mandap", "mandap_pavilion"),
            SynonymEntry::new("US", "Barn", "barn"),
        ],
    }
}

pub fn registry() -> TaxonomyRegistry {
    TaxonomyRegistry::load_snapshot("2024.1", snapshot(), &SnapshotPolicy::default())
        .expect("fixture snapshot is valid")
}

pub fn venue(id: &str, node: &str, capacity: u32) -> VenueProfile {
    VenueProfile::new(id, capacity, VenueType::Indoor).with_nodes([node])
}
