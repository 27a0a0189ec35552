//! End-to-end matching scenarios against the fixture taxonomy.

mod common;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use venuemap_core::errors::Error;
use venuemap_core::matching::{
    EventRequirement, MatchingEngine, MatchingService, MatchingServiceTrait,
};
use venuemap_core::settings::EngineSettings;
use venuemap_core::synonyms::SynonymResolver;
use venuemap_core::taxonomies::{
    RegistryHandle, TaxonomyError, TaxonomyService, TaxonomyServiceTrait,
};
use venuemap_core::venues::InMemoryVenueStore;

use common::{registry, snapshot, venue};

#[test]
fn exact_subcategory_outranks_parent_category_tag() {
    let requirement = EventRequirement {
        min_capacity: Some(3000),
        ..EventRequirement::for_nodes(["convention_center"])
    };
    let pool = vec![
        venue("parent-tagged", "convention_exhibition", 3500),
        venue("exact-tagged", "convention_center", 3500),
    ];

    let results = MatchingEngine::default()
        .match_requirement(&registry(), &requirement, pool, &CancellationToken::new())
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].venue_id, "exact-tagged");
    assert_eq!(results[0].subscores.category_match, 1.0);
    assert_eq!(results[1].venue_id, "parent-tagged");
    assert_eq!(results[1].subscores.category_match, 0.6);
    assert!(results[0].score > results[1].score);
}

#[test]
fn missing_required_amenity_excludes_perfect_venue() {
    let requirement = EventRequirement {
        required_amenity_tags: ["av.broadcast_studio".to_string()].into(),
        min_capacity: Some(100),
        max_capacity: Some(300),
        ..EventRequirement::for_nodes(["expo_hall"])
    };
    let pool = vec![
        venue("perfect-but-no-studio", "expo_hall", 200),
        venue("studio", "expo_hall", 120).with_amenities(["av.broadcast_studio"]),
    ];

    let results = MatchingEngine::default()
        .match_requirement(&registry(), &requirement, pool, &CancellationToken::new())
        .unwrap();

    let ids: Vec<&str> = results.iter().map(|r| r.venue_id.as_str()).collect();
    assert_eq!(ids, vec!["studio"]);
}

#[test]
fn shamiana_is_unknown_outside_india() {
    let handle = Arc::new(RegistryHandle::new(registry()));
    let resolver = SynonymResolver::new(handle);

    assert_eq!(resolver.resolve("IN", "Shamiana").unwrap(), "marquee_tent");
    let err = resolver.resolve("US", "Shamiana").unwrap_err();
    assert!(matches!(
        err,
        Error::Taxonomy(TaxonomyError::UnknownTerm { ref region_code, ref term })
            if region_code == "US" && term == "Shamiana"
    ));
}

#[test]
fn equal_scores_order_by_venue_id() {
    let requirement = EventRequirement::for_nodes(["barn"]);
    let engine = MatchingEngine::default();
    let registry = registry();

    let mut previous = None;
    for pool in [
        vec![venue("v-b", "barn", 100), venue("v-a", "barn", 100)],
        vec![venue("v-a", "barn", 100), venue("v-b", "barn", 100)],
    ] {
        let results = engine
            .match_requirement(&registry, &requirement, pool, &CancellationToken::new())
            .unwrap();
        assert_eq!(results[0].score, results[1].score);
        let ids: Vec<String> = results.into_iter().map(|r| r.venue_id).collect();
        assert_eq!(ids, vec!["v-a", "v-b"]);
        if let Some(previous) = previous.replace(ids.clone()) {
            assert_eq!(previous, ids);
        }
    }
}

#[test]
fn failed_reload_keeps_serving_previous_snapshot() {
    let handle = Arc::new(RegistryHandle::default());
    let taxonomy = TaxonomyService::new(
        Arc::clone(&handle),
        EngineSettings::default().snapshot_policy,
    );
    taxonomy.load_taxonomy_snapshot("2024.1", snapshot()).unwrap();

    let store = InMemoryVenueStore::from_venues([venue("v-1", "barn", 150)]);
    let matching = MatchingService::new(
        Arc::clone(&handle),
        Arc::new(store),
        &EngineSettings::default(),
    );

    let mut broken = snapshot();
    broken.nodes.retain(|node| node.id != "ranch");
    assert!(taxonomy.load_taxonomy_snapshot("2024.2", broken).is_err());

    let requirement = EventRequirement {
        desired_terms: vec!["barn".to_string()],
        region_code: "US".to_string(),
        ..Default::default()
    };
    let response = matching
        .match_venues(&requirement, &CancellationToken::new())
        .unwrap();
    assert_eq!(response.snapshot_version, "2024.1");
    assert_eq!(response.results.len(), 1);
}

#[test]
fn multi_category_venue_is_scored_once_with_both_hits() {
    let requirement = EventRequirement::for_nodes(["barn", "marquee_tent"]);
    let pool = vec![venue("v-1", "barn", 100).with_nodes(["barn", "marquee_tent", "expo_hall"])];

    let results = MatchingEngine::default()
        .match_requirement(&registry(), &requirement, pool, &CancellationToken::new())
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].matched_node_ids, vec!["barn", "marquee_tent"]);
}
