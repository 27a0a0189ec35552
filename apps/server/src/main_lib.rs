use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use venuemap_core::{
    matching::{MatchingService, MatchingServiceTrait},
    settings::EngineSettings,
    synonyms::SynonymResolver,
    taxonomies::{RegistryHandle, TaxonomyService, TaxonomyServiceTrait},
    validation::{ValidationService, ValidationServiceTrait},
    venues::{VenueProfileStore, VenueWriterTrait},
};
use venuemap_storage_sqlite::{db, VenueRepository};

use crate::config::Config;

pub struct AppState {
    pub taxonomy_service: Arc<dyn TaxonomyServiceTrait>,
    pub synonym_resolver: Arc<SynonymResolver>,
    pub matching_service: Arc<dyn MatchingServiceTrait>,
    pub validation_service: Arc<dyn ValidationServiceTrait>,
    pub venue_store: Arc<dyn VenueProfileStore>,
    pub venue_writer: Arc<dyn VenueWriterTrait>,
}

pub fn init_tracing() {
    let log_format = std::env::var("VENUEMAP_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

fn load_settings(config: &Config) -> anyhow::Result<EngineSettings> {
    match &config.settings_path {
        Some(path) => {
            let settings = EngineSettings::from_json_file(path)
                .with_context(|| format!("Failed to load engine settings from {}", path))?;
            tracing::info!("Engine settings loaded from {}", path);
            Ok(settings)
        }
        None => Ok(EngineSettings::default()),
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let settings = load_settings(config)?;

    let pool = db::open(&config.db_path)?;
    tracing::info!("Database path in use: {}", config.db_path);
    let writer = db::spawn_writer(pool.clone());
    let repository = Arc::new(VenueRepository::new(pool, writer));

    let registry = Arc::new(RegistryHandle::default());
    let taxonomy_service = Arc::new(TaxonomyService::new(
        registry.clone(),
        settings.snapshot_policy.clone(),
    ));

    let snapshot_json = std::fs::read_to_string(&config.snapshot_path)
        .with_context(|| format!("Failed to read taxonomy snapshot {}", config.snapshot_path))?;
    let summary = taxonomy_service
        .load_taxonomy_json(&config.snapshot_version, &snapshot_json)
        .with_context(|| format!("Taxonomy snapshot {} was rejected", config.snapshot_path))?;
    tracing::info!(
        "Taxonomy '{}' active: {} categories, {} subcategories, {} synonyms",
        summary.version,
        summary.category_count,
        summary.subcategory_count,
        summary.synonym_count
    );

    let synonym_resolver = Arc::new(SynonymResolver::new(registry.clone()));
    let matching_service = Arc::new(MatchingService::new(
        registry.clone(),
        repository.clone(),
        &settings,
    ));
    let validation_service = Arc::new(ValidationService::new(registry, repository.clone()));

    Ok(Arc::new(AppState {
        taxonomy_service,
        synonym_resolver,
        matching_service,
        validation_service,
        venue_store: repository.clone(),
        venue_writer: repository,
    }))
}
