use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use venuemap_core::synonyms::SynonymEntry;
use venuemap_core::taxonomies::{SnapshotSummary, TaxonomyNode};

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub region: String,
    pub term: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTerm {
    pub region_code: String,
    pub term: String,
    pub canonical_node_id: String,
}

// ============================================================================
// Taxonomy Endpoints
// ============================================================================

async fn get_summary(State(state): State<Arc<AppState>>) -> Json<SnapshotSummary> {
    Json(state.taxonomy_service.summary())
}

async fn get_categories(State(state): State<Arc<AppState>>) -> Json<Vec<TaxonomyNode>> {
    Json(state.taxonomy_service.categories())
}

async fn get_node(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<TaxonomyNode>> {
    debug!("Fetching taxonomy node {}...", id);
    Ok(Json(state.taxonomy_service.get_node(&id)?))
}

async fn get_descendants(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<TaxonomyNode>>> {
    debug!("Fetching subcategories of {}...", id);
    Ok(Json(state.taxonomy_service.descendants_of(&id)?))
}

// ============================================================================
// Synonym Endpoints
// ============================================================================

async fn resolve_term(
    Query(query): Query<ResolveQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ResolvedTerm>> {
    let canonical_node_id = state.synonym_resolver.resolve(&query.region, &query.term)?;
    Ok(Json(ResolvedTerm {
        region_code: query.region,
        term: query.term,
        canonical_node_id,
    }))
}

async fn get_node_terms(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<SynonymEntry>>> {
    // 404 for ids the snapshot does not know, empty list for known nodes without terms
    state.taxonomy_service.get_node(&id)?;
    Ok(Json(state.synonym_resolver.terms_for(&id)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/taxonomy", get(get_summary))
        .route("/taxonomy/categories", get(get_categories))
        .route("/taxonomy/nodes/{id}", get(get_node))
        .route("/taxonomy/nodes/{id}/synonyms", get(get_node_terms))
        .route(
            "/taxonomy/categories/{id}/descendants",
            get(get_descendants),
        )
        .route("/synonyms/resolve", get(resolve_term))
}
