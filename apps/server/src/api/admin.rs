use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use venuemap_core::errors::DatabaseError;
use venuemap_core::taxonomies::{SchemaError, SnapshotSummary, TaxonomyError, TaxonomySnapshot};
use venuemap_core::validation::{ValidationFinding, ValidationReport};
use venuemap_core::venues::VenueProfile;

use super::bad_body;
use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Debug, Deserialize)]
pub struct LoadTaxonomyRequest {
    pub version: String,
    pub snapshot: TaxonomySnapshot,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueWriteResponse {
    pub venue: VenueProfile,
    pub findings: Vec<ValidationFinding>,
}

// ============================================================================
// Taxonomy publishing
// ============================================================================

/// Publishes a new snapshot. An unreadable document is reported like any
/// other schema violation, and either way the active snapshot is kept.
async fn load_taxonomy(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LoadTaxonomyRequest>, JsonRejection>,
) -> ApiResult<Json<SnapshotSummary>> {
    let Json(request) = body.map_err(|rejection| {
        ApiError::from(venuemap_core::Error::from(TaxonomyError::Schema(
            SchemaError::Malformed(rejection.body_text()),
        )))
    })?;
    let summary = state
        .taxonomy_service
        .load_taxonomy_snapshot(&request.version, request.snapshot)?;
    Ok(Json(summary))
}

async fn export_taxonomy(State(state): State<Arc<AppState>>) -> Json<TaxonomySnapshot> {
    Json(state.taxonomy_service.export_snapshot())
}

// ============================================================================
// Venue tagging
// ============================================================================

async fn validate_venue(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ValidationFinding>>> {
    debug!("Validating tagging of venue {}...", id);
    let service = state.validation_service.clone();
    let findings =
        tokio::task::spawn_blocking(move || service.validate_venue_tagging(&id)).await??;
    Ok(Json(findings))
}

async fn validate_all(State(state): State<Arc<AppState>>) -> ApiResult<Json<ValidationReport>> {
    let service = state.validation_service.clone();
    let report = tokio::task::spawn_blocking(move || service.validate_all()).await??;
    Ok(Json(report))
}

/// Stores a venue and returns the findings it raised against the active
/// snapshot. Findings never block the write.
async fn upsert_venue(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    body: Result<Json<VenueProfile>, JsonRejection>,
) -> ApiResult<Json<VenueWriteResponse>> {
    let Json(venue) = body.map_err(bad_body)?;
    if venue.venue_id != id {
        return Err(ApiError::BadRequest(format!(
            "venueId '{}' does not match path id '{}'",
            venue.venue_id, id
        )));
    }

    let findings = state.validation_service.validate_venue(&venue);
    let venue = state.venue_writer.upsert_venue(venue).await?;
    info!(
        "Stored venue {} with {} tagging findings",
        venue.venue_id,
        findings.len()
    );
    Ok(Json(VenueWriteResponse { venue, findings }))
}

async fn delete_venue(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    let deleted = state.venue_writer.delete_venue(&id).await?;
    if deleted == 0 {
        return Err(venuemap_core::Error::from(DatabaseError::NotFound(format!(
            "venue '{}'",
            id
        )))
        .into());
    }
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/taxonomy", post(load_taxonomy))
        .route("/admin/taxonomy/export", get(export_taxonomy))
        .route("/admin/validation", get(validate_all))
        .route(
            "/admin/venues/{id}",
            put(upsert_venue).delete(delete_venue),
        )
        .route("/admin/venues/{id}/validation", get(validate_venue))
}
