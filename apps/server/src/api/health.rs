use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Readiness {
    snapshot_version: String,
    venue_count: usize,
}

async fn healthz() -> &'static str {
    "ok"
}

/// Ready once a snapshot is published and the venue store answers.
async fn readyz(State(state): State<Arc<AppState>>) -> ApiResult<Json<Readiness>> {
    let snapshot_version = state.taxonomy_service.current().version().to_string();
    let store = state.venue_store.clone();
    let venue_count = tokio::task::spawn_blocking(move || store.count_venues()).await??;
    Ok(Json(Readiness {
        snapshot_version,
        venue_count,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
}
