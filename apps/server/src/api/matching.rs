use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use venuemap_core::matching::{EventRequirement, MatchResponse};

use super::bad_body;
use crate::{error::ApiResult, main_lib::AppState};

/// Scores the candidate pool on a blocking thread. If the request future is
/// dropped (client gone, timeout layer fired) the drop guard cancels the run.
async fn match_venues(
    State(state): State<Arc<AppState>>,
    body: Result<Json<EventRequirement>, JsonRejection>,
) -> ApiResult<Json<MatchResponse>> {
    let Json(requirement) = body.map_err(bad_body)?;
    debug!(
        "Matching {} desired nodes and {} terms for region '{}'",
        requirement.desired_node_ids.len(),
        requirement.desired_terms.len(),
        requirement.region_code
    );

    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();
    let service = state.matching_service.clone();
    let response =
        tokio::task::spawn_blocking(move || service.match_venues(&requirement, &cancel)).await??;
    let _ = guard.disarm();

    Ok(Json(response))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/match", post(match_venues))
}
