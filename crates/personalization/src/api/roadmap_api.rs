//! Roadmap lookup endpoint

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{error, info, warn};

use super::ApiError;
use crate::metrics;
use crate::schema::Roadmap;
use crate::shared_state::AppState;

pub const ROADMAP_NOT_FOUND: &str = "No roadmap found for this user";

/// Fetch the stored roadmap for a user, unchanged
pub async fn get_roadmap(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Roadmap>, ApiError> {
    state.counters.inc_total_requests();

    match state.roadmaps.get(&user_id) {
        Ok(Some(roadmap)) => {
            info!("Serving roadmap for user '{}' ({} weeks)", user_id, roadmap.weeks.len());
            metrics::inc_request("get_roadmap", "ok");
            Ok(Json(roadmap))
        }
        Ok(None) => {
            state.counters.inc_roadmap_misses();
            warn!("No roadmap for user '{}'", user_id);
            metrics::inc_request("get_roadmap", "not_found");
            Err(ApiError::not_found(ROADMAP_NOT_FOUND))
        }
        Err(e) => {
            error!("Failed to look up roadmap for '{}': {}", user_id, e);
            metrics::inc_request("get_roadmap", "error");
            Err(ApiError::internal(e))
        }
    }
}
