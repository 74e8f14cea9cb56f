//! Operational endpoints: health and request counters
use axum::{
    extract::State,
    Json,
};
use serde::Serialize;
use std::sync::atomic::Ordering;
use tracing::error;

use super::ApiError;
use crate::shared_state::AppState;

pub const SERVICE_NAME: &str = "Personalization Service";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_events: usize,
    pub roadmaps: usize,
    pub total_requests: usize,
    pub rejected_events: usize,
    pub roadmap_misses: usize,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn stats(
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, ApiError> {
    let total_events = state.events.count().map_err(|e| {
        error!("Failed to read event count: {}", e);
        ApiError::internal(e)
    })?;

    let counters = &state.counters;
    Ok(Json(StatsResponse {
        total_events,
        roadmaps: state.roadmaps.len(),
        total_requests: counters.total_requests.load(Ordering::Relaxed),
        rejected_events: counters.rejected_events.load(Ordering::Relaxed),
        roadmap_misses: counters.roadmap_misses.load(Ordering::Relaxed),
    }))
}
