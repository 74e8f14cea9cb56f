//! API module - HTTP handlers for the personalization service

pub mod admin_api;
pub mod event_api;
pub mod roadmap_api;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

// Re-export API handlers
pub use admin_api::{health, stats, HealthResponse, StatsResponse};
pub use event_api::{list_events, record_event, EventListResponse, RecordEventResponse};
pub use roadmap_api::{get_roadmap, ROADMAP_NOT_FOUND};

/// Error returned by every handler, rendered as `{"detail": ..., "code": ...}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, format!("Internal error: {}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (
            self.status,
            Json(json!({
                "detail": self.message,
                "code": self.status.as_u16(),
            })),
        )
            .into_response()
    }
}
