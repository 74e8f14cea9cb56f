//! Event ingestion endpoints

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};
use validator::ValidationErrors;

use super::ApiError;
use crate::metrics;
use crate::schema::Event;
use crate::shared_state::AppState;

pub const EVENT_RECORDED: &str = "Event recorded";

#[derive(Debug, Serialize)]
pub struct RecordEventResponse {
    pub message: String,
    pub total_events: usize,
}

#[derive(Debug, Serialize)]
pub struct EventListResponse {
    pub total_events: usize,
    pub events: Vec<Event>,
}

/// Append a learning-activity event to the event log.
///
/// The body is read as JSON unless the request declares some other content
/// type. Shape errors and non-JSON bodies become 422; oversized bodies keep
/// 413. The log is untouched on any rejection.
pub async fn record_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<RecordEventResponse>, ApiError> {
    state.counters.inc_total_requests();

    let event = decode_event(&headers, body).map_err(|err| {
        state.counters.inc_rejected_events();
        metrics::inc_request("record_event", "rejected");
        warn!("Rejected event payload: {}", err.message);
        err
    })?;

    if state.config.strict_event_validation {
        if let Err(errors) = event.validate_strict() {
            state.counters.inc_rejected_events();
            metrics::inc_request("record_event", "rejected");
            let detail = describe_validation_errors(&errors);
            warn!("Event for user '{}' failed validation: {}", event.user_id, detail);
            return Err(ApiError::unprocessable(detail));
        }
    }

    let user_id = event.user_id.clone();
    let total_events = state.events.append(event).map_err(|e| {
        error!("Failed to record event: {}", e);
        metrics::inc_request("record_event", "error");
        ApiError::internal(e)
    })?;

    metrics::inc_request("record_event", "ok");
    info!("Recorded event for user '{}' (total: {})", user_id, total_events);

    Ok(Json(RecordEventResponse {
        message: EVENT_RECORDED.to_string(),
        total_events,
    }))
}

/// Every recorded event, oldest first
pub async fn list_events(
    State(state): State<AppState>,
) -> Result<Json<EventListResponse>, ApiError> {
    state.counters.inc_total_requests();

    let events = state.events.list().map_err(|e| {
        error!("Failed to list events: {}", e);
        metrics::inc_request("list_events", "error");
        ApiError::internal(e)
    })?;

    metrics::inc_request("list_events", "ok");
    Ok(Json(EventListResponse {
        total_events: events.len(),
        events,
    }))
}

fn decode_event(
    headers: &HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Event, ApiError> {
    let body = body.map_err(|rejection| {
        let status = match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };
        ApiError::new(status, rejection.body_text())
    })?;

    if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
        if !is_json_content_type(content_type.to_str().unwrap_or_default()) {
            return Err(ApiError::unprocessable(
                "Expected a JSON body (Content-Type: application/json)",
            ));
        }
    }

    serde_json::from_slice(&body)
        .map_err(|e| ApiError::unprocessable(format!("Invalid event payload: {}", e)))
}

/// `application/json` or any `application/*+json`, parameters ignored
fn is_json_content_type(value: &str) -> bool {
    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<&str> = errors.field_errors().into_keys().collect();
    fields.sort_unstable();
    format!("Invalid value for field(s): {}", fields.join(", "))
}
