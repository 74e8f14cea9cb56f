use prometheus::{Encoder, TextEncoder, Registry, IntCounterVec, IntGauge};
use lazy_static::lazy_static;
use std::sync::{Mutex, OnceLock};
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::http::StatusCode;
use tracing::{error, warn};

use crate::shared_state::AppState;

lazy_static! {
    static ref REGISTRY: Registry = Registry::new();
}
static REQ_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();
static STORED_EVENTS: OnceLock<IntGauge> = OnceLock::new();
static INIT_LOCK: Mutex<()> = Mutex::new(());

/// Register the service metrics. Safe to call more than once.
pub fn init_metrics() -> prometheus::Result<()> {
    let _guard = INIT_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if REQ_COUNTER.get().is_some() {
        return Ok(());
    }

    let req_counter = IntCounterVec::new(
        prometheus::opts!("requests_total", "Total requests per route"),
        &["route", "status"],
    )?;
    let stored_events = IntGauge::new("stored_events", "Events held in the event log")?;

    REGISTRY.register(Box::new(req_counter.clone()))?;
    REGISTRY.register(Box::new(stored_events.clone()))?;
    let _ = STORED_EVENTS.set(stored_events);
    let _ = REQ_COUNTER.set(req_counter);
    Ok(())
}

pub fn inc_request(route: &str, status: &str) {
    if let Some(counter) = REQ_COUNTER.get() {
        counter.with_label_values(&[route, status]).inc();
    }
}

pub fn set_stored_events(count: usize) {
    if let Some(gauge) = STORED_EVENTS.get() {
        gauge.set(i64::try_from(count).unwrap_or(i64::MAX));
    }
}

/// Prometheus text exposition. `stored_events` is read from the log on
/// every scrape.
pub async fn get_metrics(State(state): State<AppState>) -> Response {
    match state.events.count() {
        Ok(count) => set_stored_events(count),
        Err(e) => warn!("Failed to read event count for metrics: {}", e),
    }

    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!("Failed to encode metrics: {}", e);
        return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to encode metrics").into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4")],
        buffer,
    )
        .into_response()
}
