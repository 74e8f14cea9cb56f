//! HTTP server startup
//!
//! Builds the application state from configuration, wires the router and
//! serves until Ctrl-C. All handlers reach the stores through the shared
//! [`AppState`]; nothing lives in module-level globals except metrics.

use std::time::Duration;
use tracing::{info, warn};

use crate::{config::Config, shared_state::AppState};

/// Run the personalization service until shutdown
pub async fn run_server(cfg: Config) -> anyhow::Result<()> {
    crate::telemetry::init_tracing(&cfg);
    crate::metrics::init_metrics()?;
    cfg.print_config();

    let state = AppState::in_memory(cfg.clone())?;
    let addr = cfg.api_addr()?;

    info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let app = build_router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Build the service router around an existing state
pub fn build_router(state: AppState) -> axum::Router {
    use axum::{
        Router,
        routing::{get, post},
    };
    use tower_http::{
        cors::{Any, CorsLayer},
        limit::RequestBodyLimitLayer,
        trace::TraceLayer,
        timeout::TimeoutLayer,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers(Any);

    let timeout = Duration::from_secs(state.config.request_timeout_seconds);
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route(
            "/events",
            post(crate::api::event_api::record_event).get(crate::api::event_api::list_events),
        )
        .route("/user/:user_id/path", get(crate::api::roadmap_api::get_roadmap))
        .route("/healthz", get(crate::api::admin_api::health))
        .route("/stats", get(crate::api::admin_api::stats))
        .route("/metrics", get(crate::metrics::get_metrics))
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .with_state(state)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!("Failed to listen for shutdown signal: {}", e),
    }
}
