// HTTP routes
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    evaluate_signal, get_alerts, get_catalog, get_dashboard, get_faults, health_check,
    latest_snapshot, search_signals, stream_telemetry,
};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/catalog", get(get_catalog))
        .route("/catalog/:category/signals", get(search_signals))
        .route("/telemetry", get(latest_snapshot))
        .route("/telemetry/stream", get(stream_telemetry))
        .route("/dashboard", get(get_dashboard))
        .route("/faults", get(get_faults))
        .route("/alerts", get(get_alerts))
        .route("/evaluate", get(evaluate_signal))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
