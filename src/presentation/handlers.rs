// HTTP request handlers
use crate::domain::signal::SignalDefinition;
use crate::domain::status::{evaluate, format_display_value, DisplayValue, Evaluation, StatusTier};
use crate::domain::telemetry::SignalValue;
use crate::infrastructure::chunked_json::stream_from_subscription;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Deserialize)]
pub struct EvaluateQuery {
    pub category: String,
    pub signal: String,
    pub value: Option<String>,
}

#[derive(Serialize)]
struct SignalSearchResult<'a> {
    category: &'a str,
    signals: Vec<&'a SignalDefinition>,
}

#[derive(Serialize)]
struct EvaluationResult {
    category: String,
    signal: String,
    display: DisplayValue,
    status: StatusTier,
    evaluated: bool,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Full signal catalog
pub async fn get_catalog(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let catalog = state.dashboard_service.catalog();
    respond(json_response(catalog, accepts_brotli(&headers)).await)
}

/// Search signals of one category by name, description or unit
pub async fn search_signals(
    Path(category): Path<String>,
    Query(query): Query<SearchQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let catalog = state.dashboard_service.catalog();
    let Some(signals) = catalog.search(&category, query.q.as_deref().unwrap_or("")) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let result = SignalSearchResult {
        category: &category,
        signals,
    };
    respond(json_response(&result, accepts_brotli(&headers)).await)
}

/// Latest telemetry snapshot
pub async fn latest_snapshot(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    match state.dashboard_service.feed().latest().await {
        Some(snapshot) => respond(json_response(&*snapshot, accepts_brotli(&headers)).await),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

/// Stream one snapshot per feed tick
pub async fn stream_telemetry(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let rx = state.dashboard_service.feed().subscribe();
    stream_from_subscription(rx)
}

/// Evaluated dashboard for the latest snapshot
pub async fn get_dashboard(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    match state.dashboard_service.current_dashboard().await {
        Some(dashboard) => respond(json_response(&dashboard, accepts_brotli(&headers)).await),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

/// Battery protection faults active in the latest snapshot
pub async fn get_faults(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    match state.dashboard_service.current_faults().await {
        Some(faults) => respond(json_response(&faults, accepts_brotli(&headers)).await),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

/// Safety and threshold alerts raised by the latest snapshot
pub async fn get_alerts(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    match state.dashboard_service.current_alerts().await {
        Some(alerts) => respond(json_response(&alerts, accepts_brotli(&headers)).await),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

/// Format and classify an arbitrary reading
pub async fn evaluate_signal(
    Query(query): Query<EvaluateQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let catalog = state.dashboard_service.catalog();
    let value = query.value.as_deref().map(parse_query_value);

    let evaluation = evaluate(catalog, &query.signal, value.as_ref(), &query.category);
    let result = EvaluationResult {
        display: format_display_value(catalog, &query.signal, value.as_ref(), &query.category),
        status: evaluation.tier(),
        evaluated: matches!(evaluation, Evaluation::Status(_)),
        category: query.category,
        signal: query.signal,
    };
    respond(json_response(&result, accepts_brotli(&headers)).await)
}

fn parse_query_value(raw: &str) -> SignalValue {
    match raw {
        "true" => SignalValue::Bool(true),
        "false" => SignalValue::Bool(false),
        other => SignalValue::Text(other.to_string()),
    }
}

fn respond(result: Result<Response, StatusCode>) -> Response {
    match result {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}
