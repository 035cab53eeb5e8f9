// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::mock_generator::MockTelemetrySource;
use crate::application::telemetry_feed::TelemetryFeed;
use crate::infrastructure::config::{load_app_config, load_catalog};
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let app_config = load_app_config()?;
    let catalog = Arc::new(load_catalog(&app_config.catalog)?);
    tracing::info!(
        categories = catalog.categories().len(),
        signals = catalog.signal_count(),
        "Loaded signal catalog"
    );
    tracing::debug!(categories = ?catalog.category_names().collect::<Vec<_>>(), "Catalog categories");

    // Create telemetry source and the shared feed (application layer)
    let source = Arc::new(MockTelemetrySource::new(catalog.clone(), app_config.feed.seed));
    let feed = TelemetryFeed::new(source, app_config.feed.channel_capacity);
    let feed_task = feed.spawn(app_config.feed.tick());

    // Create application state
    let state = Arc::new(AppState {
        dashboard_service: DashboardService::new(catalog, feed),
    });

    // Build router (presentation layer)
    let router = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&app_config.server.addr)
        .await
        .with_context(|| format!("Failed to bind {}", app_config.server.addr))?;
    tracing::info!(
        "Starting solar-telemetry service on {} (tick {} ms)",
        app_config.server.addr,
        app_config.feed.tick_ms
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    feed_task.abort();
    tracing::info!("Telemetry feed stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
