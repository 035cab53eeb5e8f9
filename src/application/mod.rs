// Application layer - Telemetry sources, the shared feed and dashboard use cases
pub mod dashboard_service;
pub mod mock_generator;
pub mod telemetry_feed;
pub mod telemetry_source;
