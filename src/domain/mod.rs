// Domain layer - Signal catalog, telemetry values and their evaluation
pub mod catalog;
pub mod dashboard;
pub mod signal;
pub mod solar_car;
pub mod status;
pub mod telemetry;
