// Dashboard domain model
use super::signal::SignalRange;
use super::status::{Alert, CategoryHealth, DisplayValue, StatusTier};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub captured_at_ms: i64,
    pub status: StatusTier,
    pub alerts: Vec<Alert>,
    pub panels: Vec<CategoryPanel>,
}

impl Dashboard {
    pub fn new(
        title: String,
        captured_at_ms: i64,
        panels: Vec<CategoryPanel>,
        alerts: Vec<Alert>,
    ) -> Self {
        // worst tier across all panels and alerts
        let status = panels
            .iter()
            .map(|p| p.health.status)
            .chain(alerts.iter().map(|a| a.severity))
            .max()
            .unwrap_or(StatusTier::Normal);
        Self {
            title,
            captured_at_ms,
            status,
            alerts,
            panels,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryPanel {
    pub category: String,
    pub icon: String,
    pub color: String,
    pub health: CategoryHealth,
    pub tiles: Vec<SignalTile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignalTile {
    pub name: String,
    pub description: String,
    pub unit: String,
    pub display: DisplayValue,
    pub status: StatusTier,
    pub range: SignalRange,
}
