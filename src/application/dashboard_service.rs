// Dashboard service - Use case for building dashboards
use crate::application::telemetry_feed::TelemetryFeed;
use crate::domain::catalog::Catalog;
use crate::domain::dashboard::{CategoryPanel, Dashboard, SignalTile};
use crate::domain::signal::Category;
use crate::domain::status::{
    active_faults, category_health, classify_status, critical_alerts, format_display_value,
    ActiveFault, Alert,
};
use crate::domain::telemetry::TelemetrySnapshot;
use std::sync::Arc;

const DASHBOARD_TITLE: &str = "Solar Car Telemetry";

#[derive(Clone)]
pub struct DashboardService {
    catalog: Arc<Catalog>,
    feed: TelemetryFeed,
}

impl DashboardService {
    pub fn new(catalog: Arc<Catalog>, feed: TelemetryFeed) -> Self {
        Self { catalog, feed }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn feed(&self) -> &TelemetryFeed {
        &self.feed
    }

    /// Dashboard for the latest snapshot, if the feed has produced one.
    pub async fn current_dashboard(&self) -> Option<Dashboard> {
        let snapshot = self.feed.latest().await?;
        Some(self.dashboard(&snapshot))
    }

    pub async fn current_faults(&self) -> Option<Vec<ActiveFault>> {
        let snapshot = self.feed.latest().await?;
        Some(active_faults(&snapshot))
    }

    pub async fn current_alerts(&self) -> Option<Vec<Alert>> {
        let snapshot = self.feed.latest().await?;
        Some(critical_alerts(&snapshot))
    }

    pub fn dashboard(&self, snapshot: &TelemetrySnapshot) -> Dashboard {
        let panels = self
            .catalog
            .categories()
            .iter()
            .filter_map(|category| self.build_panel(category, snapshot))
            .collect();

        Dashboard::new(
            DASHBOARD_TITLE.to_string(),
            snapshot.timestamp().unix_ms,
            panels,
            critical_alerts(snapshot),
        )
    }

    fn build_panel(&self, category: &Category, snapshot: &TelemetrySnapshot) -> Option<CategoryPanel> {
        let health = category_health(&self.catalog, &category.name, snapshot)?;

        let tiles = category
            .signals
            .iter()
            .map(|signal| {
                let value = snapshot.get(&signal.name);
                SignalTile {
                    name: signal.name.clone(),
                    description: signal.description.clone(),
                    unit: signal.unit.clone(),
                    display: format_display_value(&self.catalog, &signal.name, value, &category.name),
                    status: classify_status(&self.catalog, &signal.name, value, &category.name),
                    range: signal.range,
                }
            })
            .collect();

        Some(CategoryPanel {
            category: category.name.clone(),
            icon: category.icon.clone(),
            color: category.color.clone(),
            health,
            tiles,
        })
    }
}
