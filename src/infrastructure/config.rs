use crate::domain::catalog::Catalog;
use crate::domain::solar_car::solar_car_catalog;
use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub feed: FeedSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_addr")]
    pub addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { addr: default_addr() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedSettings {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            seed: None,
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl FeedSettings {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogSettings {
    /// TOML file replacing the built-in catalog.
    #[serde(default)]
    pub path: Option<String>,
}

fn default_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_tick_ms() -> u64 {
    2000
}

fn default_channel_capacity() -> usize {
    16
}

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/app").required(false))
        .add_source(
            config::Environment::with_prefix("SOLAR_TELEMETRY")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app_config: AppConfig = settings.try_deserialize()?;
    validate(&app_config)?;
    Ok(app_config)
}

fn validate(app_config: &AppConfig) -> anyhow::Result<()> {
    if app_config.feed.tick_ms == 0 {
        anyhow::bail!("feed.tick_ms must be greater than zero");
    }
    Ok(())
}

/// Built-in catalog unless `catalog.path` points at a replacement.
pub fn load_catalog(settings: &CatalogSettings) -> anyhow::Result<Catalog> {
    match &settings.path {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read catalog file {}", path))?;
            Catalog::from_toml_str(&source).with_context(|| format!("Invalid catalog file {}", path))
        }
        None => Ok(solar_car_catalog()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let app_config: AppConfig = config::Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(app_config.server.addr, "0.0.0.0:8080");
        assert_eq!(app_config.feed.tick(), Duration::from_secs(2));
        assert_eq!(app_config.feed.seed, None);
        assert_eq!(app_config.feed.channel_capacity, 16);
        assert!(app_config.catalog.path.is_none());
    }

    #[test]
    fn test_overrides_from_toml() {
        let app_config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "[feed]\ntick_ms = 3000\nseed = 12\n\n[server]\naddr = \"127.0.0.1:9000\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(app_config.feed.tick_ms, 3000);
        assert_eq!(app_config.feed.seed, Some(12));
        assert_eq!(app_config.server.addr, "127.0.0.1:9000");
    }

    #[test]
    fn test_zero_tick_rejected() {
        let mut app_config = AppConfig::default();
        app_config.feed.tick_ms = 0;
        assert!(validate(&app_config).is_err());
        assert!(validate(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_load_builtin_catalog() {
        let catalog = load_catalog(&CatalogSettings::default()).unwrap();
        assert_eq!(catalog.categories().len(), 10);
    }

    #[test]
    fn test_load_missing_catalog_file() {
        let settings = CatalogSettings {
            path: Some("does/not/exist.toml".to_string()),
        };
        let err = load_catalog(&settings).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.toml"));
    }

    #[test]
    fn test_load_catalog_file() {
        let path = std::env::temp_dir().join(format!("solar-catalog-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[[categories]]\nname = \"Environmental\"\nicon = \"thermometer\"\ncolor = \"#C9302C\"\n\n[[categories.signals]]\nname = \"air_temp\"\nunit = \"°C\"\nrange = [0, 100]\ndescription = \"Air Temperature\"\n",
        )
        .unwrap();

        let settings = CatalogSettings {
            path: Some(path.to_string_lossy().into_owned()),
        };
        let catalog = load_catalog(&settings).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(catalog.signal_count(), 1);
        assert!(catalog.signal_definition("Environmental", "air_temp").is_some());
    }
}
