use serde::Deserialize;

use crate::sparkline;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub catalogue: CatalogueConfig,
    pub throttle: ThrottleConfig,
    pub badge: BadgeConfig,
    pub sparkline: SparklineConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "downloads.db".to_string(),
            max_pool_size: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogueConfig {
    /// Catalogue page URL; the plugin id is appended as an `id` query parameter.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self {
            base_url: "https://plugins.netbeans.apache.org/catalogue/".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    /// Minimum spacing between catalogue refreshes per plugin.
    pub hours: u32,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self { hours: 24 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BadgeConfig {
    pub label: String,
    /// Hex color; a leading '#' is stripped for the shields.io payload.
    pub color: String,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            label: "downloads".to_string(),
            color: "#007ec6".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SparklineConfig {
    pub width: u32,
    pub height: u32,
    pub color: String,
    /// History window used when the request carries no `days` parameter.
    pub default_days: u32,
}

impl Default for SparklineConfig {
    fn default() -> Self {
        Self {
            width: 200,
            height: 50,
            color: "#007ec6".to_string(),
            default_days: 30,
        }
    }
}

impl AppConfig {
    /// Loads from the path in CONFIG_FILE (default config.toml). A missing
    /// file is not an error; every setting has a default.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        match std::fs::read_to_string(&path) {
            Ok(s) => Self::load_from_str(&s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.database.path.is_empty(),
            "database.path must be non-empty"
        );
        anyhow::ensure!(
            self.database.max_pool_size > 0,
            "database.max_pool_size must be > 0, got {}",
            self.database.max_pool_size
        );
        anyhow::ensure!(
            !self.catalogue.base_url.is_empty(),
            "catalogue.base_url must be non-empty"
        );
        anyhow::ensure!(
            self.catalogue.timeout_secs > 0,
            "catalogue.timeout_secs must be > 0, got {}",
            self.catalogue.timeout_secs
        );
        anyhow::ensure!(
            self.throttle.hours > 0,
            "throttle.hours must be > 0, got {}",
            self.throttle.hours
        );
        anyhow::ensure!(!self.badge.label.is_empty(), "badge.label must be non-empty");
        anyhow::ensure!(!self.badge.color.is_empty(), "badge.color must be non-empty");
        anyhow::ensure!(
            self.sparkline.width > 0,
            "sparkline.width must be > 0, got {}",
            self.sparkline.width
        );
        anyhow::ensure!(
            self.sparkline.height > 0,
            "sparkline.height must be > 0, got {}",
            self.sparkline.height
        );
        anyhow::ensure!(
            !self.sparkline.color.is_empty(),
            "sparkline.color must be non-empty"
        );
        anyhow::ensure!(
            (1..=sparkline::MAX_DAYS).contains(&self.sparkline.default_days),
            "sparkline.default_days must be between 1 and {}, got {}",
            sparkline::MAX_DAYS,
            self.sparkline.default_days
        );
        Ok(())
    }
}
