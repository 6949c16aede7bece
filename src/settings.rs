use std::path::PathBuf;

use config::{Config, ConfigError, File};
use directories::ProjectDirs;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Store {
    pub seed_fixtures: bool,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            seed_fixtures: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Session {
    pub storage_path: Option<String>,
}

impl Session {
    /// Configured path, else `session.json` in the platform data directory.
    pub fn storage_path(&self) -> PathBuf {
        if let Some(path) = &self.storage_path {
            return PathBuf::from(path);
        }

        ProjectDirs::from("app", "finance-tracker", "finance-tracker")
            .map(|dirs| dirs.data_dir().join("session.json"))
            .unwrap_or_else(|| PathBuf::from("session.json"))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Services {
    pub channel_capacity: usize,
}

impl Default for Services {
    fn default() -> Self {
        Self {
            channel_capacity: 512,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Dashboard {
    pub trend_months: u32,
    pub recent_transactions: usize,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            trend_months: 6,
            recent_transactions: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GateSettings {
    pub login_path: String,
    pub default_return_url: String,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            default_return_url: "/dashboard".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub store: Store,
    pub session: Session,
    pub services: Services,
    pub dashboard: Dashboard,
    pub gate: GateSettings,
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path).required(false))
            .build()?;

        config.try_deserialize()
    }
}
