use anyhow::{Context, Result, anyhow};
use chrono::FixedOffset;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

use crate::presenter::{ForecastGrouping, Presenter, WeekdayZone};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Where forecast weekday labels take their clock from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeekdayZoneSetting {
    #[default]
    Viewer,
    Location,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_city = "Paris"
/// forecast_grouping = "calendar-day"
/// weekday_zone = "location"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// OpenWeather API key. Supplied by the user, never compiled in.
    pub api_key: Option<String>,

    /// Override for the OpenWeather base URL, e.g. a proxy or a test server.
    pub base_url: Option<String>,

    /// City shown when `show` is called without a location.
    pub default_city: Option<String>,

    #[serde(default)]
    pub forecast_grouping: ForecastGrouping,

    #[serde(default)]
    pub weekday_zone: WeekdayZoneSetting,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-dashboard", "weather-dash")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Store a new API key, replacing any previous one.
    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Effective API key: the environment variable wins over the stored one.
    pub fn api_key(&self) -> Result<String> {
        let from_env = std::env::var(API_KEY_ENV).ok();
        Self::resolve_api_key(from_env, self.api_key.as_deref())
    }

    fn resolve_api_key(from_env: Option<String>, stored: Option<&str>) -> Result<String> {
        from_env
            .filter(|key| !key.trim().is_empty())
            .or_else(|| stored.filter(|key| !key.trim().is_empty()).map(str::to_owned))
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: run `weather-dash configure` or set {API_KEY_ENV}. \
                     Get a free key at https://openweathermap.org/api"
                )
            })
    }

    /// Presenter settings, with weekday labels in `viewer_offset` unless the
    /// config asks for the location's own clock.
    pub fn presenter(&self, viewer_offset: FixedOffset) -> Presenter {
        let zone = match self.weekday_zone {
            WeekdayZoneSetting::Viewer => WeekdayZone::Viewer(viewer_offset),
            WeekdayZoneSetting::Location => WeekdayZone::Location,
        };

        Presenter::new(self.forecast_grouping, zone)
    }
}
