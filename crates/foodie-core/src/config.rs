use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::place::{Coordinate, Region};
use crate::platform;

/// Slider range from the UI: the search radius is clamped to 0..=30 km.
pub const MAX_RADIUS_KM: f64 = 30.0;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Viewing center used when no live location is available.
    #[serde(default = "default_center")]
    pub center: Coordinate,
    /// Search radius in kilometers, clamped to 0..=30.
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,
}

/// User-configurable paths for local datasets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Path to a local TOML place dataset.
    /// Defaults to `~/.config/foodie/places.toml`; the built-in dataset is
    /// used when the file does not exist.
    #[serde(default = "default_places_toml")]
    pub places_toml: PathBuf,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            center: default_center(),
            radius_km: default_radius_km(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            places_toml: default_places_toml(),
        }
    }
}

fn default_center() -> Coordinate {
    Coordinate::new(42.974, -82.405)
}

fn default_radius_km() -> f64 {
    15.0
}

fn default_places_toml() -> PathBuf {
    platform::config_dir().join("places.toml")
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }

    /// The configured viewing region, radius clamped to the slider range.
    pub fn region(&self) -> Region {
        Region::new(
            self.search.center,
            self.search.radius_km.clamp(0.0, MAX_RADIUS_KM) * 1000.0,
        )
    }
}
